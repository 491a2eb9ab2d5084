//! Reading the working-directory project manifest's `scripts` map.
//!
//! Absent or malformed manifests are tolerated everywhere a manifest is consulted (§6):
//! callers see `None` and degrade gracefully rather than receiving an error that would
//! abort the run.
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

/// Filename consulted in a task's effective working directory.
pub const MANIFEST_FILE_NAME: &str = "package.json";

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    scripts: Option<serde_json::Value>,
}

/// The `scripts` mapping of a project manifest, insertion order preserved.
#[derive(Debug, Clone, Default)]
pub struct Scripts(pub IndexMap<String, String>);

impl Scripts {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names_alpha(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn names_package_order(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

/// Read and parse `<dir>/package.json`'s `scripts` field.
///
/// Returns `None` when the file is missing, unreadable, not valid JSON, or its `scripts`
/// field is absent or not an object — every one of these is "no manifest" to callers, per
/// the manifest contract (§6): wildcard expansion degrades to the unexpanded original and
/// availability checks fail closed.
pub fn read_scripts(dir: &Path) -> Option<Scripts> {
    let path = manifest_path(dir);
    let contents = std::fs::read_to_string(&path).ok()?;
    let raw: RawManifest = serde_json::from_str(&contents).ok()?;
    let scripts_value = raw.scripts?;
    let object = scripts_value.as_object()?;

    let mut scripts = IndexMap::with_capacity(object.len());
    for (name, value) in object {
        if let Some(command) = value.as_str() {
            scripts.insert(name.clone(), command.to_string());
        }
    }
    Some(Scripts(scripts))
}

pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_manifest(dir: &Path, contents: &str) {
        std::fs::write(manifest_path(dir), contents).unwrap();
    }

    #[test]
    fn reads_scripts_in_insertion_order() {
        let dir = tempdir().unwrap();
        write_manifest(
            dir.path(),
            r#"{"scripts": {"start-watch:app": "vite", "start-watch:customer": "vite --mode customer", "start-watch:admin": "vite --mode admin"}}"#,
        );
        let scripts = read_scripts(dir.path()).unwrap();
        assert_eq!(
            scripts.names_package_order(),
            vec!["start-watch:app", "start-watch:customer", "start-watch:admin"]
        );
    }

    #[test]
    fn missing_manifest_is_none() {
        let dir = tempdir().unwrap();
        assert!(read_scripts(dir.path()).is_none());
    }

    #[test]
    fn malformed_json_is_none() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), "{ not json");
        assert!(read_scripts(dir.path()).is_none());
    }

    #[test]
    fn missing_scripts_field_is_none() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), r#"{"name": "whatever"}"#);
        assert!(read_scripts(dir.path()).is_none());
    }

    #[test]
    fn non_object_scripts_field_is_none() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), r#"{"scripts": "not an object"}"#);
        assert!(read_scripts(dir.path()).is_none());
    }
}
