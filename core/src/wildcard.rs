//! C3: wildcard expansion of `<pm> run <pattern*>` against the project manifest.
use std::path::Path;

use crate::error::{Error, Result};
use crate::manifest::{self, Scripts};

/// Ordering applied to matched script names (`RunOptions.wildcardSort`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WildcardSort {
    #[default]
    Alpha,
    Package,
}

impl std::str::FromStr for WildcardSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alpha" => Ok(WildcardSort::Alpha),
            "package" => Ok(WildcardSort::Package),
            other => Err(Error::UnknownWildcardSort(other.to_string())),
        }
    }
}

/// One command produced by expansion: a concrete command string plus a derived name, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expanded {
    pub command: String,
    pub derived_name: Option<String>,
}

/// Expand `command` (already shortcut-normalized) against the manifest in `cwd`.
///
/// `explicit_name` is the source command's own `name`, if it carried one — used to build
/// the `<base>:<script>` derived name on a successful expansion. Returns a single,
/// unexpanded `Expanded` when the command isn't a wildcard form, the manifest can't be
/// read, or nothing matches.
pub fn expand(
    command: &str,
    explicit_name: Option<&str>,
    cwd: &Path,
    sort: WildcardSort,
) -> Vec<Expanded> {
    let Some((pm, pattern)) = wildcard_run_pattern(command) else {
        return vec![unexpanded(command)];
    };

    let Some(scripts) = manifest::read_scripts(cwd) else {
        return vec![unexpanded(command)];
    };

    let matches = matching_names(&scripts, pattern, sort);
    if matches.is_empty() {
        return vec![unexpanded(command)];
    }

    matches
        .into_iter()
        .map(|script_name| {
            let derived_name = match explicit_name {
                Some(base) => format!("{base}:{script_name}"),
                None => script_name.to_string(),
            };
            Expanded {
                command: format!("{pm} run {script_name}"),
                derived_name: Some(derived_name),
            }
        })
        .collect()
}

fn unexpanded(command: &str) -> Expanded {
    Expanded {
        command: command.to_string(),
        derived_name: None,
    }
}

/// If `command` is `<pm> run <pattern>` and `<pattern>` contains `*`, return `(pm, pattern)`.
fn wildcard_run_pattern(command: &str) -> Option<(&str, &str)> {
    let (pm, rest) = command.split_once(' ')?;
    let pattern = rest.strip_prefix("run ")?;
    if pattern.contains('*') {
        Some((pm, pattern))
    } else {
        None
    }
}

fn matching_names<'a>(scripts: &'a Scripts, pattern: &str, sort: WildcardSort) -> Vec<&'a str> {
    let candidates = match sort {
        WildcardSort::Alpha => scripts.names_alpha(),
        WildcardSort::Package => scripts.names_package_order(),
    };
    candidates
        .into_iter()
        .filter(|name| literal_star_match(pattern, name))
        .collect()
}

/// Match `name` against `pattern`, where `*` matches any substring (including empty) and
/// every other character matches itself literally.
fn literal_star_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    match_from(&pattern, &name)
}

fn match_from(pattern: &[char], name: &[char]) -> bool {
    match pattern.first() {
        None => name.is_empty(),
        Some('*') => {
            // Try every possible split: `*` consumes 0..=name.len() characters.
            (0..=name.len()).any(|split| match_from(&pattern[1..], &name[split..]))
        }
        Some(c) => match name.first() {
            Some(n) if n == c => match_from(&pattern[1..], &name[1..]),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn literal_star_matches() {
        assert!(literal_star_match("start-watch:*", "start-watch:app"));
        assert!(literal_star_match("*", ""));
        assert!(literal_star_match("*", "anything"));
        assert!(!literal_star_match("start-watch:*", "build"));
        assert!(literal_star_match("a*b*c", "aXbYc"));
        assert!(!literal_star_match("a*b", "a"));
    }

    fn write_manifest(dir: &Path) {
        std::fs::write(
            manifest::manifest_path(dir),
            r#"{"scripts": {"start-watch:app": "vite", "start-watch:customer": "vite --mode customer", "start-watch:admin": "vite --mode admin"}}"#,
        )
        .unwrap();
    }

    #[test]
    fn alpha_vs_package_order() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path());

        let alpha = expand("pnpm run start-watch:*", None, dir.path(), WildcardSort::Alpha);
        let names: Vec<_> = alpha.iter().map(|e| e.derived_name.clone().unwrap()).collect();
        assert_eq!(names, vec!["start-watch:admin", "start-watch:app", "start-watch:customer"]);

        let package = expand("pnpm run start-watch:*", None, dir.path(), WildcardSort::Package);
        let names: Vec<_> = package.iter().map(|e| e.derived_name.clone().unwrap()).collect();
        assert_eq!(names, vec!["start-watch:app", "start-watch:customer", "start-watch:admin"]);
    }

    #[test]
    fn derived_name_includes_base_when_explicit_name_given() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path());
        let expanded = expand("pnpm run start-watch:*", Some("watchers"), dir.path(), WildcardSort::Alpha);
        assert_eq!(expanded[0].derived_name.as_deref(), Some("watchers:start-watch:admin"));
    }

    #[test]
    fn no_match_degrades_to_single_unexpanded_task() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path());
        let expanded = expand("pnpm run nope-*", None, dir.path(), WildcardSort::Alpha);
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].command, "pnpm run nope-*");
        assert_eq!(expanded[0].derived_name, None);
    }

    #[test]
    fn missing_manifest_degrades_to_single_unexpanded_task() {
        let dir = tempdir().unwrap();
        let expanded = expand("pnpm run start-watch:*", None, dir.path(), WildcardSort::Alpha);
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].command, "pnpm run start-watch:*");
    }

    #[test]
    fn non_wildcard_command_passes_through() {
        let dir = tempdir().unwrap();
        let expanded = expand("npm run build", None, dir.path(), WildcardSort::Alpha);
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].command, "npm run build");
        assert_eq!(expanded[0].derived_name, None);
    }
}
