//! C4: classifying and probing whether a resolved task can actually run.
use std::path::{Path, PathBuf};

use crate::command::Argv;
use crate::manifest::Scripts;

const KNOWN_PACKAGE_MANAGERS: &[&str] = &["npm", "pnpm", "yarn", "bun"];

/// The classification an [`Argv`] falls into for availability purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification<'a> {
    /// Contains a path separator, or begins with `./`/`../`.
    Path(&'a str),
    /// `<pm> run <script>`.
    PackageManagerScript { script: &'a str },
    /// Anything else: resolved via the search path (or a shell, which diagnoses itself).
    Bare(&'a str),
}

/// Classify an argv for availability purposes.
pub fn classify(argv: &Argv) -> Classification<'_> {
    if is_package_manager_run(argv) {
        return Classification::PackageManagerScript {
            script: &argv.args[1],
        };
    }
    if is_path_like(&argv.executable) {
        return Classification::Path(&argv.executable);
    }
    Classification::Bare(&argv.executable)
}

fn is_package_manager_run(argv: &Argv) -> bool {
    KNOWN_PACKAGE_MANAGERS.contains(&argv.executable.as_str())
        && argv.args.first().map(String::as_str) == Some("run")
        && argv.args.len() >= 2
}

fn is_path_like(executable: &str) -> bool {
    executable.starts_with("./")
        || executable.starts_with("../")
        || executable.contains(std::path::MAIN_SEPARATOR)
        || executable.contains('/')
}

/// The reason a task was judged unavailable, for the `[skip]` diagnostic of §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    ExecutableNotFound,
    ScriptNotFound,
}

impl Unavailable {
    pub fn reason(&self) -> &'static str {
        match self {
            Unavailable::ExecutableNotFound => "executable not found",
            Unavailable::ScriptNotFound => "script not found",
        }
    }
}

/// Decide whether `argv` is runnable. `shell_chosen` short-circuits a bare command to
/// "available" since the shell itself will diagnose a missing executable.
pub fn check(
    argv: &Argv,
    cwd: &Path,
    scripts: Option<&Scripts>,
    shell_chosen: bool,
) -> Result<(), Unavailable> {
    match classify(argv) {
        Classification::Path(path) => {
            if path_exists_as_regular_file(cwd, path) {
                Ok(())
            } else {
                Err(Unavailable::ExecutableNotFound)
            }
        }
        Classification::PackageManagerScript { script } => {
            // A malformed/missing manifest fails closed: treated as not found (§6).
            match scripts {
                Some(scripts) if scripts.contains(script) => Ok(()),
                _ => Err(Unavailable::ScriptNotFound),
            }
        }
        Classification::Bare(executable) => {
            if shell_chosen || resolves_via_search_path(executable) {
                Ok(())
            } else {
                Err(Unavailable::ExecutableNotFound)
            }
        }
    }
}

fn path_exists_as_regular_file(cwd: &Path, path: &str) -> bool {
    let candidate = PathBuf::from(path);
    let resolved = if candidate.is_absolute() {
        candidate
    } else {
        cwd.join(candidate)
    };
    resolved.metadata().map(|m| m.is_file()).unwrap_or(false)
}

fn resolves_via_search_path(executable: &str) -> bool {
    let Some(path_var) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path_var).any(|dir| {
        let candidate = dir.join(executable);
        is_executable_file(&candidate)
    })
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command;
    use indexmap::IndexMap;
    use tempfile::tempdir;

    #[test]
    fn classifies_path_forms() {
        let argv = command::parse("./scripts/run.sh").unwrap();
        assert!(matches!(classify(&argv), Classification::Path(_)));
        let argv = command::parse("../run.sh").unwrap();
        assert!(matches!(classify(&argv), Classification::Path(_)));
        let argv = command::parse("bin/tool").unwrap();
        assert!(matches!(classify(&argv), Classification::Path(_)));
    }

    #[test]
    fn classifies_package_manager_script() {
        let argv = command::parse("npm run build").unwrap();
        assert_eq!(classify(&argv), Classification::PackageManagerScript { script: "build" });
    }

    #[test]
    fn classifies_bare_command() {
        let argv = command::parse("echo hi").unwrap();
        assert!(matches!(classify(&argv), Classification::Bare("echo")));
    }

    #[test]
    fn path_form_checks_disk() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("run.sh"), "#!/bin/sh\n").unwrap();
        let argv = command::parse("./run.sh").unwrap();
        assert!(check(&argv, dir.path(), None, false).is_ok());

        let argv = command::parse("./missing.sh").unwrap();
        assert_eq!(check(&argv, dir.path(), None, false), Err(Unavailable::ExecutableNotFound));
    }

    #[test]
    fn package_manager_script_checks_manifest() {
        let mut map = IndexMap::new();
        map.insert("build".to_string(), "vite build".to_string());
        let scripts = Scripts(map);

        let argv = command::parse("npm run build").unwrap();
        assert!(check(&argv, Path::new("."), Some(&scripts), false).is_ok());

        let argv = command::parse("npm run missing").unwrap();
        assert_eq!(
            check(&argv, Path::new("."), Some(&scripts), false),
            Err(Unavailable::ScriptNotFound)
        );

        let argv = command::parse("npm run build").unwrap();
        assert_eq!(
            check(&argv, Path::new("."), None, false),
            Err(Unavailable::ScriptNotFound)
        );
    }

    #[test]
    fn bare_command_with_shell_is_always_available() {
        let argv = command::parse("definitely-not-a-real-binary-xyz").unwrap();
        assert!(check(&argv, Path::new("."), None, true).is_ok());
        assert_eq!(
            check(&argv, Path::new("."), None, false),
            Err(Unavailable::ExecutableNotFound)
        );
    }
}
