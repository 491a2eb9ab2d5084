//! Optional `paracmd.toml` defaults, resolved the way `pueue_lib::settings::Settings::read`
//! resolves its config file: an explicit path, else a per-user config directory, else the
//! current directory. Absence of a config file is the common case, not an error.
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Defaults that a config file may supply; CLI flags of §6 override any of these when
/// present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub max_processes: Option<usize>,
    pub prefix: Option<String>,
    pub prefix_colors: Option<Vec<String>>,
    pub success_condition: Option<String>,
    pub kill_others_on: Option<Vec<String>>,
    pub wildcard_sort: Option<String>,
    pub timestamp_format: Option<String>,
}

impl FileConfig {
    /// Load the config file. Returns the empty default when none is found anywhere in the
    /// resolution order, or when `explicit_path` itself doesn't exist.
    pub fn read(explicit_path: Option<&Path>) -> color_eyre::Result<FileConfig> {
        let candidate = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => locate_config_file(),
        };

        let Some(path) = candidate else {
            return Ok(FileConfig::default());
        };

        let Ok(contents) = std::fs::read_to_string(&path) else {
            return Ok(FileConfig::default());
        };

        toml::from_str(&contents)
            .map_err(|err| color_eyre::eyre::eyre!("failed to parse {}: {err}", path.display()))
    }
}

fn locate_config_file() -> Option<PathBuf> {
    if let Some(dirs) = directories::ProjectDirs::from("", "", "paracmd") {
        let candidate = dirs.config_dir().join("paracmd.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    for name in [".paracmd.toml", "paracmd.toml"] {
        let candidate = PathBuf::from(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}
