use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for the command-line tool.
///
/// Loaded from `clinic.toml`. Every field has a default, so a missing file
/// behaves like an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The file doctors and pets are stored in.
    ///
    /// Relative paths are resolved against the working directory.
    data_file: PathBuf,

    /// Whether listings are sorted by name even without `--sorted`.
    pub sort_lists: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            sort_lists: false,
        }
    }
}

impl Config {
    /// The default name of the configuration file.
    pub const FILE_NAME: &'static str = "clinic.toml";

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The data file records are read from and written to.
    #[must_use]
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Sets the data file.
    pub fn set_data_file(&mut self, path: PathBuf) {
        self.data_file = path;
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("HospitalManagement.txt")
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_data_file")]
        data_file: PathBuf,

        #[serde(default)]
        sort_lists: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                data_file,
                sort_lists,
            } => Self {
                data_file,
                sort_lists,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            data_file: config.data_file,
            sort_lists: config.sort_lists,
        }
    }
}
