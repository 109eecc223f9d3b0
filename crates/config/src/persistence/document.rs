//! INI documents for the AWS config and credentials files.
//!
//! Responsibilities:
//! - Parse an INI file into named sections (`configparser`).
//! - Read, set, and remove keys in one section.
//! - Write the whole document back atomically with owner-only permissions.
//!
//! Does NOT handle:
//! - Locking (callers hold a `FileLock` around load/modify/save).
//! - Interpreting key names (see `loader` and `writer`).
//!
//! Invariants:
//! - Section and key names are case-sensitive.
//! - Only `=` separates keys from values, so ARNs keep their colons.
//! - Indented lines continue the previous key, so nested blocks such as `s3 =`
//!   keep their shape when the file is written back.
//! - `#` and `;` only start a comment at the beginning of a line.
//! - A missing file loads as an empty document.

use std::io::Write;
use std::path::{Path, PathBuf};

use configparser::ini::Ini;

use super::ConfigFileError;

/// Section name configparser uses for keys outside any section. Chosen so it
/// never collides with a real profile such as `[default]`.
const UNSECTIONED: &str = "__unsectioned__";

fn new_ini() -> Ini {
    let mut defaults = Ini::new_cs().defaults();
    defaults.default_section = UNSECTIONED.to_string();
    defaults.delimiters = vec!['='];
    defaults.multiline = true;
    defaults.enable_inline_comments = false;
    Ini::new_from_defaults(defaults)
}

/// An INI file loaded into memory.
#[derive(Debug, Clone)]
pub struct ProfileDocument {
    path: PathBuf,
    ini: Ini,
}

impl ProfileDocument {
    /// Load `path`, treating a missing file as empty.
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let mut ini = new_ini();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                ini.read(content).map_err(|message| ConfigFileError::Parse {
                    path: path.to_path_buf(),
                    message,
                })?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(ConfigFileError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            ini,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.ini.sections().iter().any(|s| s == section)
    }

    /// Value of `key` in `section`; blank values read as absent.
    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        self.ini
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Set `key`, or remove it when `value` is `None`.
    pub fn set(&mut self, section: &str, key: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.ini.set(section, key, Some(value.to_string()));
            }
            None => {
                self.ini.remove_key(section, key);
            }
        }
    }

    /// Serialized INI text.
    pub fn render(&self) -> String {
        self.ini.writes()
    }

    /// Write through a temporary file and rename over the target.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let write_err = |source| ConfigFileError::Write {
            path: self.path.clone(),
            source,
        };

        let temp_path = self.path.with_extension("tmp");
        let mut file = open_private(&temp_path).map_err(write_err)?;
        file.write_all(self.render().as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);

        std::fs::rename(&temp_path, &self.path).map_err(write_err)?;

        tracing::debug!(path = %self.path.display(), "profile document saved atomically");
        Ok(())
    }
}

/// Create or truncate `path` with mode `0600` on unix.
pub(crate) fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}
