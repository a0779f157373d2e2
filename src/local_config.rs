use std::fs::{self, DirBuilder};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR: &str = ".token-to-sheets";
const CONFIG_FILE: &str = "config.json";

/// Per-user record remembering the chosen spreadsheet across runs. Written
/// only on operator opt-in, read on every run that has no explicit ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConfig {
    pub spreadsheet_id: String,
}

#[derive(Debug, Error)]
pub enum LocalConfigError {
    #[error("could not resolve the home directory")]
    HomeDirUnavailable,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR).join(CONFIG_FILE))
}

impl LocalConfig {
    /// A missing or unreadable file reads as "no saved config".
    pub fn load() -> Option<Self> {
        config_path().and_then(|path| Self::load_from(&path))
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        let bytes = fs::read(path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn save(&self) -> Result<PathBuf, LocalConfigError> {
        let path = config_path().ok_or(LocalConfigError::HomeDirUnavailable)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), LocalConfigError> {
        if let Some(parent) = path.parent() {
            DirBuilder::new().recursive(true).create(parent)?;
        }
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join("token_to_sheets_local_config_tests")
            .join(name)
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_config_path("round_trip.json");
        let config = LocalConfig {
            spreadsheet_id: "17_CfNpjfxvEGydsFr_PNQX1bTEV8XgRAIvMkJ1O5WHM".to_owned(),
        };

        config.save_to(&path).expect("should save config");
        let loaded = LocalConfig::load_from(&path).expect("should load saved config");
        assert_eq!(loaded, config);

        fs::remove_file(&path).expect("should remove test config");
    }

    #[test]
    fn missing_file_is_no_saved_config() {
        assert_eq!(LocalConfig::load_from(Path::new("no_such_config.json")), None);
    }

    #[test]
    fn corrupt_file_is_no_saved_config() {
        let path = temp_config_path("corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).expect("should create test dir");
        fs::write(&path, "{spreadsheet_id").expect("should write corrupt file");

        assert_eq!(LocalConfig::load_from(&path), None);

        fs::remove_file(&path).expect("should remove test config");
    }
}
