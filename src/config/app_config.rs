use config::{Config, ConfigError, File};

use super::sheets_config::SpreadsheetConfig;

#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub sheets: SpreadsheetConfig,
}

impl AppConfig {
    /// Reads the optional `Config` file from the working directory. A missing
    /// file yields the defaults; a present-but-invalid file is an error.
    pub fn load() -> Result<AppConfig, ConfigError> {
        Config::builder()
            .add_source(File::with_name("Config").required(false))
            .build()?
            .try_deserialize()
    }
}
