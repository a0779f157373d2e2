#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct SpreadsheetConfig {
    pub key_file: Option<Box<str>>,
    pub spreadsheet_id: Option<Box<str>>,
}
