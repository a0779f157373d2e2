use error_stack::{report, Context, Result, ResultExt};
use google_sheets4::{api::ValueRange, oauth2::ServiceAccountKey, Sheets};

use crate::auth;
use crate::sheets::http_client::{self, SheetsConnector};

pub struct SpreadsheetManager {
    pub spreadsheet_id: String,
    hub: Sheets<SheetsConnector>,
}

#[derive(Debug)]
pub enum SpreadsheetManagerError {
    FailedToAuthenticate,
    FailedToFetchSheetTitle,
    FailedToWriteRange,
}

impl std::fmt::Display for SpreadsheetManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Context for SpreadsheetManagerError {}

impl SpreadsheetManager {
    pub async fn new(
        key: ServiceAccountKey,
        spreadsheet_id: String,
    ) -> Result<Self, SpreadsheetManagerError> {
        let client = http_client::http_client();
        let auth = auth::authenticator(key, client.clone())
            .await
            .change_context(SpreadsheetManagerError::FailedToAuthenticate)?;
        let hub = Sheets::new(client, auth);

        Ok(SpreadsheetManager {
            spreadsheet_id,
            hub,
        })
    }

    /// Resolves the title of the first sheet tab from spreadsheet metadata.
    pub async fn first_sheet_title(&self) -> Result<String, SpreadsheetManagerError> {
        let response = self
            .hub
            .spreadsheets()
            .get(&self.spreadsheet_id)
            .doit()
            .await
            .change_context(SpreadsheetManagerError::FailedToFetchSheetTitle)?;

        let sheets = response
            .1
            .sheets
            .ok_or(report!(SpreadsheetManagerError::FailedToFetchSheetTitle))?;

        let titles = sheets
            .iter()
            .filter_map(|sheet| sheet.properties.as_ref().and_then(|props| props.title.as_deref()))
            .collect::<Vec<_>>();
        log::info!("available sheet tabs: {:?}", titles);

        titles
            .first()
            .map(|title| (*title).to_owned())
            .ok_or(report!(SpreadsheetManagerError::FailedToFetchSheetTitle))
    }

    /// Overwrites `range` with `value_range` using raw input semantics and
    /// returns the number of cells the API reports as updated. Prior contents
    /// of the range are discarded.
    pub async fn write_range(
        &self,
        range: &str,
        value_range: ValueRange,
    ) -> Result<i32, SpreadsheetManagerError> {
        let response = self
            .hub
            .spreadsheets()
            .values_update(value_range, &self.spreadsheet_id, range)
            .value_input_option("RAW")
            .doit()
            .await
            .change_context(SpreadsheetManagerError::FailedToWriteRange)?;

        Ok(response.1.updated_cells.unwrap_or(0))
    }
}
