use chrono::Local;
use error_stack::{Result, ResultExt};
use google_sheets4::api::ValueRange;

use crate::auth::{self, scopes, CredentialSource};
use crate::routines::routine::{Routine, RoutineError};
use crate::sheets::spreadsheet_manager::SpreadsheetManager;
use crate::sheets::value_range_factory::ValueRangeFactory;

/// Cell block the token lands in, relative to the resolved sheet tab.
pub const TOKEN_BLOCK: &str = "A1:B2";

const LABEL_UPDATED: &str = "Last Updated";
const LABEL_TOKEN: &str = "Access Token";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TOKEN_PREVIEW_CHARS: usize = 20;

/// How labels and values are arranged inside the 2x2 block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenGridLayout {
    /// Labels in column A, values in column B (one pair per row).
    LabelColumn,
    /// Labels in row 1, values in row 2.
    LabelRow,
}

pub struct PublishReport {
    pub updated_cells: i32,
    pub range: String,
    pub timestamp: String,
    pub token_preview: String,
}

/// Mints a cloud-platform token and overwrites the token block of the target
/// spreadsheet with it. The pipeline is strictly sequential: load key, mint,
/// resolve tab, write. Any failure aborts the remaining steps.
pub struct UpdateTokenOnSheetsRoutine {
    key_source: CredentialSource,
    spreadsheet_id: String,
    layout: TokenGridLayout,
}

impl UpdateTokenOnSheetsRoutine {
    pub fn new(
        key_source: CredentialSource,
        spreadsheet_id: String,
        layout: TokenGridLayout,
    ) -> Self {
        Self {
            key_source,
            spreadsheet_id,
            layout,
        }
    }

    pub async fn publish(&self) -> Result<PublishReport, RoutineError> {
        let key = self
            .key_source
            .load()
            .await
            .change_context(RoutineError::while_doing("loading the service account key"))?;

        log::info!("minting access token for scope {}", scopes::CLOUD_PLATFORM);
        let token = auth::mint_access_token(key.clone(), scopes::CLOUD_PLATFORM)
            .await
            .change_context(RoutineError::while_doing("minting the access token"))?;
        log::info!("token minted: {}", token_preview(&token));

        let manager = SpreadsheetManager::new(key, self.spreadsheet_id.clone())
            .await
            .change_context(RoutineError::while_doing("building the sheets client"))?;

        let range = match manager.first_sheet_title().await {
            Ok(title) => qualified_range(&title),
            Err(report) => {
                log::warn!(
                    "could not resolve sheet tabs ({:?}); falling back to '{}', which may land on a different tab than intended",
                    report,
                    TOKEN_BLOCK
                );
                TOKEN_BLOCK.to_owned()
            }
        };

        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let grid = token_grid(self.layout, &timestamp, &token);
        let updated_cells = manager
            .write_range(&range, ValueRange::from_grid(&grid))
            .await
            .change_context(RoutineError::while_doing("writing the token block"))?;
        log::info!("updated {} cells in range {}", updated_cells, range);

        Ok(PublishReport {
            updated_cells,
            range,
            timestamp,
            token_preview: token_preview(&token),
        })
    }
}

#[async_trait::async_trait]
impl Routine for UpdateTokenOnSheetsRoutine {
    fn name(&self) -> &str {
        "UpdateTokenOnSheetsRoutine"
    }

    async fn run(&self) -> error_stack::Result<(), RoutineError> {
        self.publish().await.map(|_| ())
    }
}

fn qualified_range(sheet_title: &str) -> String {
    format!("'{}'!{}", sheet_title, TOKEN_BLOCK)
}

fn token_grid(layout: TokenGridLayout, timestamp: &str, token: &str) -> Vec<Vec<String>> {
    match layout {
        TokenGridLayout::LabelColumn => vec![
            vec![LABEL_UPDATED.to_owned(), timestamp.to_owned()],
            vec![LABEL_TOKEN.to_owned(), token.to_owned()],
        ],
        TokenGridLayout::LabelRow => vec![
            vec![LABEL_UPDATED.to_owned(), LABEL_TOKEN.to_owned()],
            vec![timestamp.to_owned(), token.to_owned()],
        ],
    }
}

pub fn token_preview(token: &str) -> String {
    let mut chars = token.chars();
    let head: String = chars.by_ref().take(TOKEN_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn label_column_grid_pairs_labels_with_values() {
        let grid = token_grid(TokenGridLayout::LabelColumn, "2025-01-01 12:00:00", "ya29.token");
        assert_eq!(
            grid,
            vec![
                vec!["Last Updated".to_owned(), "2025-01-01 12:00:00".to_owned()],
                vec!["Access Token".to_owned(), "ya29.token".to_owned()],
            ]
        );
    }

    #[test]
    fn label_row_grid_puts_values_in_second_row() {
        let grid = token_grid(TokenGridLayout::LabelRow, "2025-01-01 12:00:00", "ya29.token");
        assert_eq!(
            grid,
            vec![
                vec!["Last Updated".to_owned(), "Access Token".to_owned()],
                vec!["2025-01-01 12:00:00".to_owned(), "ya29.token".to_owned()],
            ]
        );
    }

    #[test]
    fn both_layouts_keep_the_token_in_the_last_cell() {
        for layout in [TokenGridLayout::LabelColumn, TokenGridLayout::LabelRow] {
            let grid = token_grid(layout, "2025-01-01 12:00:00", "ya29.token");
            assert_eq!(grid[1][1], "ya29.token");
            assert!(!grid[1][1].is_empty());
        }
    }

    #[test]
    fn timestamps_match_the_cell_format() {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        assert!(NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn qualified_range_quotes_the_tab_title() {
        assert_eq!(qualified_range("Sheet 1"), "'Sheet 1'!A1:B2");
    }

    #[test]
    fn short_tokens_are_previewed_whole() {
        assert_eq!(token_preview("abc"), "abc");
    }

    #[test]
    fn long_tokens_are_truncated_with_an_ellipsis() {
        let token = "ya29.a0AfH6SMBxxxxxxxxxxxxxxxxxxxx";
        let preview = token_preview(token);
        assert_eq!(preview, "ya29.a0AfH6SMBxxxxxx...");
        assert_eq!(preview.trim_end_matches("...").chars().count(), 20);
    }
}
