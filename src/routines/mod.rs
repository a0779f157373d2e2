pub mod routine;
pub mod update_token_on_sheets;
