use thiserror::Error;

pub const SERVICE_ACCOUNT_JSON: &str = "SERVICE_ACCOUNT_JSON";
pub const SPREADSHEET_ID: &str = "SPREADSHEET_ID";
pub const PORT: &str = "PORT";

/// Environment-supplied configuration for the HTTP variant.
pub struct ServerEnv {
    pub service_account_json: String,
    pub spreadsheet_id: String,
}

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("{0} not configured")]
    Missing(&'static str),
}

pub fn load_server_env() -> Result<ServerEnv, EnvError> {
    Ok(ServerEnv {
        service_account_json: non_empty(SERVICE_ACCOUNT_JSON)?,
        spreadsheet_id: non_empty(SPREADSHEET_ID)?,
    })
}

pub fn port_from_env() -> Option<u16> {
    std::env::var(PORT).ok().and_then(|value| value.parse().ok())
}

// An empty value counts as unset, so a blanked-out variable still fails
// before any network call is made.
fn non_empty(var: &'static str) -> Result<String, EnvError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(EnvError::Missing(var)),
    }
}
