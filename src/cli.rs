use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "token-to-sheets", version)]
#[command(about = "Mints a Google Cloud access token and publishes it to a spreadsheet")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Mint a fresh access token and overwrite the token block in the spreadsheet.
    Publish(PublishArgs),
    /// Expose the publish pipeline as an HTTP endpoint.
    Serve(ServeArgs),
    /// Print the saved per-user configuration and exit.
    ShowConfig,
}

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Target spreadsheet ID; falls back to the saved per-user config, then the Config file.
    #[arg(long)]
    pub spreadsheet_id: Option<String>,

    /// Path to the service account key JSON; falls back to sheets.key_file in the Config file.
    #[arg(long)]
    pub key_file: Option<PathBuf>,

    /// Remember the resolved spreadsheet ID for future runs.
    #[arg(long)]
    pub save_config: bool,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on; falls back to the PORT environment variable, then 8080.
    #[arg(long)]
    pub port: Option<u16>,
}
