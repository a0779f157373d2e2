mod auth;
mod cli;
mod config;
mod env;
mod local_config;
mod routines;
mod server;
mod sheets;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::auth::CredentialSource;
use crate::cli::{Cli, Commands, PublishArgs, ServeArgs};
use crate::config::app_config::AppConfig;
use crate::local_config::LocalConfig;
use crate::routines::routine::Routine;
use crate::routines::update_token_on_sheets::{TokenGridLayout, UpdateTokenOnSheetsRoutine};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Publish(args) => publish(args).await,
        Commands::Serve(args) => serve(args).await,
        Commands::ShowConfig => show_config(),
    };

    if code != 0 {
        std::process::exit(code);
    }
}

async fn publish(args: PublishArgs) -> i32 {
    let app_config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            log::error!("could not load the Config file: {}", err);
            return 1;
        }
    };

    let Some(key_source) = resolve_key_source(&args, &app_config) else {
        log::error!(
            "service account key not configured; pass --key-file <path> or set sheets.key_file in the Config file"
        );
        return 1;
    };

    let (spreadsheet_id, prompted) = match resolve_spreadsheet_id(&args, &app_config) {
        Ok(resolved) => resolved,
        Err(err) => {
            log::error!("could not read the spreadsheet ID: {}", err);
            return 1;
        }
    };
    if spreadsheet_id.is_empty() {
        log::error!("a spreadsheet ID is required");
        return 1;
    }

    if args.save_config || (prompted && confirm("Save this spreadsheet ID for future runs?")) {
        let local = LocalConfig {
            spreadsheet_id: spreadsheet_id.clone(),
        };
        match local.save() {
            Ok(path) => println!("Saved spreadsheet ID to {}", path.display()),
            Err(err) => log::warn!("could not save the local config: {}", err),
        }
    }

    let routine = UpdateTokenOnSheetsRoutine::new(
        key_source,
        spreadsheet_id.clone(),
        TokenGridLayout::LabelColumn,
    );

    match routine.publish().await {
        Ok(report) => {
            println!("Updated {} cells in range {}", report.updated_cells, report.range);
            println!("Token: {}", report.token_preview);
            println!();
            println!("Reading it from n8n:");
            println!("  1. read the token from cell B2 of the first sheet tab");
            println!("  2. https://docs.google.com/spreadsheets/d/{}", spreadsheet_id);
            println!("  3. schedule this command (e.g. hourly cron) to keep the token fresh");
            0
        }
        Err(report) => {
            log::error!("{} failed: {:?}", routine.name(), report);
            1
        }
    }
}

async fn serve(args: ServeArgs) -> i32 {
    let port = args.port.or_else(env::port_from_env).unwrap_or(DEFAULT_PORT);

    match server::serve(port).await {
        Ok(()) => 0,
        Err(err) => {
            log::error!("server error: {}", err);
            1
        }
    }
}

fn show_config() -> i32 {
    let Some(path) = local_config::config_path() else {
        log::error!("could not resolve the home directory");
        return 1;
    };

    match LocalConfig::load_from(&path) {
        Some(saved) => {
            println!("{}", path.display());
            println!("spreadsheet_id = {}", saved.spreadsheet_id);
        }
        None => println!("No saved configuration at {}", path.display()),
    }
    0
}

fn resolve_key_source(args: &PublishArgs, app_config: &AppConfig) -> Option<CredentialSource> {
    if let Some(path) = &args.key_file {
        return Some(CredentialSource::KeyFile(path.clone()));
    }
    app_config
        .sheets
        .key_file
        .as_deref()
        .map(|path| CredentialSource::KeyFile(PathBuf::from(path)))
}

// Flag, then saved per-user config, then the Config file, then the operator.
fn resolve_spreadsheet_id(
    args: &PublishArgs,
    app_config: &AppConfig,
) -> io::Result<(String, bool)> {
    if let Some(id) = &args.spreadsheet_id {
        return Ok((id.clone(), false));
    }
    if let Some(saved) = LocalConfig::load() {
        log::info!("using the saved spreadsheet ID");
        return Ok((saved.spreadsheet_id, false));
    }
    if let Some(id) = app_config.sheets.spreadsheet_id.as_deref() {
        return Ok((id.to_owned(), false));
    }
    prompt("Spreadsheet ID: ").map(|id| (id, true))
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

fn confirm(question: &str) -> bool {
    match prompt(&format!("{question} [y/N] ")) {
        Ok(answer) => matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
