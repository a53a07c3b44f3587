use std::io::BufRead;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pulseboard::commands::{self, parse_assignment};
use pulseboard::prompt::StdinConfirm;
use pulseboard::{load_config, Config, Dashboard};
use pulseboard_core::panel::AssumeYes;
use pulseboard_core::Confirm;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "pulseboard")]
#[command(about = "Terminal client for the Pulseboard data dashboard")]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend API base URL (overrides the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Live feed base URL (overrides the config file)
    #[arg(long)]
    ws_url: Option<String>,

    /// Token file (overrides the config file)
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info", value_parser = clap::value_parser!(Level))]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange credentials for a session token
    Login {
        #[arg(short, long)]
        username: String,

        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the session token
    Logout,

    /// Show one page of the table
    Rows {
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Change fields of a row and save it
    Edit {
        /// Row index as shown by `rows`
        index: usize,

        /// column=value, repeatable
        #[arg(long = "set", required = true, value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,
    },

    /// Delete a row
    Delete {
        /// Row index as shown by `rows`
        index: usize,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Restore the table from the backend's backup
    Restore,

    /// Follow the live feed
    Feed {
        /// Stop after this many samples
        #[arg(long)]
        samples: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => {
            debug!("Loading configuration from {:?}", path);
            load_config(path)?
        }
        None => Config::default(),
    };
    if let Some(url) = args.api_url {
        config.backend.api_url = url;
    }
    if let Some(url) = args.ws_url {
        config.backend.ws_url = url;
    }
    if let Some(path) = args.token_file {
        config.session.token_file = Some(path);
    }
    debug!("Effective configuration: {:?}", config);

    let dashboard = Dashboard::from_config(&config)?;
    let mut out = std::io::stdout();

    match args.command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            commands::run_login(&dashboard, &username, &password, &mut out).await?;
        }
        Commands::Logout => {
            commands::run_logout(&dashboard, &mut out)?;
        }
        Commands::Rows { page } => {
            commands::run_rows(&dashboard, page, &mut out).await?;
        }
        Commands::Edit { index, assignments } => {
            commands::run_edit(&dashboard, index, &assignments, &mut out).await?;
        }
        Commands::Delete { index, yes } => {
            let confirm: Box<dyn Confirm> = if yes {
                Box::new(AssumeYes)
            } else {
                Box::new(StdinConfirm)
            };
            commands::run_delete(&dashboard, index, confirm, &mut out).await?;
        }
        Commands::Restore => {
            commands::run_restore(&dashboard, &mut out).await?;
        }
        Commands::Feed { samples } => {
            commands::run_feed(&dashboard, samples, &mut out).await?;
        }
    }

    Ok(())
}

fn read_password() -> std::io::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
