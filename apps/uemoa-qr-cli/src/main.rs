//! # uemoa-qr
//!
//! Command-line front end for generating and inspecting UEMOA payment QR
//! payloads.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  clap args ──► QrConfig::load ──► QrService ──► stdout (payload/JSON)  │
//! │                                       │                                 │
//! │                                       └──► TerminalRenderer (--show)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uemoa_qr_core::{Amount, QrType};
use uemoa_qr_service::QrConfig;

#[derive(Parser)]
#[command(name = "uemoa-qr")]
#[command(about = "Generate and inspect UEMOA/BCEAO payment QR codes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a payload
    Generate(GenerateArgs),

    /// Parse a payload and print the payment intent as JSON
    Parse {
        /// Payload text
        data: String,
    },

    /// Check a payload (exit status 0 when valid)
    Validate {
        /// Payload text
        data: String,
    },

    /// Print a summary of a payload as JSON
    Details {
        /// Payload text
        data: String,
    },

    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args)]
pub struct GenerateArgs {
    /// QR variant: static, dynamic, or p2p
    #[arg(short = 't', long = "type")]
    pub qr_type: Option<QrType>,

    /// Account alias (usually a UUID)
    #[arg(long)]
    pub alias: Option<String>,

    /// Merchant or beneficiary name
    #[arg(long)]
    pub name: Option<String>,

    /// Merchant city
    #[arg(long)]
    pub city: Option<String>,

    /// Country code (defaults to the configured country)
    #[arg(long)]
    pub country: Option<String>,

    /// Amount in XOF
    #[arg(short, long)]
    pub amount: Option<Amount>,

    /// Transaction identifier
    #[arg(long)]
    pub tx_id: Option<String>,

    /// Invoice reference
    #[arg(long)]
    pub bill_ref: Option<String>,

    /// Subscription identifier
    #[arg(long)]
    pub subscription_id: Option<String>,

    /// Merchant channel code (100, 110, 120, 131, 500, 521, 522, 731)
    #[arg(long)]
    pub channel: Option<u16>,

    /// PSP URL for dynamic codes
    #[arg(long)]
    pub url: Option<String>,

    /// Extra additional-data sub-field, repeatable
    #[arg(long = "extra", value_name = "TAG=VALUE", value_parser = commands::parse_extra)]
    pub extra: Vec<(String, String)>,

    /// Read the payment intent from a JSON file; flags above override it
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Also draw the code in the terminal
    #[arg(long)]
    pub show: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Write a default configuration file
    Init {
        /// Target path (defaults to the platform config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(debug: bool) {
    let default = if debug {
        "uemoa_qr=debug,uemoa_qr_service=debug,uemoa_qr_core=debug"
    } else {
        "uemoa_qr=info,uemoa_qr_service=warn,uemoa_qr_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Config is read before the subscriber exists so debug_mode can pick the level
    let loaded = QrConfig::load(cli.config.clone());
    let debug = cli.verbose || loaded.as_ref().map(|c| c.debug_mode).unwrap_or(false);
    init_tracing(debug);

    if let Commands::Config {
        action: ConfigAction::Init { path, force },
    } = &cli.command
    {
        commands::config_init(path.clone().or(cli.config.clone()), *force)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = loaded?;
    let service = commands::build_service(config);

    match cli.command {
        Commands::Generate(args) => commands::generate(&service, args)?,
        Commands::Parse { data } => commands::parse(&service, &data)?,
        Commands::Validate { data } => return Ok(commands::validate(&service, &data)),
        Commands::Details { data } => commands::details(&service, &data)?,
        Commands::Config {
            action: ConfigAction::Show,
        } => commands::config_show(service.config())?,
        Commands::Config {
            action: ConfigAction::Init { .. },
        } => {}
    }

    Ok(ExitCode::SUCCESS)
}
