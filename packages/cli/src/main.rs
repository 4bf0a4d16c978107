//! FarmChainX command-line client.
//!
//! Talks to a FarmChainX server when one is reachable and falls back to the
//! local JSON store when it is not, so the tool keeps working offline.

mod api;
mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::commands::Ctx;
use crate::commands::crop::{CropFields, HandoffArgs};
use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "farmchainx")]
#[command(version, about = "Track crops from farm to shelf")]
struct Cli {
    /// Base URL of the FarmChainX server.
    #[arg(long, env = "FARMCHAINX_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account (password prompted)
    Signup {
        #[arg(long)]
        email: String,
        /// farmer, distributor, retailer, consumer, or admin
        #[arg(long)]
        role: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Sign in (password prompted)
    Signin {
        #[arg(long)]
        email: String,
    },
    /// Drop the saved token and local session
    Signout,
    /// Show the signed-in profile
    Whoami,
    /// Record and manage crops
    Crop {
        #[command(subcommand)]
        action: CropAction,
    },
    /// Resolve a scanned QR payload into a provenance report
    Scan { payload: String },
    /// Look up suppliers by their 3-digit code
    Supplier {
        #[command(subcommand)]
        action: SupplierAction,
    },
    /// Analysis, weather, price and chatbot widgets
    Insights {
        #[command(subcommand)]
        action: InsightsAction,
    },
    /// Dump the whole data set as JSON
    Export {
        /// Write to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the data set with an exported document
    Import { path: PathBuf },
}

#[derive(Subcommand)]
enum CropAction {
    /// List your crops, newest first
    List,
    /// Record a new crop
    Add {
        #[command(flatten)]
        fields: CropFields,
    },
    /// Show one crop in full
    Show { id: Uuid },
    /// Update fields on a crop you hold
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: CropFields,
    },
    /// Delete a crop you hold
    Delete { id: Uuid },
    /// Copy a supplier's crop into your inventory
    Acquire {
        /// The supplier's crop id.
        id: Uuid,
        /// The supplier's 3-digit code.
        #[arg(long)]
        supplier: String,
    },
    /// Record receipt/dispatch details on a crop you hold
    Handoff {
        id: Uuid,
        #[command(flatten)]
        args: HandoffArgs,
    },
    /// Show a crop's audit trail
    Trace { id: Uuid },
}

#[derive(Subcommand)]
enum SupplierAction {
    /// List the crops offered under a supplier code
    Crops {
        code: String,
        /// Treat the code as a distributor code instead of a farmer code.
        #[arg(long)]
        distributor: bool,
    },
}

#[derive(Subcommand)]
enum InsightsAction {
    /// Current weather for a location
    Weather {
        #[arg(long)]
        location: Option<String>,
    },
    /// Market price trend for a crop type
    Prices {
        #[arg(long = "type")]
        crop_type: Option<String>,
        #[arg(long)]
        days: Option<u32>,
    },
    /// Quality analysis of a recorded crop
    Analyze { crop_id: Uuid },
    /// Ask the farming assistant a question
    Ask { message: Vec<String> },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = config::config_path()?;
    let mut config = CliConfig::load(&config_path)?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    let api = ApiClient::new(config.api_url.clone(), config.token.clone());
    let mut ctx = Ctx {
        api,
        config,
        config_path,
    };

    match cli.command {
        Commands::Signup {
            email,
            role,
            name,
            location,
        } => commands::auth::sign_up(&mut ctx, &email, &role, name, location),
        Commands::Signin { email } => commands::auth::sign_in(&mut ctx, &email),
        Commands::Signout => commands::auth::sign_out(&mut ctx),
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Crop { action } => match action {
            CropAction::List => commands::crop::list(&ctx),
            CropAction::Add { fields } => commands::crop::add(&ctx, &fields),
            CropAction::Show { id } => commands::crop::show(&ctx, id),
            CropAction::Update { id, fields } => commands::crop::update(&ctx, id, &fields),
            CropAction::Delete { id } => commands::crop::delete(&ctx, id),
            CropAction::Acquire { id, supplier } => commands::crop::acquire(&ctx, id, &supplier),
            CropAction::Handoff { id, args } => commands::crop::handoff(&ctx, id, &args),
            CropAction::Trace { id } => commands::crop::trace(&ctx, id),
        },
        Commands::Scan { payload } => commands::scan::scan(&ctx, &payload),
        Commands::Supplier { action } => match action {
            SupplierAction::Crops { code, distributor } => {
                commands::supplier::crops(&ctx, &code, distributor)
            }
        },
        Commands::Insights { action } => match action {
            InsightsAction::Weather { location } => {
                commands::insights::weather(&ctx, location.as_deref())
            }
            InsightsAction::Prices { crop_type, days } => {
                commands::insights::prices(&ctx, crop_type.as_deref(), days)
            }
            InsightsAction::Analyze { crop_id } => commands::insights::analyze(&ctx, crop_id),
            InsightsAction::Ask { message } => commands::insights::ask(&ctx, &message.join(" ")),
        },
        Commands::Export { out } => commands::data::export(&ctx, out.as_deref()),
        Commands::Import { path } => commands::data::import(&ctx, &path),
    }
}
