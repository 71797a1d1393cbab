use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::VehicleCategory;

/// oilguide - vehicle lubricant reference lookup
#[derive(Parser)]
#[command(name = "oilguide")]
#[command(about = "Look up recommended lubricant specifications for a vehicle")]
#[command(version)]
pub struct Cli {
    /// Path to a vehicle catalog JSON file (defaults to the built-in sample data)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Directory holding account and session data
    /// (defaults to $OILGUIDE_DATA_DIR, then ./.oilguide)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account (3 free searches) and sign in
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Sign in to an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out of the current session
    Logout,
    /// Show the signed-in account and its entitlement
    Account,
    /// Activate the premium subscription (stub payment flow, 30 days)
    Subscribe,
    /// List brands, optionally filtered by category
    Brands {
        /// car, motorcycle, truck or agricultural
        #[arg(long)]
        category: Option<VehicleCategory>,
    },
    /// List models of a brand
    Models {
        #[arg(long)]
        brand: u32,
    },
    /// List model years of a model
    Years {
        #[arg(long)]
        model: u32,
    },
    /// List versions of a model year
    Versions {
        #[arg(long)]
        year: u32,
    },
    /// Run a gated specification search for a selected vehicle
    Search {
        #[arg(long)]
        brand: u32,
        #[arg(long)]
        model: u32,
        #[arg(long)]
        year: u32,
        /// Optional; without it the search covers every version of the year
        #[arg(long)]
        version: Option<u32>,
        /// Print a share-ready plain-text block instead of sections
        #[arg(long)]
        share: bool,
    },
    /// Validate a catalog file
    Validate {
        /// Path to the catalog JSON file to validate
        catalog: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
