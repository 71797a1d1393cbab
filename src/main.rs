//! oilguide - Main entry point
//!
//! Thin command-line driver over the library: account/session handling,
//! catalog listing, and the gated specification search.

mod account;
mod catalog;
mod cli;
mod entitlement;
mod error;
mod gate;
mod resolver;
mod search;
mod selection;
mod types;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::info;

use crate::account::AccountStore;
use crate::catalog::MemoryCatalog;
use crate::cli::{Cli, Commands};
use crate::gate::QuotaGate;
use crate::resolver::SpecGroups;
use crate::search::{run_search, SearchOutcome};
use crate::selection::CascadeController;

/// Premium activations last 30 days (stub payment flow).
const PREMIUM_PERIOD: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Initialize the tracing subscriber with appropriate settings
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            // RUST_LOG env var overrides the default level
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();
}

/// Main application entry point
fn main() -> Result<()> {
    init_tracing();
    info!("oilguide starting up");

    let Cli {
        catalog,
        data_dir,
        command,
    } = Cli::parse_args();

    let data_dir = resolve_data_dir(data_dir);
    let store = AccountStore::open(&data_dir)
        .with_context(|| format!("failed to open data directory {data_dir:?}"))?;

    match command {
        Commands::Signup {
            email,
            password,
            phone,
        } => {
            let account = store.sign_up(&email, &password, phone.as_deref())?;
            println!(
                "✓ Account created for {} ({} free searches)",
                account.email, account.entitlement.searches_remaining
            );
        }
        Commands::Login { email, password } => {
            let account = store.sign_in(&email, &password)?;
            println!("✓ Signed in as {}", account.email);
        }
        Commands::Logout => {
            store.sign_out()?;
            println!("✓ Signed out");
        }
        Commands::Account => {
            let email = require_user(&store)?;
            let account = store
                .load_account(&email)?
                .with_context(|| format!("account record for {email} is missing"))?;
            println!("Account: {}", account.email);
            if let Some(phone) = &account.phone {
                println!("Phone:   {phone}");
            }
            print_entitlement_line(&account.entitlement);
        }
        Commands::Subscribe => {
            let email = require_user(&store)?;
            let mut gate = QuotaGate::load(&store, &email)?;
            let expires_at = unix_now() + PREMIUM_PERIOD.as_secs();
            gate.grant_premium(expires_at)?;
            println!("✓ Premium activated (expires at unix time {expires_at})");
        }
        Commands::Brands { category } => {
            let catalog = load_catalog(catalog.as_deref())?;
            use crate::catalog::VehicleCatalog;
            for brand in catalog.list_brands()? {
                if category.is_none_or(|c| brand.category == c) {
                    println!("{:>4}  {} ({})", brand.id, brand.name, brand.category);
                }
            }
        }
        Commands::Models { brand } => {
            let catalog = load_catalog(catalog.as_deref())?;
            let mut cascade = CascadeController::new(&catalog)?;
            cascade.set_brand(brand)?;
            for model in cascade.state().model_options() {
                println!("{:>4}  {}", model.id, model.name);
            }
        }
        Commands::Years { model } => {
            let catalog = load_catalog(catalog.as_deref())?;
            use crate::catalog::VehicleCatalog;
            for year in catalog.list_years(model)? {
                println!("{:>4}  {}", year.id, year.year);
            }
        }
        Commands::Versions { year } => {
            let catalog = load_catalog(catalog.as_deref())?;
            use crate::catalog::VehicleCatalog;
            for version in catalog.list_versions(year)? {
                println!("{:>4}  {}", version.id, version.name);
            }
        }
        Commands::Search {
            brand,
            model,
            year,
            version,
            share,
        } => {
            let catalog = load_catalog(catalog.as_deref())?;
            let email = require_user(&store)?;
            run_search_command(&catalog, &store, &email, brand, model, year, version, share)?;
        }
        Commands::Validate { catalog } => match MemoryCatalog::load_from_file(&catalog) {
            Ok(loaded) => {
                println!(
                    "✓ Catalog file is valid: {:?} ({} brands, {} specifications)",
                    catalog,
                    loaded.data().brands.len(),
                    loaded.data().specifications.len()
                );
            }
            Err(e) => {
                eprintln!("✗ Catalog validation failed: {e}");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os("OILGUIDE_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(".oilguide"))
}

fn load_catalog(path: Option<&Path>) -> Result<MemoryCatalog> {
    match path {
        Some(path) => Ok(MemoryCatalog::load_from_file(path)?),
        None => Ok(MemoryCatalog::sample()),
    }
}

fn require_user(store: &AccountStore) -> Result<String> {
    match store.current_user()? {
        Some(email) => Ok(email),
        None => bail!("no user signed in; run `oilguide signup` or `oilguide login` first"),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_search_command(
    catalog: &MemoryCatalog,
    store: &AccountStore,
    email: &str,
    brand: u32,
    model: u32,
    year: u32,
    version: Option<u32>,
    share: bool,
) -> Result<()> {
    // Walk the cascade so the ids are validated level by level, exactly as
    // an interactive selection would be.
    let mut cascade = CascadeController::new(catalog)?;
    cascade.set_brand(brand)?;
    cascade.set_model(model)?;
    cascade.set_year(year)?;
    if let Some(version) = version {
        cascade.set_version(version)?;
    }
    let selection = cascade
        .selection()
        .context("selection is incomplete after brand, model and year were chosen")?;

    let mut gate = QuotaGate::load(store, email)?;
    match run_search(catalog, &mut gate, &selection)? {
        SearchOutcome::Denied(reason) => {
            eprintln!("✗ Search denied: {reason}");
            eprintln!("  Upgrade with `oilguide subscribe` for unlimited searches.");
            std::process::exit(1);
        }
        SearchOutcome::Results(groups) if groups.is_empty() => {
            println!("No specifications found for this selection.");
        }
        SearchOutcome::Results(groups) => {
            if share {
                println!("{}", groups.share_text());
            } else {
                print_groups(&groups);
            }
        }
    }
    print_entitlement_line(gate.entitlement());
    Ok(())
}

fn print_groups(groups: &SpecGroups) {
    for group in groups.iter() {
        println!("{}", group.subsystem.label());
        for spec in &group.specs {
            print_field("API", spec.api.as_deref());
            print_field("ACEA", spec.acea.as_deref());
            print_field("Dexos", spec.dexos.as_deref());
            print_field("Viscosity", spec.viscosity.as_deref());
            print_field("OEM", spec.oem.as_deref());
            print_field("Notes", spec.notes.as_deref());
        }
        println!();
    }
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        if !value.is_empty() {
            println!("  {label}: {value}");
        }
    }
}

fn print_entitlement_line(entitlement: &crate::entitlement::Entitlement) {
    if entitlement.is_premium {
        println!("Premium: unlimited searches");
    } else {
        println!("Searches remaining: {}", entitlement.searches_remaining);
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
