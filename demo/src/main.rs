//! capgate demo CLI
//!
//! Drives the install lifecycle, the admin save flow, and permission checks
//! against a site held in a JSON snapshot file. Every command loads the
//! snapshot, runs once, and writes the snapshot back.
//!
//! Usage:
//!   cargo run -p demo -- init
//!   cargo run -p demo -- activate
//!   cargo run -p demo -- save --role administrator=on --role editor=0 --users "4, 15"
//!   cargo run -p demo -- check --user 4 --cap amelia_read_finance
//!   cargo run -p demo -- report --sort login
//!   cargo run -p demo -- uninstall

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use capgate_contracts::{
    actor::UserId,
    capability::Capability,
    config::GateConfig,
    error::CapgateResult,
    grant::AdminForm,
    outcome::ReportSort,
};
use capgate_core::{lifecycle, AccessManager};
use capgate_store::{InMemoryPermissionStore, InMemorySettingsStore, SiteSnapshot};

// ── CLI definition ────────────────────────────────────────────────────────────

/// capgate: grant a capability catalog to chosen roles and users.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "capgate capability-grant demo",
    long_about = "Runs capgate lifecycle hooks, the admin save flow, and permission\n\
                  checks against a site stored in a JSON snapshot file."
)]
struct Cli {
    /// Site snapshot file.
    #[arg(long, global = true, default_value = "site.json")]
    site: PathBuf,

    /// Optional gate configuration (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a sample site with a few roles and users.
    Init {
        /// Overwrite an existing snapshot.
        #[arg(long)]
        force: bool,
    },
    /// Run the activation hook.
    Activate,
    /// Submit the admin form.
    Save {
        /// Role toggle as NAME=VALUE, e.g. `editor=on`. Repeatable.
        #[arg(long = "role", value_parser = parse_role_toggle)]
        roles: Vec<(String, String)>,
        /// Comma-separated user IDs.
        #[arg(long, default_value = "")]
        users: String,
        /// Force-override flag as submitted (`1`, `on`, `yes`, ...).
        #[arg(long, default_value = "")]
        force_override: String,
    },
    /// Check one capability for one user.
    Check {
        #[arg(long)]
        user: u64,
        #[arg(long)]
        cap: String,
    },
    /// List users that hold catalog capabilities.
    Report {
        #[arg(long, value_enum, default_value_t = SortArg::Id)]
        sort: SortArg,
        /// Maximum number of users to scan.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the stored settings and per-role catalog counts.
    Show,
    /// Run the deactivation hook.
    Deactivate,
    /// Run the uninstall hook.
    Uninstall,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Id,
    Login,
}

impl From<SortArg> for ReportSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Id => ReportSort::Id,
            SortArg::Login => ReportSort::Login,
        }
    }
}

fn parse_role_toggle(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to see every capability write.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    if let Err(e) = run(cli) {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CapgateResult<()> {
    let config = capgate_config::load_or_default(cli.config.as_deref())?;

    if let Command::Init { force } = cli.command {
        return init_site(&cli.site, force);
    }

    let (settings, permissions) = SiteSnapshot::load(&cli.site)?.into_stores();
    let manager = AccessManager::new(
        config,
        Arc::new(settings.clone()),
        Arc::new(permissions.clone()),
    );

    match cli.command {
        Command::Init { .. } => {}
        Command::Activate => {
            let report = lifecycle::activate(&manager)?;
            println!("Activated. Roles holding the catalog: {}", join(&report.granted_roles));
        }
        Command::Save {
            roles,
            users,
            force_override,
        } => {
            let role_grants: serde_json::Map<String, Value> = roles
                .into_iter()
                .map(|(name, value)| (name, Value::String(value)))
                .collect();
            let outcome = manager.save_from_form(&AdminForm {
                role_grants: Value::Object(role_grants),
                user_ids: users,
                force_override: Value::String(force_override),
            })?;
            println!("{}", outcome.message);
            println!("  roles: {}", join(&outcome.report.granted_roles));
            println!("  users: {}", outcome.settings.user_ids.to_text());
        }
        Command::Check { user, cap } => {
            let capability = Capability::new(cap);
            let allowed = manager.user_can(UserId(user), &capability)?;
            println!(
                "user {} {} '{}'",
                user,
                if allowed { "HAS" } else { "does NOT have" },
                capability
            );
        }
        Command::Report { sort, limit } => {
            let report = manager.access_report(limit, sort.into())?;
            for row in &report.users {
                println!(
                    "{:>6}  {:<16} {:<28} {} capabilities",
                    row.id,
                    row.login,
                    row.email,
                    row.capabilities.len()
                );
            }
            if report.truncated {
                println!("(scanned the first users only; {} in total)", report.total_users);
            }
        }
        Command::Show => show(&manager)?,
        Command::Deactivate => {
            let strip = lifecycle::deactivate(&manager)?;
            println!("Deactivated. Stripped {} roles and {} users.", strip.roles, strip.users);
        }
        Command::Uninstall => {
            let (keys, strip) = lifecycle::uninstall(&manager)?;
            println!(
                "Uninstalled. Removed {} settings keys; stripped {} roles and {} users.",
                keys, strip.roles, strip.users
            );
        }
    }

    SiteSnapshot::from_stores(&settings, &permissions)?.save(&cli.site)
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn init_site(path: &Path, force: bool) -> CapgateResult<()> {
    if path.exists() && !force {
        println!("{} already exists; pass --force to overwrite.", path.display());
        return Ok(());
    }

    let settings = InMemorySettingsStore::new();
    let permissions = InMemoryPermissionStore::new();
    let users: [(u64, &str, &str); 5] = [
        (1, "admin", "administrator"),
        (4, "dana", "subscriber"),
        (15, "eli", "editor"),
        (23, "fay", "staff"),
        (30, "gus", "author"),
    ];
    for role in ["administrator", "editor", "author", "subscriber", "staff"] {
        permissions.add_role(role)?;
    }
    for (id, login, role) in users {
        let email = format!("{}@example.test", login);
        permissions.add_user(UserId(id), login, &email, [role])?;
    }

    SiteSnapshot::from_stores(&settings, &permissions)?.save(path)?;
    info!(path = %path.display(), "sample site created");
    println!("Sample site written to {}", path.display());
    Ok(())
}

fn show(manager: &AccessManager) -> CapgateResult<()> {
    let current = manager.load_settings()?;
    let config: &GateConfig = manager.config();

    println!("Staff role:     {}", config.staff_role);
    println!("Force override: {}", if current.force_override { "on" } else { "off" });
    println!("User IDs:       {}", current.user_ids.to_text());
    println!("Role grants:");
    for (role, enabled) in current.role_grants.iter() {
        println!("  {:<16} {}", role, if *enabled { "on" } else { "off" });
    }

    let counts: BTreeMap<String, usize> = manager.role_capability_counts()?;
    println!("Catalog capabilities held ({} in catalog):", manager.catalog().len());
    for (role, count) in counts {
        println!("  {:<16} {}", role, count);
    }
    Ok(())
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    let names: Vec<&str> = items.into_iter().map(String::as_str).collect();
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("capgate: capability-grant resolver");
    println!("==================================");
    println!();
}
