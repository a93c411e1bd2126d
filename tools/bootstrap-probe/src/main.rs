//! Bootstrap probe for the Parley widget
//!
//! Runs the same bootstrap a freshly mounted widget would, against a live
//! backend, and prints each loading message and the screen it lands on.
//! Settings come from the environment (and `.env`); flags override them.

use anyhow::{Context, Result};
use clap::Parser;
use parley_core::{
    config::BACKEND_URL_VAR, init_logging, load_env, load_env_from_path, ContactSessionId,
    Logger, OrganizationId, WidgetConfig,
};
use parley_storage_convex::ConvexClient;
use parley_widget::{BootstrapOptions, BootstrapSequencer, ContactSessionStore, WidgetController};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend deployment URL (defaults to PARLEY_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Organization to bootstrap for (defaults to PARLEY_ORGANIZATION_ID)
    #[arg(short, long)]
    organization_id: Option<String>,

    /// Cached contact session to verify
    #[arg(short, long)]
    session_id: Option<String>,

    /// Per-validator timeout in milliseconds (defaults to PARLEY_VALIDATION_TIMEOUT_MS)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print updates as JSON lines
    #[arg(long)]
    json: bool,

    /// Load environment from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

fn resolve_config(cli: &Cli) -> Result<WidgetConfig> {
    let mut config = WidgetConfig::from_env_with_backend(cli.backend_url.clone())
        .with_context(|| {
            format!("pass --backend-url or set {} in the environment", BACKEND_URL_VAR)
        })?;

    if let Some(org) = &cli.organization_id {
        config = config.with_organization_id(org.clone());
    }
    if let Some(ms) = cli.timeout_ms {
        config = config.with_validation_timeout(Duration::from_millis(ms));
    }
    config.validate()?;
    Ok(config)
}

fn session_store(organization_id: Option<&str>, session_id: Option<&str>) -> ContactSessionStore {
    let mut store = ContactSessionStore::new();
    let organization_id = OrganizationId::parse_optional(organization_id);
    let session_id = ContactSessionId::parse_optional(session_id);
    if let (Some(org), Some(session)) = (organization_id, session_id) {
        store.set(org, session);
    }
    store
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => load_env_from_path(path)?,
        None => load_env()?,
    }
    init_logging();
    let log = Logger::new("bootstrap-probe");

    let config = resolve_config(&cli)?;
    log.debug(&format!(
        "backend={} timeout={:?} authenticated={}",
        config.backend_url,
        config.validation_timeout,
        config.auth_token.is_some()
    ));

    let client = Arc::new(
        ConvexClient::from_widget_config(&config).context("failed to build backend client")?,
    );
    let sequencer = BootstrapSequencer::new(client.clone(), client)
        .with_options(BootstrapOptions::from(&config));
    let store = session_store(config.organization_id.as_deref(), cli.session_id.as_deref());
    let mut controller = WidgetController::new(sequencer, store);

    let mount = controller.mount().clone();
    let interrupt_log = log.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt_log.warn("interrupted; unmounting widget");
            mount.unmount();
        }
    });

    let json = cli.json;
    let screen = controller
        .bootstrap_with(config.organization_id.as_deref(), |update| {
            if json {
                match serde_json::to_string(update) {
                    Ok(line) => println!("{}", line),
                    Err(e) => eprintln!("cannot encode update: {}", e),
                }
            } else if !update.is_final() {
                println!("{}", update.status);
            }
        })
        .await?;

    if !json {
        match controller.state().error_message() {
            Some(reason) => println!("screen: {} ({})", screen, reason),
            None => println!("screen: {}", screen),
        }
        if let Some(org) = controller.mount().organization_id() {
            println!("organization: {}", org);
        }
    }

    log.info(&format!("bootstrap finished on {} screen", screen));
    Ok(())
}
