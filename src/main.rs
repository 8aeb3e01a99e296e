//! commhub - Agent communication hub.
//!
//! Registry, message relay with bounded per-agent history, and a proxy to
//! the external agent-memory service, served over one HTTP API.

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use commhub::broker::MessageBroker;
use commhub::config::{load_settings, Settings};
use commhub::memory::MemoryClient;
use commhub::registry::AgentRegistry;
use commhub::storage::{LocalStore, Store};
use commhub::transport::{LocalBus, PubSub};
use commhub::web::{run_server, AppState};
use commhub::{logging, Result};

/// commhub - Agent communication hub.
#[derive(Parser)]
#[command(name = "commhub")]
#[command(version = "0.1.0")]
#[command(about = "Agent communication hub - registry, message relay, and memory proxy")]
struct Cli {
    /// Bind address (overrides SERVER_HOST).
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides SERVER_PORT).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(host) = cli.host {
        settings.server.host = host;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    let _guard = match logging::init(&settings.logging) {
        Ok((guard, _log_dir)) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: Settings) -> Result<()> {
    let bus: Arc<dyn PubSub> = Arc::new(LocalBus::new());
    let store: Arc<dyn Store> = Arc::new(LocalStore::new());

    let broker = Arc::new(MessageBroker::new(
        Arc::clone(&bus),
        Arc::clone(&store),
        &settings,
    ));
    let registry = Arc::new(AgentRegistry::new(Arc::clone(&store)));
    let memory = Arc::new(MemoryClient::new(&settings.memory)?);

    let state = AppState {
        broker,
        registry,
        memory,
        bus,
        store,
    };

    run_server(&settings.server, state).await
}
