//! EVM Bridge Console
//!
//! Sends a fixed USDC transfer between Sepolia and Base Sepolia through a
//! local wallet extension.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI command
//!       │
//!       ▼
//!   ┌───────────┐   select source   ┌─────────────────┐   config   ┌──────────┐
//!   │ BridgeApp │──────────────────▶│ ProviderSession │◀───────────│ registry │
//!   └─────┬─────┘                   └────────┬────────┘            └────┬─────┘
//!         │ connect / send                   │ provider + signer         │
//!         ▼                                  ▼                           │
//!   ┌───────────┐  ┌──────────────────┐  ┌──────────────┐               │
//!   │ connector │  │ TransferExecutor │─▶│ NetworkSwitch│◀──────────────┘
//!   └───────────┘  └────────┬─────────┘  └──────────────┘
//!                           ▼
//!                    wallet extension ──▶ JSON-RPC
//! ```

use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use evm_bridge_console::app::{ActionOutcome, BridgeApp};
use evm_bridge_console::config::{load_or_default, BridgeConfig};
use evm_bridge_console::history::HttpHistorySource;
use evm_bridge_console::network::NetworkRegistry;
use evm_bridge_console::observability::{logging, metrics};
use evm_bridge_console::wallet::{
    approve_all, Approver, LocalWalletExtension, WalletExtension, WalletPrompt,
};

#[derive(Parser)]
#[command(name = "evm-bridge-console")]
#[command(about = "Fixed-amount USDC bridge between Sepolia and Base Sepolia", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Approve every wallet prompt without asking
    #[arg(short, long)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported networks and their counterparts
    Networks,
    /// Show provider mode, chain id and latest block
    Status {
        #[arg(long)]
        from: Option<String>,
    },
    /// Authorize the wallet and show the connected address
    Connect {
        #[arg(long)]
        from: Option<String>,
    },
    /// Send the fixed transfer on the source network
    Send {
        #[arg(long)]
        from: Option<String>,
    },
    /// Print bridge history
    History,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("evm-bridge-console v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let registry = NetworkRegistry::from_config(&config)?;
    let auto_approve = cli.yes || config.wallet.auto_approve;

    let outcome = match cli.command {
        Commands::Networks => list_networks(&registry)?,
        Commands::Status { from } => {
            let mut app = build_app(&config, &registry, auto_approve).await?;
            match select(&mut app, from).await {
                Some(failed) => failed,
                None => show_status(&app).await,
            }
        }
        Commands::Connect { from } => {
            let mut app = build_app(&config, &registry, auto_approve).await?;
            match select(&mut app, from).await {
                Some(failed) => failed,
                None => app.connect().await,
            }
        }
        Commands::Send { from } => {
            let mut app = build_app(&config, &registry, auto_approve).await?;
            match select(&mut app, from).await {
                Some(failed) => failed,
                None => {
                    println!(
                        "Bridging {} -> {}",
                        app.source_network(),
                        app.destination_label()
                    );
                    app.send().await
                }
            }
        }
        Commands::History => {
            let app = build_app(&config, &registry, auto_approve).await?;
            history_command(&config, &app)
        }
    };

    Ok(report(outcome))
}

async fn build_app(
    config: &BridgeConfig,
    registry: &NetworkRegistry,
    auto_approve: bool,
) -> Result<BridgeApp, Box<dyn std::error::Error>> {
    let approver = if auto_approve {
        approve_all()
    } else {
        stdin_approver()
    };
    let home = registry.config(config.source_network)?;
    let extension = LocalWalletExtension::detect(&config.wallet, home, approver)
        .map(|ext| Arc::new(ext) as Arc<dyn WalletExtension>);

    let history = Arc::new(HttpHistorySource::new(&config.history)?);
    Ok(BridgeApp::start(config, extension, history).await?)
}

fn list_networks(registry: &NetworkRegistry) -> Result<ActionOutcome, Box<dyn std::error::Error>> {
    for network in registry.iter() {
        let destination = registry.config(registry.destination_of(network.name))?;
        println!(
            "{:<12} {:<13} chain {:<10} token {}  -> {}",
            network.name.as_str(),
            network.display_name,
            network.chain_id_hex,
            network.token_contract_address,
            destination.display_name
        );
    }
    Ok(ActionOutcome::Success(format!(
        "{} networks",
        registry.iter().count()
    )))
}

async fn show_status(app: &BridgeApp) -> ActionOutcome {
    match app.status().await {
        Some(status) => {
            println!("{}", status);
            println!("destination: {}", app.destination_label());
            ActionOutcome::Success("Status read".to_string())
        }
        None => ActionOutcome::Failed {
            message: "Session not initialized.".to_string(),
            retryable: true,
        },
    }
}

/// Apply `--from`, returning the failure if the selection was rejected.
async fn select(app: &mut BridgeApp, from: Option<String>) -> Option<ActionOutcome> {
    let name = from?;
    match app.select_source_network(&name).await {
        ActionOutcome::Success(message) => {
            println!("{}", message);
            None
        }
        failed => Some(failed),
    }
}

/// Print the history fetched at startup.
fn history_command(config: &BridgeConfig, app: &BridgeApp) -> ActionOutcome {
    if !config.history.enabled {
        return ActionOutcome::Success("History is disabled".to_string());
    }
    let records = app.history();
    if records.is_empty() {
        return ActionOutcome::Success("No history".to_string());
    }
    for record in records {
        println!("{}", record);
    }
    ActionOutcome::Success(format!("{} records", records.len()))
}

fn report(outcome: ActionOutcome) -> ExitCode {
    match outcome {
        ActionOutcome::Success(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        ActionOutcome::Failed { message, retryable } => {
            eprintln!("Error: {}", message);
            if retryable {
                eprintln!("You can retry this action.");
            }
            ExitCode::FAILURE
        }
    }
}

/// Ask on the terminal before every wallet action, like an extension pop-up.
fn stdin_approver() -> Approver {
    Arc::new(|prompt: &WalletPrompt| {
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "[wallet] {} [y/N] ", prompt);
        let _ = stderr.flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    })
}
