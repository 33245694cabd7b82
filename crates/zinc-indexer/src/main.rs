//! `zinc-indexer` command line.
//!
//! Runs the scanner against an Insight API, or answers queries from an
//! existing index database.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use zinc_chain::InsightClient;
use zinc_indexer::{Indexer, IndexerConfig, IndexerError, MemoryStore, SqliteStore, Store};
use zinc_script::Network;

#[derive(Parser, Debug)]
#[command(name = "zinc-indexer")]
#[command(version)]
#[command(about = "Zinc inscription indexer and ZRC-20 ledger", long_about = None)]
struct Cli {
    /// JSON config file. Flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Insight API base URL.
    #[arg(long)]
    url: Option<String>,

    /// mainnet or testnet.
    #[arg(long)]
    network: Option<Network>,

    /// First block to scan when the index is empty.
    #[arg(long)]
    start_height: Option<u32>,

    /// SQLite database path.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Treasury address excluded from transfer recipients.
    #[arg(long)]
    treasury: Option<String>,

    /// Log filter, e.g. `info` or `zinc_indexer=debug`.
    #[arg(long)]
    log: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// Scan continuously until interrupted (the default).
    Run,
    /// Run a single scan cycle and exit.
    ScanOnce,
    /// Print one token balance.
    Balance {
        /// Holder address.
        address: String,
        /// Token ticker.
        ticker: String,
    },
    /// Print every token balance of an address.
    Balances {
        /// Holder address.
        address: String,
    },
    /// Print a token deployment.
    Deploy {
        /// Token ticker.
        ticker: String,
    },
    /// Print the inscription recorded for a transaction.
    Inscription {
        /// Display-order txid.
        txid: String,
    },
    /// Print the scan cursor.
    Cursor,
}

fn load_config(cli: &Cli) -> Result<IndexerConfig, IndexerError> {
    let mut config = match &cli.config {
        Some(path) => IndexerConfig::load(path)?,
        None => IndexerConfig::default(),
    };

    if let Some(url) = &cli.url {
        config.chain.base_url = url.clone();
    }
    if let Some(network) = cli.network {
        config.chain.network = network;
    }
    if let Some(height) = cli.start_height {
        config.protocol.start_height = height;
    }
    if let Some(db) = &cli.db {
        config.store_path = Some(db.clone());
    }
    if let Some(treasury) = &cli.treasury {
        config.protocol.treasury_address = Some(treasury.clone());
    }
    if let Some(filter) = &cli.log {
        config.log_filter = filter.clone();
    }

    config.validate()?;
    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), IndexerError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn execute<S: Store>(
    command: Command,
    config: IndexerConfig,
    store: S,
) -> Result<(), IndexerError> {
    let chain = InsightClient::new(config.chain.clone())?;
    let mut indexer = Indexer::new(chain, store, config);

    match command {
        Command::Run => {
            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("interrupt received, stopping after the current step");
                    on_signal.cancel();
                }
            });
            indexer.run(cancel).await;
        }
        Command::ScanOnce => {
            let report = indexer.scan_once(&CancellationToken::new()).await?;
            tracing::info!(?report, "scan finished");
        }
        Command::Balance { address, ticker } => {
            println!("{}", indexer.balance(&address, &ticker)?);
        }
        Command::Balances { address } => print_json(&indexer.balances_of(&address)?)?,
        Command::Deploy { ticker } => print_json(&indexer.deploy(&ticker)?)?,
        Command::Inscription { txid } => print_json(&indexer.inscription(&txid)?)?,
        Command::Cursor => print_json(&indexer.cursor()?)?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let command = cli.command.unwrap_or(Command::Run);
    let result = match config.store_path.clone() {
        Some(path) => {
            tracing::info!(path = %path.display(), "using SQLite store");
            match SqliteStore::open(&path) {
                Ok(store) => execute(command, config, store).await,
                Err(e) => Err(e),
            }
        }
        None => {
            tracing::warn!("no store_path configured, index is kept in memory only");
            execute(command, config, MemoryStore::new()).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
