//! blockwatchd: follows an Ethereum node and serves watched-address
//! transactions over REST.
//!
//! ```text
//! blockwatchd --rpc-url <url> --listen 0.0.0.0:8080 --subscribe 0xabc...
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use blockwatch_core::config::{CatchUpMode, ReorgPolicy, SyncConfig};
use blockwatch_core::error::SyncError;
use blockwatch_rpc::{EthChainClient, HttpClientConfig};
use blockwatch_storage::InMemoryRegistry;
use blockwatch_sync::{BlockParser, SyncEngine, SyncEngineBuilder};

mod logging;

use logging::{init_tracing, LogConfig};

#[derive(Debug, Parser)]
#[command(
    name = "blockwatchd",
    about = "Ethereum block sync daemon with a watched-address REST API",
    long_about = "
Polls an Ethereum JSON-RPC node, records transactions touching subscribed
addresses in memory and serves them over HTTP.

ENDPOINTS:
  GET  /block           last synced block number
  POST /subscribe       {\"address\": \"0x...\"}
  GET  /address/{id}    transactions touching an address
  GET  /status          engine state and counters

Every flag can also be set through the BLOCKWATCH_* variable shown below.
",
    version
)]
struct Cli {
    /// Ethereum JSON-RPC endpoint
    #[arg(
        long,
        env = "BLOCKWATCH_RPC_URL",
        default_value = "https://ethereum-rpc.publicnode.com"
    )]
    rpc_url: String,

    /// Delay between poll iterations in milliseconds
    #[arg(long, env = "BLOCKWATCH_POLL_INTERVAL_MS", default_value_t = 1_000)]
    poll_interval_ms: u64,

    /// Address the REST API binds to
    #[arg(long, env = "BLOCKWATCH_LISTEN", default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    /// Per-request timeout for node calls in milliseconds
    #[arg(long, env = "BLOCKWATCH_REQUEST_TIMEOUT_MS", default_value_t = 10_000)]
    request_timeout_ms: u64,

    /// How to catch up when the node is several blocks ahead
    #[arg(long, env = "BLOCKWATCH_CATCH_UP", value_enum, default_value_t = CatchUp::Jump)]
    catch_up: CatchUp,

    /// First block to process in sequential mode (default: current head)
    #[arg(long, env = "BLOCKWATCH_START_BLOCK", value_parser = clap::value_parser!(i64).range(0..))]
    start_block: Option<i64>,

    /// Maximum blocks processed per iteration in sequential mode
    #[arg(long, env = "BLOCKWATCH_MAX_BLOCKS_PER_TICK", default_value_t = 100)]
    max_blocks_per_tick: u64,

    /// Behavior when the chain no longer contains the last synced block
    #[arg(long, env = "BLOCKWATCH_ON_REORG", value_enum, default_value_t = OnReorg::Halt)]
    on_reorg: OnReorg,

    /// Address to watch from startup (repeatable)
    #[arg(long = "subscribe", env = "BLOCKWATCH_SUBSCRIBE", value_delimiter = ',')]
    subscribe: Vec<String>,

    /// Log filter, e.g. "info" or "info,blockwatch_sync=debug" (RUST_LOG wins)
    #[arg(long, env = "BLOCKWATCH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit JSON logs
    #[arg(long, env = "BLOCKWATCH_LOG_JSON")]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CatchUp {
    /// Process only the latest block
    Jump,
    /// Process every block after the last synced one
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OnReorg {
    /// Stop syncing; the API keeps serving
    Halt,
    /// Log and continue from the new block
    Resume,
}

impl Cli {
    fn sync_config(&self) -> SyncConfig {
        let builder = SyncEngineBuilder::new()
            .poll_interval_ms(self.poll_interval_ms)
            .max_blocks_per_tick(self.max_blocks_per_tick)
            .catch_up(match self.catch_up {
                CatchUp::Jump => CatchUpMode::JumpToHead,
                CatchUp::Sequential => CatchUpMode::Sequential,
            })
            .reorg_policy(match self.on_reorg {
                OnReorg::Halt => ReorgPolicy::Halt,
                OnReorg::Resume => ReorgPolicy::Resume,
            });
        match self.start_block {
            Some(block) => builder.start_block(block).build_config(),
            None => builder.build_config(),
        }
    }

    fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            json: self.log_json,
        }
    }
}

/// Register the startup subscriptions. Duplicates are tolerated; malformed
/// addresses abort startup.
fn subscribe_all(parser: &BlockParser, addresses: &[String]) -> Result<()> {
    for raw in addresses {
        match parser.try_subscribe(raw) {
            Ok(_) => {}
            Err(SyncError::AlreadySubscribed(addr)) => warn!(%addr, "duplicate --subscribe"),
            Err(e) => return Err(e).with_context(|| format!("--subscribe {raw}")),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_config());

    let config = cli.sync_config();
    let http = HttpClientConfig {
        request_timeout: Duration::from_millis(cli.request_timeout_ms),
    };
    let client = EthChainClient::http(cli.rpc_url.clone(), http)
        .with_context(|| format!("creating RPC client for {}", cli.rpc_url))?;

    let span = tracing::info_span!("sync", chain = %config.chain, rpc = %cli.rpc_url);
    let engine =
        SyncEngine::new(config, client, Arc::new(InMemoryRegistry::new())).with_span(span);

    let parser = Arc::new(engine.parser());
    subscribe_all(&parser, &cli.subscribe)?;

    let listener = TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("binding {}", cli.listen))?;

    let shutdown = CancellationToken::new();
    let mut sync = engine.start(shutdown.child_token());
    let mut server = tokio::spawn(blockwatch_server::serve(
        listener,
        Arc::clone(&parser),
        shutdown.clone(),
    ));

    info!(
        rpc = %cli.rpc_url,
        listen = %cli.listen,
        watched = parser.watched_count(),
        "blockwatchd running"
    );

    tokio::select! {
        res = signal::ctrl_c() => {
            res.context("listening for shutdown signal")?;
            info!("shutdown signal received");
        }
        state = sync.stopped() => {
            error!(%state, "sync engine halted; API keeps serving until shutdown");
            tokio::select! {
                res = signal::ctrl_c() => {
                    res.context("listening for shutdown signal")?;
                    info!("shutdown signal received");
                }
                res = &mut server => {
                    res.context("API server task")?.context("API server")?;
                }
            }
        }
        res = &mut server => {
            res.context("API server task")?.context("API server")?;
            warn!("API server exited unexpectedly");
        }
    }

    shutdown.cancel();
    let sync_result = sync.join().await;
    if !server.is_finished() {
        server.await.context("API server task")?.context("API server")?;
    }

    match sync_result {
        Ok(()) => {
            info!("blockwatchd stopped");
            Ok(())
        }
        Err(e) => Err(e).context("sync engine"),
    }
}
