//! blockwatch-server: REST adapter over the BlockWatch query facade.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /block` | `{"blockNumber": n}` |
//! | `POST /subscribe` | JSON string describing the outcome |
//! | `GET /address/{id}` | `{"transactions": [...]}` |
//! | `GET /status` | engine state, cursor, watched count, metrics |

pub mod handlers;
pub mod types;

pub use handlers::create_api_router;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use blockwatch_sync::BlockParser;

/// Serve the API on `listener` until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    parser: Arc<BlockParser>,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "API server listening");

    axum::serve(listener, create_api_router(parser))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}
