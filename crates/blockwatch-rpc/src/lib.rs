//! blockwatch-rpc: JSON-RPC plumbing between BlockWatch and a node.
//!
//! - [`RpcTransport`]: async trait for sending JSON-RPC requests
//! - [`HttpTransport`]: reqwest implementation with a per-request timeout
//! - [`EthChainClient`]: the `ChainClient` capability on top of any transport
//! - [`TransportError`]: structured transport errors, convertible to `SyncError`

pub mod client;
pub mod error;
pub mod request;
pub mod transport;

pub use client::EthChainClient;
pub use error::TransportError;
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use transport::{HttpClientConfig, HttpTransport, RpcTransport};
