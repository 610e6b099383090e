//! Custom Embedding Server - HTTP endpoint for batch embedding enrichment
//!
//! Exposes one skill endpoint that takes `{"values": [...]}` records, embeds each
//! record's question through the configured provider (Hugging Face inference
//! API by default) and returns the vectors in the same order.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! ## Public Endpoints (No Authentication)
//!
//! - `GET /` - Service information
//! - `GET /health` - Liveness check
//! - `GET /ready` - Readiness check with provider/model
//! - `GET /metrics` - Batch and record counters
//!
//! ## Protected Endpoints (Function Key Required)
//!
//! - `POST /get_custom_embedding` (also `/api/get_custom_embedding`)
//!
//! Per-record provider failures answer 200 with an `errors` entry for that
//! record; an unparseable batch answers 401.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
