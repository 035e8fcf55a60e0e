//! HTTP wrapper around `lineage-engine`: one `POST /traverse` endpoint plus
//! a health check, config loading, and the Axum plumbing around both.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use server::Server;
pub use state::AppState;
