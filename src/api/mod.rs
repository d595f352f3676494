//! HTTP API for the agent service.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check (public)
//! - `GET /version` - Build and package metadata (public)
//! - `POST /process` - Run the default agent
//! - `POST /agents/{name}/process` - Run a registered agent by name
//!
//! Processing endpoints require the `x-api-key` header and a valid envelope body.

mod auth;
mod routes;
pub mod types;
mod validation;

pub use auth::{check_api_key, check_header, API_KEY_HEADER};
pub use routes::{router, serve, AppState};
pub use types::*;
pub use validation::{validate_input, ValidInput};
