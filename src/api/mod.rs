//! HTTP API.
//!
//! Exposes the analysis pipeline, patient history, the test catalog and
//! prescription reminders as JSON endpoints. `api_router()` returns a
//! `Router` that can be mounted on any axum server.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{serve_until_ctrl_c, start_server, ApiServer};
pub use types::ApiContext;
