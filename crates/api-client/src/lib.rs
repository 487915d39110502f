//! # Receitas API client
//!
//! Talks to the prescriptions REST API. [`Gateway`] is the seam the rest of
//! the client programs against; [`HttpGateway`] is its `reqwest`
//! implementation.
//!
//! Every call either resolves with data or fails with an [`ApiError`]:
//! - `NetworkFailure` when the request never completed or the body was unreadable;
//! - `ApiFailure` carrying the server's `error` message otherwise.

pub mod error;
pub mod gateway;
pub mod http;
mod wire;

pub use error::{ApiError, ApiResult};
pub use gateway::Gateway;
pub use http::HttpGateway;
