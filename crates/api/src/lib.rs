//! HTTP API layer for kplanner.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: entity CRUD, bulk keyword/filter operations, the matrix
//!   listing, and junction-row deletes
//! - **Extractors**: the authenticated owner id
//! - **Middleware**: credential resolution into request extensions
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
