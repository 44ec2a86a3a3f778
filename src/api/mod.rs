//! HTTP API layer for the Bookmarks API.
//!
//! Provides REST endpoints for the bookmark resource.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
