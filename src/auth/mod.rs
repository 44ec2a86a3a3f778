//! Authentication module for the Bookmarks API.
//!
//! Clients present a single static API token as `Authorization: Bearer <token>`.

mod middleware;
mod token;

pub use middleware::*;
pub use token::*;
