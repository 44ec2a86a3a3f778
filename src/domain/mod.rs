//! Domain types for the Bookmarks API.

mod bookmark;

pub use bookmark::*;
