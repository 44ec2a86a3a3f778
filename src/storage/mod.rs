//! Storage layer for the Bookmarks API.
//!
//! Provides database access via SQLx with SQLite.

mod models;
mod repository;

pub use repository::BookmarkRepository;
