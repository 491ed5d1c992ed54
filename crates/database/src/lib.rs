//! # To-do Database Crate
//!
//! This crate is the application's only door to the SQLite store that owns every
//! to-do item. Nothing above it caches rows; each call goes to the database.
//!
//! ## Public API
//!
//! - `connect`: Opens the connection pool for a file path or `:memory:`.
//! - `run_migrations`: Applies the embedded migrations (creates the `todos` table).
//! - `DbRepository`: Holds the pool and provides the CRUD operations over `todos`.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{MEMORY_URL, connect, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
