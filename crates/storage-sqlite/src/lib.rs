//! SQLite storage implementation for the Brezora back-office.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `brezora-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for platforms, users, orders, payments and wallets
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `brezora-core` is database-agnostic and works with traits.
//!
//! ```text
//!     core (domain)
//!          │
//!          ▼
//!  storage-sqlite (this crate)
//!          │
//!          ▼
//!      SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod catalog;
pub mod orders;
pub mod payments;
pub mod users;
pub mod wallets;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use catalog::CatalogRepository;
pub use orders::OrderRepository;
pub use payments::PaymentRepository;
pub use users::UserRepository;
pub use wallets::WalletRepository;

// Re-export from brezora-core for convenience
pub use brezora_core::errors::{DatabaseError, Error, Result};
