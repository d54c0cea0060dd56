//! Brezora Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the Brezora admin back-office:
//! the platform/category/service catalog, per-user discounts and price
//! resolution, wallets, and earnings reconciliation against the remote
//! provider. It is database-agnostic and defines repository traits that are
//! implemented by the `storage-sqlite` crate.

pub mod catalog;
pub mod constants;
pub mod earnings;
pub mod errors;
pub mod identity;
pub mod orders;
pub mod payments;
pub mod pricing;
pub mod users;
pub mod utils;
pub mod wallets;

// Re-export error types
pub use errors::Error;
pub use errors::ErrorKind;
pub use errors::Result;
