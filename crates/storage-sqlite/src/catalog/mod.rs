//! SQLite storage implementation for the platform catalog.

mod model;
mod repository;

pub use model::{NewPlatformDB, PlatformDB};
pub use repository::CatalogRepository;
