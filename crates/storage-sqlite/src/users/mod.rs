//! SQLite storage implementation for users and their discounts.

mod model;
mod repository;

pub use model::{UserDB, UserDiscountDB};
pub use repository::UserRepository;

#[cfg(test)]
mod tests;
