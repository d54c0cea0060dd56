//! Users module - users, their discount tables, and the services over them.

mod discount_service;
mod discount_table;
mod users_model;
mod users_service;
mod users_traits;

#[cfg(test)]
pub(crate) mod users_service_tests;

pub use discount_service::DiscountService;
pub use discount_table::{validate_discount_percent, Discount, DiscountTable};
pub use users_model::{NewUser, User, UserUpdate};
pub use users_service::UserService;
pub use users_traits::{DiscountServiceTrait, UserRepositoryTrait, UserServiceTrait};
