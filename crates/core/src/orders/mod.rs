//! Orders module - read side of user purchases.

mod orders_model;
mod orders_service;
mod orders_traits;

pub use orders_model::{NewOrder, Order};
pub use orders_service::OrderService;
pub use orders_traits::{OrderRepositoryTrait, OrderServiceTrait};
