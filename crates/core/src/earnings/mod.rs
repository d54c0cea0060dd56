//! Earnings module - reconciles local revenue against provider charges.

mod charge_aggregator;
mod earnings_model;
mod earnings_service;


pub use charge_aggregator::ChargeAggregator;
pub use earnings_model::{ChargeReport, FailedChunk, OrderEarnings, PaymentEarnings};
pub use earnings_service::{EarningsService, EarningsServiceTrait};
