//! Small numeric helpers shared by the services.

pub mod decimal_utils;

pub use decimal_utils::{parse_amount, round_for_display};
