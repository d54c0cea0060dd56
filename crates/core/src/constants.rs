use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Most provider order ids sent in one remote `status` request.
pub const STATUS_CHUNK_SIZE: usize = brezora_provider::MAX_STATUS_BATCH;

/// Share of every collected payment kept by the payment processor.
pub const PAYMENT_PROCESSOR_FEE_RATE: Decimal = dec!(0.02);

/// Decimal places earnings figures are rounded to for display.
pub const EARNINGS_DISPLAY_PRECISION: u32 = 4;

/// Smallest discount percent a user can be granted.
pub const MIN_DISCOUNT_PERCENT: Decimal = dec!(1);

/// Largest discount percent a user can be granted.
pub const MAX_DISCOUNT_PERCENT: Decimal = dec!(100);

/// Attempts made by a catalog mutation before giving up on a version conflict.
pub const MAX_CATALOG_WRITE_ATTEMPTS: usize = 3;
