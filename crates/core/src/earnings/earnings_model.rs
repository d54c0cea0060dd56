use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::round_for_display;

/// Revenue from orders against what the provider charged for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEarnings {
    pub total_earnings: Decimal,
    pub total_api_charges: Decimal,
    pub actual_earnings: Decimal,
}

impl OrderEarnings {
    /// Builds the summary from full-precision sums, rounding only here.
    pub fn from_totals(total_earnings: Decimal, total_api_charges: Decimal) -> Self {
        Self {
            total_earnings: round_for_display(total_earnings),
            total_api_charges: round_for_display(total_api_charges),
            actual_earnings: round_for_display(total_earnings - total_api_charges),
        }
    }
}

/// Collected payments net of the processor fee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEarnings {
    pub total_collected: Decimal,
    pub actual_earnings: Decimal,
}

impl PaymentEarnings {
    pub fn from_collected(total_collected: Decimal, fee_rate: Decimal) -> Self {
        Self {
            total_collected: round_for_display(total_collected),
            actual_earnings: round_for_display(total_collected * (Decimal::ONE - fee_rate)),
        }
    }
}

/// A status chunk the provider did not answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedChunk {
    pub index: usize,
    pub first_order_id: String,
    pub last_order_id: String,
    pub size: usize,
    pub message: String,
}

/// Charge total over the chunks that succeeded, plus the ones that did not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeReport {
    pub total_charge: Decimal,
    pub order_count: usize,
    pub chunk_count: usize,
    pub failed_chunks: Vec<FailedChunk>,
}

impl ChargeReport {
    pub fn is_complete(&self) -> bool {
        self.failed_chunks.is_empty()
    }
}
