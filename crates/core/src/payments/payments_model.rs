//! Payment domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Online,
    Manual,
}

/// Only `Paid` payments count as collected revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Online => "online",
            PaymentType::Manual => "manual",
        }
    }
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "online" => Ok(PaymentType::Online),
            "manual" => Ok(PaymentType::Manual),
            other => Err(Error::invalid_input(format!("Unknown payment type '{}'", other))),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(Error::invalid_input(format!(
                "Unknown payment status '{}'",
                other
            ))),
        }
    }
}

/// A wallet top-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    /// `None` when the stored amount is missing or not a number.
    pub amount: Option<Decimal>,
    pub status: PaymentStatus,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Payment {
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }
}

/// Input model for recording a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub amount: Decimal,
    #[serde(default)]
    pub status: PaymentStatus,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
}

impl NewPayment {
    /// Online payments must carry the gateway's order, payment and signature.
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::missing_field("userId"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::invalid_input("Payment amount must be positive"));
        }
        if self.payment_type == PaymentType::Online {
            for (field, value) in [
                ("orderId", &self.order_id),
                ("paymentId", &self.payment_id),
                ("signature", &self.signature),
            ] {
                if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                    return Err(Error::missing_field(field));
                }
            }
        }
        Ok(())
    }
}
