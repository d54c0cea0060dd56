//! Wire models returned by the provider API.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parses a provider numeric field that may be a JSON number or a string.
///
/// Returns `None` for null, empty strings, booleans, objects and anything
/// that does not parse as a decimal.
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}

fn string_from_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reseller balance held at the provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderBalance {
    pub balance: Decimal,
    pub currency: String,
}

impl ProviderBalance {
    /// Reads `{ "balance": .., "currency": .. }`. The balance is required.
    pub fn from_value(value: &Value) -> Option<Self> {
        let balance = decimal_from_value(value.get("balance")?)?;
        let currency = string_from_value(value.get("currency")).unwrap_or_default();
        Some(Self { balance, currency })
    }
}

/// Status record for one provider order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    /// What the provider billed us for the order.
    pub charge: Option<Decimal>,
    pub status: Option<String>,
    pub start_count: Option<Decimal>,
    pub remains: Option<Decimal>,
    pub currency: Option<String>,
    /// Per-order error reported by the provider, e.g. "Incorrect order ID".
    pub error: Option<String>,
}

impl OrderStatus {
    /// Reads one record of a status response. Non-object records become an
    /// empty status so they contribute nothing to charge totals.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        Self {
            charge: value.get("charge").and_then(decimal_from_value),
            status: string_from_value(value.get("status")),
            start_count: value.get("start_count").and_then(decimal_from_value),
            remains: value.get("remains").and_then(decimal_from_value),
            currency: string_from_value(value.get("currency")),
            error: string_from_value(value.get("error")),
        }
    }

    /// Charge with missing or non-numeric values counted as zero.
    pub fn charge_or_zero(&self) -> Decimal {
        self.charge.unwrap_or(Decimal::ZERO)
    }
}

/// Status records of one request, keyed by provider order id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderStatusBatch {
    records: HashMap<String, OrderStatus>,
}

impl OrderStatusBatch {
    /// Reads a `{ "<order id>": { .. }, .. }` mapping.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let records = map
            .iter()
            .map(|(order_id, record)| (order_id.clone(), OrderStatus::from_value(record)))
            .collect();
        Some(Self { records })
    }

    pub fn get(&self, order_id: &str) -> Option<&OrderStatus> {
        self.records.get(order_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OrderStatus)> {
        self.records.iter()
    }

    /// Sum of `charge` over every record in the batch.
    pub fn total_charge(&self) -> Decimal {
        self.records.values().map(OrderStatus::charge_or_zero).sum()
    }
}

impl FromIterator<(String, OrderStatus)> for OrderStatusBatch {
    fn from_iter<I: IntoIterator<Item = (String, OrderStatus)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_decimal_from_value_accepts_numbers_and_strings() {
        assert_eq!(decimal_from_value(&json!(0.2778)), Some(dec!(0.2778)));
        assert_eq!(decimal_from_value(&json!("1.25")), Some(dec!(1.25)));
        assert_eq!(decimal_from_value(&json!(" 3 ")), Some(dec!(3)));
        assert_eq!(decimal_from_value(&json!(12)), Some(dec!(12)));
    }

    #[test]
    fn test_decimal_from_value_rejects_garbage() {
        assert_eq!(decimal_from_value(&json!("abc")), None);
        assert_eq!(decimal_from_value(&json!("")), None);
        assert_eq!(decimal_from_value(&json!(null)), None);
        assert_eq!(decimal_from_value(&json!(true)), None);
        assert_eq!(decimal_from_value(&json!({"v": 1})), None);
    }

    #[test]
    fn test_balance_from_value() {
        let balance = ProviderBalance::from_value(&json!({
            "balance": "100.84292",
            "currency": "USD"
        }))
        .unwrap();
        assert_eq!(balance.balance, dec!(100.84292));
        assert_eq!(balance.currency, "USD");

        assert!(ProviderBalance::from_value(&json!({"currency": "USD"})).is_none());
    }

    #[test]
    fn test_status_batch_sums_charges_and_ignores_errors() {
        let batch = OrderStatusBatch::from_value(&json!({
            "1": {"charge": "0.27819", "start_count": "3572", "status": "Partial", "remains": "157", "currency": "USD"},
            "10": {"error": "Incorrect order ID"},
            "100": {"charge": 1.5, "status": "Completed"},
            "101": {"charge": "n/a"},
            "102": "unexpected"
        }))
        .unwrap();

        assert_eq!(batch.len(), 5);
        assert_eq!(batch.total_charge(), dec!(1.77819));
        assert_eq!(
            batch.get("10").and_then(|s| s.error.clone()),
            Some("Incorrect order ID".to_string())
        );
        assert_eq!(batch.get("1").and_then(|s| s.remains), Some(dec!(157)));
        assert_eq!(batch.get("102"), Some(&OrderStatus::default()));
    }

    #[test]
    fn test_status_batch_requires_object() {
        assert!(OrderStatusBatch::from_value(&json!([1, 2, 3])).is_none());
    }
}
