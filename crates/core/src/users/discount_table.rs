//! Per-user sparse discount overlay.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::{deserialize_service_id, normalize_service_id};
use crate::constants::{MAX_DISCOUNT_PERCENT, MIN_DISCOUNT_PERCENT};
use crate::{Error, Result};

/// A percentage markdown on one service for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    #[serde(deserialize_with = "deserialize_service_id")]
    pub service_id: String,
    /// Percent in `[1, 100]`.
    pub discount: Decimal,
}

impl Discount {
    pub fn new(service_id: &str, discount: Decimal) -> Self {
        Self {
            service_id: normalize_service_id(service_id),
            discount,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.service_id.is_empty() {
            return Err(Error::missing_field("serviceId"));
        }
        validate_discount_percent(self.discount)
    }
}

pub fn validate_discount_percent(percent: Decimal) -> Result<()> {
    if percent < MIN_DISCOUNT_PERCENT || percent > MAX_DISCOUNT_PERCENT {
        return Err(Error::invalid_input(format!(
            "Discount must be between {} and {}, got {}",
            MIN_DISCOUNT_PERCENT, MAX_DISCOUNT_PERCENT, percent
        )));
    }
    Ok(())
}

/// Discounts keyed by normalized service id, in insertion order.
///
/// Holds at most one entry per service id. When built from stored entries
/// that contain duplicates, the first one wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscountTable {
    entries: Vec<Discount>,
    index: HashMap<String, usize>,
}

impl DiscountTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = Discount>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            let key = normalize_service_id(&entry.service_id);
            if table.index.contains_key(&key) {
                continue;
            }
            table.index.insert(key.clone(), table.entries.len());
            table.entries.push(Discount {
                service_id: key,
                discount: entry.discount,
            });
        }
        table
    }

    /// The percent for `service_id`, if discounted.
    pub fn get(&self, service_id: &str) -> Option<Decimal> {
        self.index
            .get(&normalize_service_id(service_id))
            .map(|&i| self.entries[i].discount)
    }

    /// Sets the percent for a service. Replaces in place when present,
    /// otherwise appends. Returns true when an entry was replaced.
    pub fn upsert(&mut self, service_id: &str, percent: Decimal) -> bool {
        let key = normalize_service_id(service_id);
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].discount = percent;
            return true;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(Discount {
            service_id: key,
            discount: percent,
        });
        false
    }

    /// Removes the entry for `service_id`, if any.
    pub fn remove(&mut self, service_id: &str) -> Option<Discount> {
        let i = self.index.remove(&normalize_service_id(service_id))?;
        let removed = self.entries.remove(i);
        for position in self.index.values_mut() {
            if *position > i {
                *position -= 1;
            }
        }
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Discount> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Discount] {
        &self.entries
    }
}

impl FromIterator<Discount> for DiscountTable {
    fn from_iter<I: IntoIterator<Item = Discount>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl Serialize for DiscountTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DiscountTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Self::from_entries(Vec::<Discount>::deserialize(deserializer)?))
    }
}
