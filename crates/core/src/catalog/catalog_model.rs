//! Catalog domain models.

use std::str::FromStr;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Category name -> services in display order. Categories keep the order
/// they were created in.
pub type CategoryMap = IndexMap<String, Vec<Service>>;

/// Lowercases and trims a platform name for storage and lookup.
pub fn normalize_platform_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalizes a provider service id to the string form used for comparisons.
///
/// Ids can arrive as JSON numbers or strings, so both sides of every
/// comparison go through this function.
pub fn normalize_service_id(service_id: &str) -> String {
    service_id.trim().to_string()
}

/// Accepts a provider service id written either as a JSON string or number.
pub fn deserialize_service_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(normalize_service_id(&s)),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "service id must be a string or number, got {}",
            other
        ))),
    }
}

fn deserialize_optional_service_id<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(normalize_service_id(&s))),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "service id must be a string or number, got {}",
            other
        ))),
    }
}

/// A provider rate card listed under a platform category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Stable generated key, unaffected by reordering or sibling deletes.
    pub key: String,
    /// Provider-assigned id, unique within its category.
    #[serde(deserialize_with = "deserialize_service_id")]
    pub service_id: String,
    pub rate: Decimal,
    pub min: i64,
    pub max: i64,
    #[serde(default)]
    pub description: String,
    /// Display position inside the category, always equal to the list index.
    pub order: u32,
}

/// A platform with its full category map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub categories: CategoryMap,
    /// Bumped on every category write; used for compare-and-swap.
    pub version: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Platform {
    pub fn summary(&self) -> PlatformSummary {
        PlatformSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            description: self.description.clone(),
        }
    }
}

/// Platform without its categories, for list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSummary {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
}

/// Input model for creating a new platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlatform {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub description: String,
}

impl NewPlatform {
    pub fn validate(&self) -> Result<()> {
        validate_platform_fields(&self.name, &self.image)
    }

    /// Returns a copy with the name normalized for storage.
    pub fn normalized(mut self) -> Self {
        self.name = normalize_platform_name(&self.name);
        self.description = self.description.trim().to_string();
        self
    }
}

/// Input model for updating a platform's profile fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformUpdate {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub description: String,
}

impl PlatformUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_platform_fields(&self.name, &self.image)
    }

    pub fn normalized(mut self) -> Self {
        self.name = normalize_platform_name(&self.name);
        self.description = self.description.trim().to_string();
        self
    }
}

fn validate_platform_fields(name: &str, image: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::missing_field("name"));
    }
    if image.trim().is_empty() {
        return Err(Error::missing_field("image"));
    }
    Ok(())
}

/// Input model for adding a service to a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    #[serde(alias = "service", deserialize_with = "deserialize_service_id")]
    pub service_id: String,
    pub rate: Decimal,
    pub min: i64,
    pub max: i64,
    #[serde(default, alias = "desc")]
    pub description: String,
}

impl NewService {
    pub fn validate(&self) -> Result<()> {
        validate_service_fields(&self.service_id, self.rate, self.min, self.max)
    }

    /// Builds the stored service under the given key and display position.
    pub fn into_service(self, key: String, order: u32) -> Service {
        Service {
            key,
            service_id: normalize_service_id(&self.service_id),
            rate: self.rate,
            min: self.min,
            max: self.max,
            description: self.description,
            order,
        }
    }
}

/// Partial update for a service. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatch {
    #[serde(
        default,
        alias = "service",
        deserialize_with = "deserialize_optional_service_id"
    )]
    pub service_id: Option<String>,
    pub rate: Option<Decimal>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    #[serde(alias = "desc")]
    pub description: Option<String>,
}

impl ServicePatch {
    /// Shallow merge onto `service`, then validates the merged result.
    pub fn apply_to(&self, service: &Service) -> Result<Service> {
        let mut merged = service.clone();
        if let Some(service_id) = &self.service_id {
            merged.service_id = normalize_service_id(service_id);
        }
        if let Some(rate) = self.rate {
            merged.rate = rate;
        }
        if let Some(min) = self.min {
            merged.min = min;
        }
        if let Some(max) = self.max {
            merged.max = max;
        }
        if let Some(description) = &self.description {
            merged.description = description.clone();
        }
        validate_service_fields(&merged.service_id, merged.rate, merged.min, merged.max)?;
        Ok(merged)
    }
}

fn validate_service_fields(service_id: &str, rate: Decimal, min: i64, max: i64) -> Result<()> {
    if service_id.trim().is_empty() {
        return Err(Error::missing_field("serviceId"));
    }
    if rate.is_sign_negative() {
        return Err(Error::invalid_input("Service rate cannot be negative"));
    }
    if min < 0 || max < 0 {
        return Err(Error::invalid_input("Quantity bounds cannot be negative"));
    }
    if min > max {
        return Err(Error::invalid_input(format!(
            "Minimum quantity {} exceeds maximum {}",
            min, max
        )));
    }
    Ok(())
}

/// How a caller addresses a service inside a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceRef {
    /// The stable generated key.
    Key(String),
    /// Zero-based position in the category's display order.
    Index(usize),
}

impl FromStr for ServiceRef {
    type Err = Error;

    /// All-digit input is a position; anything else is a key.
    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::missing_field("service reference"));
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            // Too large for usize is still just an index past the end.
            let index = trimmed.parse::<usize>().unwrap_or(usize::MAX);
            return Ok(ServiceRef::Index(index));
        }
        Ok(ServiceRef::Key(trimmed.to_string()))
    }
}

impl std::fmt::Display for ServiceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceRef::Key(key) => write!(f, "{}", key),
            ServiceRef::Index(index) => write!(f, "#{}", index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_service_ref_parsing() {
        assert_eq!("2".parse::<ServiceRef>().unwrap(), ServiceRef::Index(2));
        assert_eq!(
            "0192f1c2-7a3b-7c4d-8e9f-0a1b2c3d4e5f".parse::<ServiceRef>().unwrap(),
            ServiceRef::Key("0192f1c2-7a3b-7c4d-8e9f-0a1b2c3d4e5f".to_string())
        );
        assert!("  ".parse::<ServiceRef>().is_err());
    }

    #[test]
    fn test_oversized_index_is_out_of_bounds() {
        let service_ref = "99999999999999999999999".parse::<ServiceRef>().unwrap();
        assert_eq!(service_ref, ServiceRef::Index(usize::MAX));

        let mut categories = CategoryMap::new();
        categories.insert("promo".to_string(), Vec::new());
        let err = crate::catalog::category_ops::delete_service(
            &mut categories,
            "promo",
            &service_ref,
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);
    }

    #[test]
    fn test_new_service_accepts_numeric_ids_and_legacy_names() {
        let parsed: NewService = serde_json::from_value(json!({
            "service": 1043,
            "rate": 0.85,
            "min": 10,
            "max": 5000,
            "desc": "Instagram likes"
        }))
        .unwrap();
        assert_eq!(parsed.service_id, "1043");
        assert_eq!(parsed.rate, dec!(0.85));
        assert_eq!(parsed.description, "Instagram likes");
    }

    #[test]
    fn test_new_service_validation() {
        let mut input = NewService {
            service_id: "1".into(),
            rate: dec!(1),
            min: 10,
            max: 100,
            description: String::new(),
        };
        assert!(input.validate().is_ok());

        input.min = 500;
        assert!(input.validate().is_err());

        input.min = 10;
        input.rate = dec!(-0.5);
        assert!(input.validate().is_err());

        input.rate = dec!(1);
        input.service_id = " ".into();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_patch_is_shallow_merge() {
        let service = NewService {
            service_id: "7".into(),
            rate: dec!(2.5),
            min: 1,
            max: 10,
            description: "views".into(),
        }
        .into_service("k1".into(), 0);

        let patch = ServicePatch {
            rate: Some(dec!(3)),
            ..Default::default()
        };
        let merged = patch.apply_to(&service).unwrap();
        assert_eq!(merged.rate, dec!(3));
        assert_eq!(merged.service_id, "7");
        assert_eq!(merged.description, "views");
        assert_eq!(merged.key, "k1");

        let bad = ServicePatch {
            max: Some(0),
            ..Default::default()
        };
        assert!(bad.apply_to(&service).is_err());
    }

    #[test]
    fn test_platform_name_normalization() {
        let input = NewPlatform {
            id: None,
            name: "  Instagram ".into(),
            image: "https://cdn.example.com/ig.png".into(),
            description: " photos ".into(),
        }
        .normalized();
        assert_eq!(input.name, "instagram");
        assert_eq!(input.description, "photos");
    }
}
