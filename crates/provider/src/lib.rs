//! Brezora Provider Crate
//!
//! Client for the upstream provider that actually fulfils purchased services.
//! The provider is the source of truth for what each order cost us (its
//! `charge`), and for the reseller account balance held there.
//!
//! # Overview
//!
//! ```text
//! +------------------+      POST {key, action: "balance"}        (JSON)
//! |  ProviderClient  | -->  POST {key, action: "status", orders}  (form)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | ProviderBalance  |  balance + currency
//! | OrderStatusBatch |  provider order id -> OrderStatus { charge, .. }
//! +------------------+
//! ```
//!
//! The provider's numeric fields arrive as JSON numbers or as strings
//! depending on the panel, so the models parse them leniently into
//! [`rust_decimal::Decimal`] and treat anything unparsable as missing.

pub mod config;
pub mod errors;
pub mod models;
pub mod smm_panel;

use async_trait::async_trait;

pub use config::ProviderConfig;
pub use errors::ProviderError;
pub use models::{decimal_from_value, OrderStatus, OrderStatusBatch, ProviderBalance};
pub use smm_panel::SmmPanelClient;

/// Most order ids the provider accepts in one `status` request.
pub const MAX_STATUS_BATCH: usize = 100;

/// Contract for the remote provider API.
///
/// Implemented by [`SmmPanelClient`] over HTTP; tests substitute in-memory
/// implementations.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Short identifier used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Fetches the reseller balance held at the provider.
    async fn balance(&self) -> Result<ProviderBalance, ProviderError>;

    /// Fetches the status records of up to [`MAX_STATUS_BATCH`] provider orders.
    ///
    /// The returned batch is keyed by provider order id. Ids the provider does
    /// not know about may be missing or carry an error record without a charge.
    async fn order_statuses(&self, order_ids: &[String]) -> Result<OrderStatusBatch, ProviderError>;
}
