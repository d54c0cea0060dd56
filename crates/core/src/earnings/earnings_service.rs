use std::sync::Arc;

use async_trait::async_trait;
use brezora_provider::{ProviderBalance, ProviderClient};
use log::{error, info};
use rust_decimal::Decimal;

use super::charge_aggregator::ChargeAggregator;
use super::earnings_model::{ChargeReport, OrderEarnings, PaymentEarnings};
use crate::constants::PAYMENT_PROCESSOR_FEE_RATE;
use crate::errors::Result;
use crate::orders::{Order, OrderRepositoryTrait};
use crate::payments::PaymentRepositoryTrait;

/// Dashboard earnings figures.
///
/// Every call reads current orders and payments and queries the provider
/// afresh; nothing is cached and nothing is written.
#[async_trait]
pub trait EarningsServiceTrait: Send + Sync {
    async fn reconcile_order_earnings(&self) -> Result<OrderEarnings>;
    async fn reconcile_payment_earnings(&self) -> Result<PaymentEarnings>;
    async fn get_provider_balance(&self) -> Result<ProviderBalance>;
    /// Charge total that tolerates failed chunks and lists them.
    async fn api_charge_report(&self) -> Result<ChargeReport>;
}

pub struct EarningsService {
    order_repository: Arc<dyn OrderRepositoryTrait>,
    payment_repository: Arc<dyn PaymentRepositoryTrait>,
    provider: Arc<dyn ProviderClient>,
    aggregator: ChargeAggregator,
}

impl EarningsService {
    pub fn new(
        order_repository: Arc<dyn OrderRepositoryTrait>,
        payment_repository: Arc<dyn PaymentRepositoryTrait>,
        provider: Arc<dyn ProviderClient>,
    ) -> Self {
        Self {
            order_repository,
            payment_repository,
            aggregator: ChargeAggregator::new(provider.clone()),
            provider,
        }
    }

    pub fn with_status_concurrency(mut self, concurrency: usize) -> Self {
        self.aggregator = self.aggregator.with_concurrency(concurrency);
        self
    }
}

fn provider_order_ids(orders: &[Order]) -> Vec<String> {
    orders
        .iter()
        .filter_map(Order::provider_order_id)
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl EarningsServiceTrait for EarningsService {
    async fn reconcile_order_earnings(&self) -> Result<OrderEarnings> {
        let orders = self.order_repository.list_all()?;
        if orders.is_empty() {
            return Ok(OrderEarnings::default());
        }

        let total_earnings: Decimal = orders.iter().map(Order::price_or_zero).sum();
        let provider_ids = provider_order_ids(&orders);
        let total_api_charges = self
            .aggregator
            .aggregate(&provider_ids)
            .await
            .inspect_err(|e| error!("Order earnings reconciliation failed: {}", e))?;

        let summary = OrderEarnings::from_totals(total_earnings, total_api_charges);
        info!(
            "Order earnings over {} orders ({} with provider ids): {:?}",
            orders.len(),
            provider_ids.len(),
            summary
        );
        Ok(summary)
    }

    async fn reconcile_payment_earnings(&self) -> Result<PaymentEarnings> {
        let paid = self.payment_repository.list_paid()?;
        if paid.is_empty() {
            return Ok(PaymentEarnings::default());
        }

        let total_collected: Decimal = paid.iter().map(|p| p.amount_or_zero()).sum();
        Ok(PaymentEarnings::from_collected(
            total_collected,
            PAYMENT_PROCESSOR_FEE_RATE,
        ))
    }

    async fn get_provider_balance(&self) -> Result<ProviderBalance> {
        self.provider.balance().await.map_err(|e| {
            error!("Provider balance request failed: {}", e);
            e.into()
        })
    }

    async fn api_charge_report(&self) -> Result<ChargeReport> {
        let orders = self.order_repository.list_all()?;
        let provider_ids = provider_order_ids(&orders);
        Ok(self.aggregator.aggregate_report(&provider_ids).await)
    }
}
