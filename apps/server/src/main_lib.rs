use std::sync::Arc;

use anyhow::Context;

use brezora_core::{
    catalog::{CatalogService, CatalogServiceTrait},
    earnings::{EarningsService, EarningsServiceTrait},
    orders::{OrderService, OrderServiceTrait},
    payments::{PaymentService, PaymentServiceTrait},
    pricing::{PricingService, PricingServiceTrait},
    users::{DiscountService, DiscountServiceTrait, UserService, UserServiceTrait},
    wallets::{WalletService, WalletServiceTrait},
};
use brezora_provider::{ProviderClient, SmmPanelClient};
use brezora_storage_sqlite::{
    db::{self, write_actor},
    CatalogRepository, OrderRepository, PaymentRepository, UserRepository, WalletRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{auth::AuthManager, config::Config};

pub struct AppState {
    pub catalog_service: Arc<dyn CatalogServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub discount_service: Arc<dyn DiscountServiceTrait>,
    pub pricing_service: Arc<dyn PricingServiceTrait>,
    pub order_service: Arc<dyn OrderServiceTrait>,
    pub payment_service: Arc<dyn PaymentServiceTrait>,
    pub wallet_service: Arc<dyn WalletServiceTrait>,
    pub earnings_service: Arc<dyn EarningsServiceTrait>,
    pub auth: Arc<AuthManager>,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_current_span(false))
        .init();
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    if !config.provider.is_configured() {
        tracing::warn!("PROVIDER_API_URL or PROVIDER_API_KEY is not set; provider calls will fail");
    }
    let client = SmmPanelClient::new(config.provider.clone())
        .context("Failed to build the provider client")?;
    let provider: Arc<dyn ProviderClient> = Arc::new(client);
    build_state_with_provider(config, provider).await
}

/// Wires every service over the database at `config.db_path`, talking to
/// `provider` for remote charges and balance.
pub async fn build_state_with_provider(
    config: &Config,
    provider: Arc<dyn ProviderClient>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let catalog_repository = Arc::new(CatalogRepository::new(pool.clone(), writer.clone()));
    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let order_repository = Arc::new(OrderRepository::new(pool.clone(), writer.clone()));
    let payment_repository = Arc::new(PaymentRepository::new(pool.clone(), writer.clone()));
    let wallet_repository = Arc::new(WalletRepository::new(pool.clone(), writer.clone()));

    let catalog_service: Arc<dyn CatalogServiceTrait> =
        Arc::new(CatalogService::new(catalog_repository));
    let user_service = Arc::new(UserService::new(user_repository.clone()));
    let discount_service = Arc::new(DiscountService::new(user_repository.clone()));
    let pricing_service = Arc::new(PricingService::new(
        catalog_service.clone(),
        user_repository.clone(),
    ));
    let order_service = Arc::new(OrderService::new(order_repository.clone()));
    let payment_service = Arc::new(PaymentService::new(payment_repository.clone()));
    let wallet_service = Arc::new(WalletService::new(wallet_repository, user_repository));
    let earnings_service = Arc::new(
        EarningsService::new(order_repository, payment_repository, provider)
            .with_status_concurrency(config.status_concurrency),
    );

    let auth = Arc::new(AuthManager::new(&config.jwt_secret)?);

    Ok(Arc::new(AppState {
        catalog_service,
        user_service,
        discount_service,
        pricing_service,
        order_service,
        payment_service,
        wallet_service,
        earnings_service,
        auth,
    }))
}
