#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use brezora_core::identity::Identity;
use brezora_core::orders::{NewOrder, OrderRepositoryTrait};
use brezora_core::payments::{NewPayment, PaymentRepositoryTrait, PaymentStatus, PaymentType};
use brezora_provider::{
    OrderStatusBatch, ProviderBalance, ProviderClient, ProviderConfig, ProviderError,
};
use brezora_server::{api::app_router, build_state_with_provider, config::Config, AppState};
use brezora_storage_sqlite::{create_pool, spawn_writer, OrderRepository, PaymentRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";

/// Provider stub: a fixed balance, and the same charge for every order.
pub struct StubProvider {
    pub charge_per_order: Decimal,
    pub fail: bool,
}

#[async_trait]
impl ProviderClient for StubProvider {
    fn id(&self) -> &'static str {
        "STUB"
    }

    async fn balance(&self) -> Result<ProviderBalance, ProviderError> {
        if self.fail {
            return Err(ProviderError::Rejected {
                provider: "STUB".into(),
                message: "Invalid API key".into(),
            });
        }
        Ok(ProviderBalance {
            balance: Decimal::new(4250, 2),
            currency: "USD".into(),
        })
    }

    async fn order_statuses(&self, order_ids: &[String]) -> Result<OrderStatusBatch, ProviderError> {
        if self.fail {
            return Err(ProviderError::Timeout {
                provider: "STUB".into(),
            });
        }
        let records: serde_json::Map<String, Value> = order_ids
            .iter()
            .map(|id| {
                (
                    id.clone(),
                    json!({ "charge": self.charge_per_order.to_string(), "status": "Completed" }),
                )
            })
            .collect();
        Ok(OrderStatusBatch::from_value(&Value::Object(records)).unwrap_or_default())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub db_path: String,
    _dir: TempDir,
}

pub async fn build_test_app(provider: StubProvider) -> TestApp {
    build_test_app_with(Arc::new(provider), Duration::from_secs(10)).await
}

pub async fn build_test_app_with(
    provider: Arc<dyn ProviderClient>,
    request_timeout: Duration,
) -> TestApp {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db").to_string_lossy().to_string();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: db_path.clone(),
        cors_allow: vec!["*".to_string()],
        request_timeout,
        provider: ProviderConfig::new("", ""),
        status_concurrency: 1,
        jwt_secret: SECRET.to_string(),
    };
    let state = build_state_with_provider(&config, provider)
        .await
        .unwrap();
    TestApp {
        router: app_router(state.clone(), &config),
        state,
        db_path,
        _dir: dir,
    }
}

pub fn token_for(app: &TestApp, user_id: &str, is_admin: bool) -> String {
    app.state
        .auth
        .issue_token(&Identity::new(user_id, is_admin), Duration::from_secs(300))
        .unwrap()
}

pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).to_string())
        })
    };
    (status, json)
}

/// Inserts `order_count` orders at 2.5 each, all sent to the provider, plus
/// one paid payment of 150.
pub async fn seed_sales(app: &TestApp, order_count: usize) {
    let pool = create_pool(&app.db_path).unwrap();
    let writer = spawn_writer((*pool).clone());
    let orders = OrderRepository::new(pool.clone(), writer.clone());
    let payments = PaymentRepository::new(Arc::clone(&pool), writer);

    for i in 0..order_count {
        orders
            .insert(NewOrder {
                id: None,
                user_id: "u1".to_string(),
                price: Some(dec!(2.5)),
                quantity: 100,
                status: "Completed".to_string(),
                actual_order_id_from_api: Some(format!("{}", 5000 + i)),
                platform_service: None,
                link: "https://instagram.com/someone".to_string(),
            })
            .await
            .unwrap();
    }
    payments
        .insert(NewPayment {
            id: None,
            user_id: "u1".to_string(),
            payment_type: PaymentType::Manual,
            amount: dec!(150),
            status: PaymentStatus::Paid,
            order_id: None,
            payment_id: None,
            signature: None,
        })
        .await
        .unwrap();
}
