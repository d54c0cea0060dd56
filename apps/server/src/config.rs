use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use brezora_provider::ProviderConfig;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub provider: ProviderConfig,
    /// Provider status chunks allowed in flight at once. 1 keeps them sequential.
    pub status_concurrency: usize,
    pub jwt_secret: String,
}

/// Default bound on one provider request. Kept well below the request
/// timeout so a silent provider surfaces as a provider error.
const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_millis(key: &str, default: u64) -> Duration {
    let ms = std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default);
    Duration::from_millis(ms)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("BZ_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid BZ_LISTEN_ADDR")?;
        let db_path = env_or("BZ_DB_PATH", "./db/app.db");
        let cors_allow = env_or("BZ_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let provider = ProviderConfig::new(
            env_or("PROVIDER_API_URL", ""),
            env_or("PROVIDER_API_KEY", ""),
        )
        .with_timeout(env_millis("PROVIDER_TIMEOUT_MS", DEFAULT_PROVIDER_TIMEOUT_MS));
        let status_concurrency = std::env::var("PROVIDER_STATUS_CONCURRENCY")
            .ok()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1);

        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let config = Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: env_millis("BZ_REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS),
            provider,
            status_concurrency,
            jwt_secret,
        };
        config.validate()?;
        Ok(config)
    }

    /// The provider timeout must stay below the request timeout.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.provider.timeout >= self.request_timeout {
            anyhow::bail!(
                "PROVIDER_TIMEOUT_MS ({} ms) must be lower than BZ_REQUEST_TIMEOUT_MS ({} ms)",
                self.provider.timeout.as_millis(),
                self.request_timeout.as_millis()
            );
        }
        Ok(())
    }
}
