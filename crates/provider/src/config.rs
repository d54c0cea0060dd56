use std::time::Duration;

/// Default bound on a single provider request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the provider API, supplied out of band.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// True when both the endpoint and the key are present.
    pub fn is_configured(&self) -> bool {
        !self.api_url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}
