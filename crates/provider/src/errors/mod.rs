//! Error types for provider API calls.

use thiserror::Error;

/// Errors that can occur while talking to the remote provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider URL or API key has not been configured.
    #[error("Provider is not configured: {0}")]
    NotConfigured(String),

    /// The request did not complete within the configured timeout.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status} from {provider}: {body}")]
    Http {
        provider: String,
        status: u16,
        body: String,
    },

    /// The provider answered 200 but reported an error in the payload,
    /// e.g. `{"error": "Invalid API key"}`.
    #[error("Provider rejected request: {provider} - {message}")]
    Rejected { provider: String, message: String },

    /// The response body could not be interpreted.
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse { provider: String, message: String },

    /// More order ids than the provider accepts in one status request.
    #[error("Status batch of {size} orders exceeds the provider limit of {max}")]
    BatchTooLarge { size: usize, max: usize },

    /// The HTTP client could not be built from the configuration.
    #[error("Failed to build provider HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    /// A network error occurred while communicating with the provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ProviderError {
    /// Returns true when retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Timeout { .. } | ProviderError::Network(_) => true,
            ProviderError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
