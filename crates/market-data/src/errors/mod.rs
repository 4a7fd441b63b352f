//! Error types for quote providers.

use thiserror::Error;

/// Errors raised inside a quote provider.
///
/// These never cross the aggregator boundary: a failed lookup is logged
/// and dropped, and the provider contributes a smaller (possibly empty)
/// price map for that cycle.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider rate limited the request (HTTP 429 or quota exhausted).
    #[error("Rate limited: {provider}")]
    RateLimited { provider: String },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout { provider: String },

    /// The provider answered with an error or an unusable payload.
    #[error("Provider error: {provider} - {message}")]
    Upstream { provider: String, message: String },

    /// A network error occurred while communicating with the provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
