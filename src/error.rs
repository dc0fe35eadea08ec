//! Unified error type for easel.

use thiserror::Error;

/// Errors that can occur while resolving a strategy or generating a portrait.
#[derive(Debug, Error)]
pub enum GenError {
    /// No viable generation strategy for the current account/key combination.
    #[error("Not configured: {0}")]
    Unconfigured(String),

    /// An API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The broker rejected the request because the account's quota is spent.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The broker rejected the request because a subscription is required.
    #[error("Subscription required: {0}")]
    SubscriptionRequired(String),

    /// The description-refinement step returned blank text.
    #[error("Description refinement returned an empty result")]
    EmptyDescription,

    /// A successful response was missing an expected field.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image format conversion error.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),
}
