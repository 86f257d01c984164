//! EFA client error types.

use super::convert::ConversionError;
use super::tree::TreeError;

/// Errors from fetching and reading an EFA monitor.
#[derive(Debug, thiserror::Error)]
pub enum EfaError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body is not well-formed XML
    #[error("XML error: {0}")]
    Xml(#[from] TreeError),

    /// Response does not have the shape of a monitor
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Mock transport has no usable response
    #[error("fixture error: {0}")]
    Fixture(String),
}
