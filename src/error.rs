//! Error types for the Postmark client.

use crate::EmailResponse;
use reqwest::StatusCode;

/// Boxed error returned by [`Transport`](crate::Transport) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during Postmark operations.
///
/// Every variant is scoped to the single call that produced it. Only
/// [`Error::Transport`] and [`Error::Api`] involve the network at all;
/// [`Error::Validation`] and [`Error::Serialize`] are raised before anything
/// is sent.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input was missing, e.g. an empty batch.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The request payload could not be encoded as JSON.
    #[error("failed to serialize request payload: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The request could not be built or the transport failed to perform it.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Postmark answered with a non-success HTTP status.
    #[error("Postmark API returned HTTP {status}: {error_code} {message}")]
    Api {
        /// HTTP status of the response.
        status: StatusCode,
        /// Postmark `ErrorCode` from the error body, `0` if absent.
        error_code: i64,
        /// Postmark `Message` from the error body, or the raw body text.
        message: String,
    },

    /// A successful response body did not match the expected shape.
    #[error("failed to deserialize response body: {0}")]
    Deserialize(#[source] serde_json::Error),

    /// The call succeeded but Postmark reported a nonzero `ErrorCode`.
    ///
    /// The decoded response is kept so callers can still read `MessageID`,
    /// `To` and the rest.
    #[error("delivery failed with error code {}: {}", .0.error_code, .0.message)]
    Delivery(Box<EmailResponse>),
}

impl Error {
    /// Returns the response attached to a [`Error::Delivery`], if any.
    pub fn delivery_response(&self) -> Option<&EmailResponse> {
        match self {
            Error::Delivery(response) => Some(response),
            _ => None,
        }
    }

    /// Consumes the error, returning the response of a [`Error::Delivery`].
    pub fn into_delivery_response(self) -> Option<EmailResponse> {
        match self {
            Error::Delivery(response) => Some(*response),
            _ => None,
        }
    }

    /// Postmark API error code carried by this error, if any.
    pub fn error_code(&self) -> Option<i64> {
        match self {
            Error::Api { error_code, .. } => Some(*error_code),
            Error::Delivery(response) => Some(response.error_code),
            _ => None,
        }
    }
}
