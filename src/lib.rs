//! # Postmark Client
//! Asynchronous wrapper around the Postmark transactional email HTTP API, providing methods to send single emails, batches, and template-rendered messages from Rust using [`Client`] and [`ClientBuilder`].
//!
//! ## Audience and uses
//! For Rust services that send transactional mail through Postmark: build a [`Client`] with your server and account tokens, describe messages with [`Email`] or [`TemplatedEmail`], and inspect the per-recipient [`EmailResponse`] values that come back.
//!
//! ## Transport
//! All networking goes through the [`Transport`] trait. [`ReqwestTransport`] is the default and is configured with [`ReqwestTransportBuilder`] (proxy, timeout, user agent). Supply your own implementation to substitute canned responses in tests. A client may be shared between tasks whenever its transport can.
//!
//! ## Out of scope
//! No retries, queuing, or delivery guarantees. One call performs exactly one HTTP round trip. Postmark's own limits (50 recipients per field, 500 messages per batch, a body or template being required) are left for the API to enforce.
//!
//! ## Errors
//! An empty templated batch fails as [`Error::Validation`] and unencodable payloads as [`Error::Serialize`], both before anything is sent. Network failures surface as [`Error::Transport`], non-2xx statuses as [`Error::Api`], and malformed bodies as [`Error::Deserialize`]. A successful call whose response carries a nonzero `ErrorCode` yields [`Error::Delivery`], which keeps the decoded response. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Example
//! ```no_run
//! use postmark_client::{Client, Email, TemplatedEmail};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), postmark_client::Error> {
//!     let client = Client::new("server-token", "account-token")?;
//!
//!     let email = Email::new("sender@example.com", "receiver@example.com")
//!         .with_subject("Welcome")
//!         .with_html_body("<p>Thanks for signing up.</p>");
//!     let response = client.send_email(&email).await?;
//!     println!("Sent: {}", response.message_id);
//!
//!     let templated = TemplatedEmail::with_template_alias("welcome", "sender@example.com", "receiver@example.com")
//!         .with_from_name("Example Team")
//!         .with_model_value("name", "Ann");
//!     client.send_email_with_template(&templated).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod models;
mod template;
mod transport;

pub use client::{Client, ClientBuilder, TokenKind};
pub use error::{BoxError, Error};
pub use models::{Attachment, Email, EmailResponse, Header};
pub use reqwest::{Method, StatusCode};
pub use template::{TemplatedEmail, format_address};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, ReqwestTransportBuilder, Transport};

/// Result type alias for Postmark operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
