//! Request and response shapes for the Postmark email endpoints.

use base64::Engine;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::HashMap;

/// An outbound email for the `email` and `email/batch` endpoints.
///
/// Unset optional fields are left out of the JSON payload entirely. Postmark
/// requires at least one of `html_body` and `text_body`, and caps `to`, `cc`
/// and `bcc` at 50 comma-separated addresses each; neither rule is checked
/// locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Email {
    /// Sender address. Must have a confirmed sender signature.
    pub from: String,
    /// Recipient addresses, comma separated.
    pub to: String,
    /// Cc recipient addresses, comma separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    /// Bcc recipient addresses, comma separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
    /// Email subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Tag used to categorize outgoing mail in Postmark statistics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// HTML message body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
    /// Plain text message body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
    /// Reply-To override. Defaults to the one on the sender signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    /// Custom headers, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Header>,
    /// Enable open tracking.
    #[serde(default, skip_serializing_if = "is_false")]
    pub track_opens: bool,
    /// File attachments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Free-form metadata stored alongside the message.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl Email {
    /// Create an email with only the required sender and recipients set.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    /// Set the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the HTML body.
    #[must_use]
    pub fn with_html_body(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    /// Set the plain text body.
    #[must_use]
    pub fn with_text_body(mut self, body: impl Into<String>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    /// Append a custom header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }

    /// Append an attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Insert a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A custom email header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Header {
    /// Header name, e.g. `X-Priority`.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Create a header from a name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A file sent along with an email.
///
/// Size and type limits are enforced by Postmark, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attachment {
    /// File name shown to the recipient.
    pub name: String,
    /// Base64 encoded file content.
    pub content: String,
    /// MIME type, e.g. `application/pdf`.
    pub content_type: String,
    /// Content id for inline images, referenced as `cid:<id>` from the HTML body.
    #[serde(
        rename = "ContentID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_id: Option<String>,
}

impl Attachment {
    /// Create an attachment from content that is already base64 encoded.
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            content_type: content_type.into(),
            content_id: None,
        }
    }

    /// Create an attachment from raw bytes, base64 encoding them.
    pub fn from_bytes(
        name: impl Into<String>,
        bytes: impl AsRef<[u8]>,
        content_type: impl Into<String>,
    ) -> Self {
        let content = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self::new(name, content, content_type)
    }

    /// Mark the attachment as inline with the given content id.
    #[must_use]
    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }
}

/// Per-recipient result of a send.
///
/// A successful HTTP call does not imply delivery: check
/// [`error_code`](Self::error_code), especially for batch results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EmailResponse {
    /// Recipient address.
    pub to: String,
    /// When Postmark accepted the message.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub submitted_at: Option<DateTime<FixedOffset>>,
    /// Id assigned to the message by Postmark.
    #[serde(rename = "MessageID")]
    pub message_id: String,
    /// Postmark API error code, `0` on success.
    pub error_code: i64,
    /// Human readable status message.
    pub message: String,
}

impl EmailResponse {
    /// Whether Postmark accepted the message.
    pub fn is_success(&self) -> bool {
        self.error_code == 0
    }
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Postmark sends RFC 3339 timestamps with seven fractional digits; some
/// error responses omit the offset, which is read as UTC. Absent or `null`
/// is `None`; any other unparseable value is an error.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|raw| {
        parse_timestamp(&raw).ok_or_else(|| {
            <D::Error as de::Error>::custom(format!("invalid SubmittedAt timestamp: {raw:?}"))
        })
    })
    .transpose()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}
