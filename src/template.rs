//! Templated sends: payload shape, display-name merging and the batch envelope.

use crate::models::is_false;
use crate::{Attachment, Header};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// An email rendered server-side from a Postmark template.
///
/// Set either `template_id` or `template_alias`; Postmark rejects a message
/// with neither. `from_name` and `to_name` are not sent as fields of their own:
/// before transmission they are merged into `From` and `To` as
/// `"Name" address`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplatedEmail {
    /// Numeric id of the template to render.
    #[serde(rename = "TemplateId", default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i64>,
    /// Alias of the template to render.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_alias: Option<String>,
    /// Model the template is rendered with.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub template_model: serde_json::Map<String, serde_json::Value>,
    /// Whether Postmark inlines the template's style blocks. Postmark
    /// defaults to `true` when this is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_css: Option<bool>,
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
    /// Tag used to categorize outgoing mail in Postmark statistics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Reply-To override.
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
    /// Display name merged into `From`.
    #[serde(skip)]
    pub from_name: Option<String>,
    /// Display name merged into `To`.
    #[serde(skip)]
    pub to_name: Option<String>,
}

impl TemplatedEmail {
    /// Create a message for the template with the given numeric id.
    pub fn with_template_id(id: i64, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            template_id: Some(id),
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    /// Create a message for the template with the given alias.
    pub fn with_template_alias(
        alias: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            template_alias: Some(alias.into()),
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    /// Set one template model value.
    #[must_use]
    pub fn with_model_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.template_model.insert(key.into(), value.into());
        self
    }

    /// Set the sender display name.
    #[must_use]
    pub fn with_from_name(mut self, name: impl Into<String>) -> Self {
        self.from_name = Some(name.into());
        self
    }

    /// Set the recipient display name.
    #[must_use]
    pub fn with_to_name(mut self, name: impl Into<String>) -> Self {
        self.to_name = Some(name.into());
        self
    }

    /// The message as it goes on the wire.
    ///
    /// Borrows `self` when no display name is set. Otherwise returns a copy
    /// with the names merged into `from` / `to`; `self` is never modified.
    pub(crate) fn prepared(&self) -> Cow<'_, TemplatedEmail> {
        if self.from_name.is_none() && self.to_name.is_none() {
            return Cow::Borrowed(self);
        }

        let mut email = self.clone();
        if let Some(name) = email.from_name.take() {
            email.from = format_address(&name, &email.from);
        }
        if let Some(name) = email.to_name.take() {
            email.to = format_address(&name, &email.to);
        }
        Cow::Owned(email)
    }
}

/// Body of `email/batchWithTemplates`, which takes an object rather than the
/// bare array `email/batch` accepts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct TemplatedBatch<'a> {
    pub messages: Vec<Cow<'a, TemplatedEmail>>,
}

impl<'a> TemplatedBatch<'a> {
    pub fn new(emails: &'a [TemplatedEmail]) -> Self {
        Self {
            messages: emails.iter().map(TemplatedEmail::prepared).collect(),
        }
    }
}

/// Format `name` and `address` as `"name" address`.
///
/// Backslashes and double quotes inside the name are escaped so the quoted
/// string stays well formed.
pub fn format_address(name: &str, address: &str) -> String {
    let mut out = String::with_capacity(name.len() + address.len() + 3);
    out.push('"');
    for c in name.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push_str("\" ");
    out.push_str(address);
    out
}
