//! Mail data models.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::Deserialize;

use crate::sanitize::sanitize;

/// Which mailbox a listing request targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// The virtual mailbox aggregating mail across every address.
    All,
    /// One named address.
    Address(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all mailboxes"),
            Self::Address(address) => write!(f, "{address}"),
        }
    }
}

/// A mail row exactly as the backend returns it. Immutable once fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMailRow {
    /// Numeric id; strictly increasing on the server.
    pub id: u64,
    /// RFC 5322 Message-ID, when known.
    #[serde(default)]
    pub message_id: Option<String>,
    /// Precomputed sender, when the backend extracted one.
    #[serde(default)]
    pub source: Option<String>,
    /// Receiving mailbox address.
    pub address: String,
    /// Raw RFC822 payload.
    pub raw: String,
    /// Creation timestamp as reported by the backend.
    pub created_at: String,
    /// Precomputed subject, when the backend extracted one.
    #[serde(default)]
    pub subject: Option<String>,
}

/// An attachment resolved to a locally addressable resource.
///
/// The decoded binary is shared between this reference and any inline
/// rewrite in the HTML body, and lives for the browsing session.
#[derive(Debug, Clone)]
pub struct AttachmentRef {
    /// Content-ID when present, else a generated opaque token.
    pub id: String,
    /// Declared filename, content-id as fallback, else empty.
    pub filename: String,
    /// Human-readable size, e.g. `1.5 KB`.
    pub size: String,
    /// Resolvable URL for the decoded binary.
    pub url: String,
    /// MIME type of the binary.
    pub content_type: String,
    /// The decoded binary itself.
    pub data: Arc<Vec<u8>>,
}

/// A mail record decoded into renderable structure.
///
/// Invariant: `html_body` and `text_body` are never both absent — on
/// decode failure the raw payload becomes the HTML body, so the record
/// is always renderable.
#[derive(Debug, Clone)]
pub struct ParsedMail {
    /// Mirrors [`RawMailRow::id`].
    pub id: u64,
    /// Receiving mailbox address.
    pub address: String,
    /// Creation timestamp as reported by the backend.
    pub created_at: String,
    /// Display sender: `Name <address>` when both known, else the bare
    /// address.
    pub sender: String,
    /// Subject, with a placeholder when absent.
    pub subject: String,
    /// HTML body, or the raw payload on decode failure.
    pub html_body: Option<String>,
    /// Plain-text body, populated independently of the HTML part.
    pub text_body: Option<String>,
    /// Attachments in declared order.
    pub attachments: Vec<AttachmentRef>,
    /// Original payload, kept for `.eml` export.
    pub raw: String,
}

/// Render-ready body of a mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderBody {
    /// Sanitized HTML, safe to inject into a document.
    Html(String),
    /// Literal text; must be rendered as text, never as markup.
    Text(String),
}

impl ParsedMail {
    /// Produces the body for rendering. Sanitization happens here, at
    /// render time; plain-text-only mail bypasses it entirely.
    #[must_use]
    pub fn render_body(&self) -> RenderBody {
        match &self.html_body {
            Some(html) => RenderBody::Html(sanitize(html)),
            None => RenderBody::Text(self.text_body.clone().unwrap_or_default()),
        }
    }

    /// Formats `created_at` in the local timezone for display.
    ///
    /// Falls back to the original string when the timestamp cannot be
    /// parsed.
    #[must_use]
    pub fn created_at_local(&self) -> String {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.created_at) {
            let local: DateTime<Local> = dt.with_timezone(&Local);
            return local.format("%a, %d %b %Y %H:%M:%S").to_string();
        }

        if let Ok(naive) = NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%d %H:%M:%S") {
            let local: DateTime<Local> = naive.and_utc().with_timezone(&Local);
            return local.format("%a, %d %b %Y %H:%M:%S").to_string();
        }

        self.created_at.clone()
    }

    /// The raw payload for `.eml` export.
    #[must_use]
    pub fn eml(&self) -> &str {
        &self.raw
    }
}

/// One page of decoded mail, newest first (server order, never re-sorted
/// client-side).
#[derive(Debug, Clone, Default)]
pub struct MailPage {
    /// Decoded rows in server order.
    pub items: Vec<ParsedMail>,
    /// Best-known total for the selector; `None` when the backend omitted
    /// the count and no earlier count is remembered.
    pub total: Option<u64>,
}

/// A mailbox address known to the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct MailboxInfo {
    /// Backend id.
    pub id: i64,
    /// Full address.
    pub name: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
    /// Stored mail count, when reported.
    #[serde(default)]
    pub mail_count: Option<u64>,
    /// Messages sent from this address.
    #[serde(default)]
    pub send_count: u64,
}

/// Server-side feature settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    /// Domains available for new mailboxes.
    pub domains: Vec<String>,
    /// Whether the backend requires authentication.
    pub need_auth: bool,
    /// Whether users may create mailboxes.
    pub enable_user_create_email: bool,
    /// Whether users may delete mailboxes.
    pub enable_user_delete_email: bool,
    /// Backend version string.
    pub version: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_row_deserializes_backend_shape() {
        let json = r#"{
            "id": 42,
            "message_id": "<abc@example>",
            "source": "alice@example.com",
            "address": "box@tmp.example.com",
            "raw": "Subject: hi\r\n\r\nbody",
            "created_at": "2026-08-30T10:00:00Z"
        }"#;

        let row: RawMailRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.id, 42);
        assert_eq!(row.source.as_deref(), Some("alice@example.com"));
        assert!(row.subject.is_none());
    }

    #[test]
    fn test_server_settings_camel_case() {
        let json = r#"{
            "domains": ["tmp.example.com"],
            "needAuth": true,
            "enableUserCreateEmail": true,
            "enableUserDeleteEmail": false,
            "version": "1.2.3"
        }"#;

        let settings: ServerSettings = serde_json::from_str(json).unwrap();
        assert!(settings.need_auth);
        assert!(!settings.enable_user_delete_email);
        assert_eq!(settings.domains, vec!["tmp.example.com"]);
    }

    #[test]
    fn test_created_at_local_falls_back() {
        let mail = ParsedMail {
            id: 1,
            address: String::new(),
            created_at: "not a date".to_string(),
            sender: String::new(),
            subject: String::new(),
            html_body: None,
            text_body: Some(String::new()),
            attachments: Vec::new(),
            raw: String::new(),
        };
        assert_eq!(mail.created_at_local(), "not a date");
    }

    #[test]
    fn test_render_body_prefers_html() {
        let mail = ParsedMail {
            id: 1,
            address: String::new(),
            created_at: String::new(),
            sender: String::new(),
            subject: String::new(),
            html_body: Some("<p>hi</p>".to_string()),
            text_body: Some("hi".to_string()),
            attachments: Vec::new(),
            raw: String::new(),
        };
        assert_eq!(mail.render_body(), RenderBody::Html("<p>hi</p>".to_string()));
    }

    #[test]
    fn test_render_body_text_is_literal() {
        let mail = ParsedMail {
            id: 1,
            address: String::new(),
            created_at: String::new(),
            sender: String::new(),
            subject: String::new(),
            html_body: None,
            text_body: Some("<b>not markup</b>".to_string()),
            attachments: Vec::new(),
            raw: String::new(),
        };
        // Plain text bypasses sanitization and stays literal
        assert_eq!(
            mail.render_body(),
            RenderBody::Text("<b>not markup</b>".to_string())
        );
    }
}
