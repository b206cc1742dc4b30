//! MIME message structure and parsing.

use crate::address::Mailbox;
use crate::content_type::{ContentType, parse_disposition};
use crate::encoding::{decode_base64, decode_encoded_words, decode_quoted_printable};
use crate::error::{Error, Result};
use crate::header::Headers;

/// Nested multiparts deeper than this are treated as opaque leaves.
const MAX_MULTIPART_DEPTH: usize = 8;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit, // Default (includes "7bit")
        }
    }
}

/// One leaf part of a message: its headers plus the raw (still
/// transfer-encoded) body segment.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Raw body segment, before transfer decoding.
    pub body: String,
}

impl Part {
    /// Gets the content type, defaulting to text/plain per RFC 2045.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.headers
            .get("content-type")
            .and_then(|v| ContentType::parse(v).ok())
            .unwrap_or_else(ContentType::text_plain)
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Decodes the body according to the transfer encoding.
    ///
    /// Invalid Base64 degrades to the raw bytes rather than failing the
    /// part; a broken attachment is still better than a dropped message.
    #[must_use]
    pub fn decoded_body(&self) -> Vec<u8> {
        match self.transfer_encoding() {
            TransferEncoding::Base64 => decode_base64(&self.body)
                .unwrap_or_else(|_| self.body.clone().into_bytes()),
            TransferEncoding::QuotedPrintable => decode_quoted_printable(&self.body),
            _ => self.body.clone().into_bytes(),
        }
    }

    /// Gets the decoded body as text (lossy for non-UTF-8 charsets).
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.decoded_body()).into_owned()
    }

    /// Returns the Content-ID with surrounding angle brackets stripped.
    #[must_use]
    pub fn content_id(&self) -> Option<&str> {
        let id = self
            .headers
            .get("content-id")?
            .trim()
            .trim_start_matches('<')
            .trim_end_matches('>');
        (!id.is_empty()).then_some(id)
    }

    /// Returns the declared filename, from the Content-Disposition
    /// `filename` parameter or the legacy Content-Type `name` parameter.
    #[must_use]
    pub fn filename(&self) -> Option<String> {
        if let Some(value) = self.headers.get("content-disposition") {
            let (_, params) = parse_disposition(value);
            if let Some(filename) = params.get("filename") {
                return Some(decode_encoded_words(filename));
            }
        }
        self.content_type().name().map(decode_encoded_words)
    }

    /// Whether the Content-Disposition marks this part as an attachment.
    #[must_use]
    pub fn is_attachment_disposition(&self) -> bool {
        self.headers
            .get("content-disposition")
            .is_some_and(|v| parse_disposition(v).0 == "attachment")
    }
}

/// A parsed MIME message: top-level headers plus flattened leaf parts.
///
/// Nested multiparts (e.g. `multipart/alternative` inside
/// `multipart/mixed`) are walked at parse time, so `parts` only contains
/// leaves. Single-part messages yield exactly one part carrying the
/// top-level headers.
#[derive(Debug, Clone)]
pub struct Message {
    /// Message headers.
    pub headers: Headers,
    /// Flattened leaf parts.
    pub parts: Vec<Part>,
}

impl Message {
    /// Parses a raw RFC822 payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is empty or has no header section;
    /// anything with headers parses into at least one part.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::Parse("empty payload".to_string()));
        }

        let (header_text, body) = split_message(raw);
        let headers = Headers::parse(header_text);
        if headers.is_empty() {
            return Err(Error::Parse("no header section".to_string()));
        }

        let mut parts = Vec::new();
        collect_leaves(&headers, body, 0, &mut parts);

        Ok(Self { headers, parts })
    }

    /// Gets the decoded Subject, if present and non-empty.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        self.headers
            .get_text("subject")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Parses the From header into a mailbox.
    #[must_use]
    pub fn from_mailbox(&self) -> Option<Mailbox> {
        self.headers.get("from").and_then(Mailbox::parse)
    }

    /// First text/html leaf that is not an explicit attachment.
    #[must_use]
    pub fn html_part(&self) -> Option<String> {
        self.body_part("html")
    }

    /// First text/plain leaf that is not an explicit attachment.
    #[must_use]
    pub fn text_part(&self) -> Option<String> {
        self.body_part("plain")
    }

    fn body_part(&self, sub_type: &str) -> Option<String> {
        self.parts
            .iter()
            .find(|p| p.content_type().is_text(sub_type) && !p.is_attachment_disposition())
            .map(Part::text)
    }

    /// Leaves that are attachments: explicit attachment disposition, an
    /// inline part with a Content-ID, or any non-text payload.
    #[must_use]
    pub fn attachment_parts(&self) -> Vec<&Part> {
        self.parts
            .iter()
            .filter(|p| {
                let ct = p.content_type();
                p.is_attachment_disposition()
                    || p.content_id().is_some()
                    || !(ct.is_text("plain") || ct.is_text("html"))
            })
            .collect()
    }
}

/// Splits a raw message into header text and body at the first blank line.
fn split_message(raw: &str) -> (&str, &str) {
    let crlf = raw.find("\r\n\r\n");
    let lf = raw.find("\n\n");

    let (idx, len) = match (crlf, lf) {
        (Some(c), Some(l)) if c <= l => (c, 4),
        (Some(c), None) => (c, 4),
        (_, Some(l)) => (l, 2),
        (None, None) => return (raw, ""),
    };

    (&raw[..idx], &raw[idx + len..])
}

/// Recursively flattens a (possibly multipart) body into leaf parts.
fn collect_leaves(headers: &Headers, body: &str, depth: usize, out: &mut Vec<Part>) {
    let content_type = headers
        .get("content-type")
        .and_then(|v| ContentType::parse(v).ok())
        .unwrap_or_else(ContentType::text_plain);

    if depth < MAX_MULTIPART_DEPTH
        && content_type.is_multipart()
        && let Some(boundary) = content_type.boundary()
    {
        for segment in split_multipart(body, boundary) {
            let (part_header_text, part_body) = split_message(&segment);
            let part_headers = Headers::parse(part_header_text);
            collect_leaves(&part_headers, part_body, depth + 1, out);
        }
        return;
    }

    out.push(Part {
        headers: headers.clone(),
        body: body.to_string(),
    });
}

/// Splits a multipart body on its boundary lines.
fn split_multipart(body: &str, boundary: &str) -> Vec<String> {
    let delimiter = format!("--{boundary}");
    let close = format!("--{boundary}--");

    let mut segments = Vec::new();
    let mut current: Option<String> = None;

    for line in body.lines() {
        let trimmed = line.trim_end();
        if trimmed == close {
            if let Some(segment) = current.take() {
                segments.push(segment);
            }
            break;
        }
        if trimmed == delimiter {
            if let Some(segment) = current.take() {
                segments.push(segment);
            }
            current = Some(String::new());
            continue;
        }
        if let Some(segment) = current.as_mut() {
            segment.push_str(line);
            segment.push_str("\r\n");
        }
    }

    if let Some(segment) = current.take() {
        segments.push(segment);
    }

    segments
}
