//! Attachment resolution and inline content-id rewriting.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tempbox_mime::Part;

use super::model::AttachmentRef;

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Fallback MIME type for parts that declare none.
const OCTET_STREAM: &str = "application/octet-stream";

/// Resolves decoded attachment parts into [`AttachmentRef`]s.
///
/// When a part carries a Content-ID that the HTML body references as
/// `cid:<id>`, the first occurrence of that reference is rewritten in
/// place to the attachment's resolved URL.
pub fn resolve(parts: &[&Part], html_body: &mut Option<String>) -> Vec<AttachmentRef> {
    parts
        .iter()
        .map(|part| {
            let data = Arc::new(part.decoded_body());
            let content_type = if part.headers.get("content-type").is_some() {
                part.content_type().essence()
            } else {
                OCTET_STREAM.to_string()
            };
            let url = data_url(&content_type, &data);

            let content_id = part.content_id().map(str::to_string);
            if let (Some(cid), Some(body)) = (content_id.as_deref(), html_body.as_mut()) {
                rewrite_inline(body, cid, &url);
            }

            let filename = part
                .filename()
                .or_else(|| content_id.clone())
                .unwrap_or_default();
            let id = content_id.unwrap_or_else(random_token);

            AttachmentRef {
                id,
                filename,
                size: human_size(data.len() as u64),
                url,
                content_type,
                data,
            }
        })
        .collect()
}

/// Replaces the first `cid:<content_id>` reference with the resolved URL.
fn rewrite_inline(body: &mut String, content_id: &str, url: &str) {
    let needle = format!("cid:{content_id}");
    if let Some(pos) = body.find(&needle) {
        body.replace_range(pos..pos + needle.len(), url);
    }
}

/// Builds a self-contained `data:` URL for the decoded binary.
fn data_url(content_type: &str, data: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(data))
}

/// Generates an opaque token for attachments without a Content-ID.
/// Collision probability is assumed negligible; uniqueness is not
/// cryptographically guaranteed.
fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(13)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// Formats a byte count in the largest fitting unit, to two decimal
/// places with trailing zeros trimmed.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn human_size(bytes: u64) -> String {
    // log(0) is undefined; zero is unit index 0 by convention
    if bytes == 0 {
        return "0 B".to_string();
    }

    let exponent = (bytes.ilog(1024) as usize).min(SIZE_UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);

    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[exponent])
}
