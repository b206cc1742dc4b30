//! Per-row MIME decoding.
//!
//! Decoding never fails: malformed or unusual MIME degrades to a
//! renderable record carrying the raw payload, never an error. A single
//! bad message must not take the whole list down.

use tempbox_mime::Message;

use super::attachment;
use super::model::{ParsedMail, RawMailRow};

/// Placeholder subject for messages without one.
pub const NO_SUBJECT: &str = "(no subject)";

/// Decodes one raw row into a renderable [`ParsedMail`].
///
/// On parse failure the record falls back to the placeholder subject and
/// the raw payload as HTML body, with no attachments.
#[must_use]
pub fn decode_row(row: &RawMailRow) -> ParsedMail {
    match try_decode(row) {
        Ok(mail) => mail,
        Err(error) => {
            tracing::debug!(id = row.id, %error, "MIME decode failed, falling back to raw payload");
            ParsedMail {
                id: row.id,
                address: row.address.clone(),
                created_at: row.created_at.clone(),
                sender: row.source.clone().unwrap_or_default(),
                subject: NO_SUBJECT.to_string(),
                html_body: Some(row.raw.clone()),
                text_body: None,
                attachments: Vec::new(),
                raw: row.raw.clone(),
            }
        }
    }
}

fn try_decode(row: &RawMailRow) -> Result<ParsedMail, tempbox_mime::Error> {
    let message = Message::parse(&row.raw)?;

    let sender = message
        .from_mailbox()
        .map(|mailbox| mailbox.display())
        .or_else(|| row.source.clone())
        .unwrap_or_default();

    let subject = message.subject().unwrap_or_else(|| NO_SUBJECT.to_string());

    let mut html_body = message.html_part();
    let text_body = message.text_part();

    // Always renderable: with neither body part, the raw payload stands in
    if html_body.is_none() && text_body.is_none() {
        html_body = Some(row.raw.clone());
    }

    let attachments = attachment::resolve(&message.attachment_parts(), &mut html_body);

    Ok(ParsedMail {
        id: row.id,
        address: row.address.clone(),
        created_at: row.created_at.clone(),
        sender,
        subject,
        html_body,
        text_body,
        attachments,
        raw: row.raw.clone(),
    })
}
