//! # tempbox-mime
//!
//! MIME message decoding library for the tempbox mail client.
//!
//! This crate turns one raw RFC822 payload into a structured message:
//! headers, decoded text/HTML bodies, and attachment parts. It only
//! decodes; message generation is out of scope for a receive-only client.
//!
//! ## Features
//!
//! - **Message parsing**: multipart messages are flattened into leaf parts,
//!   including nested `multipart/alternative` inside `multipart/mixed`
//! - **Encodings**: Base64, Quoted-Printable, RFC 2047 encoded words
//! - **Addresses**: `Name <address>` mailbox parsing for display
//!
//! ## Quick start
//!
//! ```
//! use tempbox_mime::Message;
//!
//! let raw = "From: Alice <alice@example.com>\r\n\
//!            Subject: Hello\r\n\
//!            Content-Type: text/plain\r\n\
//!            \r\n\
//!            Hi there!";
//!
//! let message = Message::parse(raw)?;
//! assert_eq!(message.subject().as_deref(), Some("Hello"));
//! assert_eq!(message.text_part().as_deref(), Some("Hi there!"));
//! # Ok::<(), tempbox_mime::Error>(())
//! ```
//!
//! Decoders are deliberately lenient: real-world mail is sloppy, and a
//! malformed escape sequence should degrade to literal text rather than
//! fail the whole message.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use address::Mailbox;
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, Part, TransferEncoding};
