//! Client core for a hosted temporary-mailbox service.
//!
//! The crate decodes raw mail into renderable records
//! ([`mail::decode`]), resolves attachments into locally addressable
//! resources ([`mail::attachment`]), sanitizes HTML at render time
//! ([`sanitize`]), talks to the hosted API through a cached gateway
//! ([`gateway`]), and keeps a mailbox list synchronized with pagination
//! and polling ([`sync::ListSync`]).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod gateway;
pub mod mail;
pub mod sanitize;
pub mod settings;
pub mod sync;

pub use error::{Error, Result};
pub use gateway::{Cached, HttpGateway, MailGateway};
pub use mail::{ParsedMail, Selector};
pub use settings::ClientSettings;
pub use sync::{ListSync, LoadState};

/// The production gateway: HTTP transport behind a read-through cache.
pub type RemoteGateway = Cached<HttpGateway>;
