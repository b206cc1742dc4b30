//! Mail domain types and the decode pipeline.

pub mod attachment;
pub mod decode;
mod model;

pub use model::{
    AttachmentRef, MailPage, MailboxInfo, ParsedMail, RawMailRow, RenderBody, Selector,
    ServerSettings,
};
