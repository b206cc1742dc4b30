//! Mailbox address parsing for display.

use crate::encoding::decode_encoded_words;

/// A single mailbox from an address header: optional display name plus
/// the bare address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    /// Display name, if the header carried one.
    pub name: Option<String>,
    /// Bare email address.
    pub address: String,
}

impl Mailbox {
    /// Parses a `From`-style header value.
    ///
    /// Accepts `Name <addr>`, `"Name" <addr>`, RFC 2047 encoded names,
    /// and bare addresses. Returns `None` when no address can be found.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = decode_encoded_words(value);
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if let Some(start) = value.rfind('<')
            && let Some(end) = value.rfind('>')
            && start < end
        {
            let address = value[start + 1..end].trim().to_string();
            if address.is_empty() {
                return None;
            }
            let name = value[..start].trim().trim_matches('"').trim().to_string();
            return Some(Self {
                name: (!name.is_empty()).then_some(name),
                address,
            });
        }

        // Bare address
        value.contains('@').then(|| Self {
            name: None,
            address: value.to_string(),
        })
    }

    /// Formats the mailbox for display: `Name <address>` when both are
    /// known, the bare address otherwise.
    #[must_use]
    pub fn display(&self) -> String {
        match &self.name {
            Some(name) => format!("{name} <{}>", self.address),
            None => self.address.clone(),
        }
    }
}
