//! MIME header handling.

use crate::encoding::decode_encoded_words;
use std::collections::HashMap;

/// Collection of email headers.
///
/// Header names are case-insensitive; values are stored in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: HashMap<String, Vec<String>>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        self.headers.entry(name).or_default().push(value.into());
    }

    /// Gets the first raw value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|v| v.first().map(String::as_str))
    }

    /// Gets all raw values for a header.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get(&name.to_lowercase())
            .map(|v| v.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Gets the first value for a header with RFC 2047 encoded words decoded.
    #[must_use]
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.get(name).map(decode_encoded_words)
    }

    /// Returns true if no headers were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Parses headers from raw text.
    ///
    /// Continuation lines (leading space or tab) are unfolded into the
    /// previous header value. Parsing stops at the first empty line.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut headers = Self::new();
        let mut current_name: Option<String> = None;
        let mut current_value = String::new();

        for line in text.lines() {
            if line.is_empty() {
                break;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                // Continuation of the previous header
                if current_name.is_some() {
                    current_value.push(' ');
                    current_value.push_str(line.trim());
                }
            } else {
                if let Some(name) = current_name.take() {
                    headers.add(name, current_value.trim().to_string());
                    current_value.clear();
                }

                if let Some((name, value)) = line.split_once(':') {
                    current_name = Some(name.trim().to_string());
                    current_value = value.trim().to_string();
                }
            }
        }

        if let Some(name) = current_name {
            headers.add(name, current_value.trim().to_string());
        }

        headers
    }
}
