//! MIME content type handling.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// MIME content type with parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "image", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "html", "jpeg").
    pub sub_type: String,
    /// Parameters (e.g., charset=utf-8, boundary=xxx).
    pub parameters: HashMap<String, String>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: HashMap::new(),
        }
    }

    /// Creates a text/plain content type, the RFC 2045 default.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain")
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameters.get("charset").map(String::as_str)
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameters.get("boundary").map(String::as_str)
    }

    /// Returns the name parameter if present (legacy attachment filename).
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.parameters.get("name").map(String::as_str)
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("multipart")
    }

    /// Checks if this is the given text subtype.
    #[must_use]
    pub fn is_text(&self, sub_type: &str) -> bool {
        self.main_type.eq_ignore_ascii_case("text")
            && self.sub_type.eq_ignore_ascii_case(sub_type)
    }

    /// Returns `type/subtype` without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2="value 2"`
    ///
    /// # Errors
    ///
    /// Returns an error if the `type/subtype` is missing or malformed.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(';');

        let type_str = parts
            .next()
            .ok_or_else(|| Error::InvalidContentType("Empty content type".to_string()))?
            .trim();

        let (main_type, sub_type) = type_str
            .split_once('/')
            .ok_or_else(|| Error::InvalidContentType(format!("Missing subtype: {type_str}")))?;

        let mut content_type = Self::new(
            main_type.trim().to_lowercase(),
            sub_type.trim().to_lowercase(),
        );

        for param in parts {
            if let Some((key, value)) = param.trim().split_once('=') {
                let key = key.trim().to_lowercase();
                let value = value.trim().trim_matches('"').to_string();
                content_type.parameters.insert(key, value);
            }
        }

        Ok(content_type)
    }
}

/// Parses a `Content-Disposition` header into its token and parameters.
///
/// Format: `attachment; filename="report.pdf"`.
pub(crate) fn parse_disposition(s: &str) -> (String, HashMap<String, String>) {
    let mut parts = s.split(';');
    let token = parts
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    let mut parameters = HashMap::new();
    for param in parts {
        if let Some((key, value)) = param.trim().split_once('=') {
            parameters.insert(
                key.trim().to_lowercase(),
                value.trim().trim_matches('"').to_string(),
            );
        }
    }

    (token, parameters)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parse() {
        let ct = ContentType::parse("text/plain; charset=utf-8").unwrap();
        assert_eq!(ct.main_type, "text");
        assert_eq!(ct.sub_type, "plain");
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn test_content_type_parse_quoted() {
        let ct = ContentType::parse("multipart/mixed; boundary=\"----=_Part_123\"").unwrap();
        assert!(ct.is_multipart());
        assert_eq!(ct.boundary(), Some("----=_Part_123"));
    }

    #[test]
    fn test_content_type_parse_invalid() {
        assert!(ContentType::parse("gibberish").is_err());
    }

    #[test]
    fn test_is_text() {
        let ct = ContentType::parse("TEXT/HTML").unwrap();
        assert!(ct.is_text("html"));
        assert!(!ct.is_text("plain"));
    }

    #[test]
    fn test_essence() {
        let ct = ContentType::parse("image/png; name=logo.png").unwrap();
        assert_eq!(ct.essence(), "image/png");
        assert_eq!(ct.name(), Some("logo.png"));
    }

    #[test]
    fn test_parse_disposition() {
        let (token, params) = parse_disposition("attachment; filename=\"report.pdf\"");
        assert_eq!(token, "attachment");
        assert_eq!(params.get("filename").unwrap(), "report.pdf");
    }

    #[test]
    fn test_parse_disposition_inline() {
        let (token, params) = parse_disposition("inline");
        assert_eq!(token, "inline");
        assert!(params.is_empty());
    }
}
