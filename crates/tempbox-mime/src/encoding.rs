//! MIME decoding utilities.
//!
//! Supports Base64, Quoted-Printable, and RFC 2047 encoded-word decoding.
//! Quoted-Printable is decoded leniently: an invalid escape sequence is
//! kept as literal text instead of rejecting the whole part.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decodes Base64 data.
///
/// Whitespace is stripped first, so folded body lines decode as one block.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Decodes Quoted-Printable text (RFC 2045) into raw bytes.
///
/// Soft line breaks (`=` at end of line) are removed. Invalid escape
/// sequences pass through literally.
#[must_use]
pub fn decode_quoted_printable(text: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b != b'=' {
            result.push(b);
            i += 1;
            continue;
        }

        // Soft line break: "=\r\n" or "=\n"
        if bytes.get(i + 1) == Some(&b'\r') && bytes.get(i + 2) == Some(&b'\n') {
            i += 3;
            continue;
        }
        if bytes.get(i + 1) == Some(&b'\n') {
            i += 2;
            continue;
        }

        // Hex encoded byte
        if let (Some(&hi), Some(&lo)) = (bytes.get(i + 1), bytes.get(i + 2))
            && let Some(byte) = hex_pair(hi, lo)
        {
            result.push(byte);
            i += 3;
            continue;
        }

        // Not a valid escape, keep the '=' literally
        result.push(b'=');
        i += 1;
    }

    result
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    u8::try_from(hi * 16 + lo).ok()
}

/// Decodes a header value containing RFC 2047 encoded words.
///
/// Format of one word: `=?charset?encoding?encoded-text?=`. Plain tokens
/// are kept as-is; whitespace between two adjacent encoded words is
/// dropped per RFC 2047 §6.2. Non-UTF-8 charsets are decoded lossily.
#[must_use]
pub fn decode_encoded_words(value: &str) -> String {
    let mut result = String::new();
    let mut previous_encoded = false;

    for token in value.split_whitespace() {
        if let Some(decoded) = decode_word(token) {
            if !previous_encoded && !result.is_empty() {
                result.push(' ');
            }
            result.push_str(&decoded);
            previous_encoded = true;
        } else {
            if !result.is_empty() {
                result.push(' ');
            }
            result.push_str(token);
            previous_encoded = false;
        }
    }

    result
}

/// Decodes a single RFC 2047 encoded word, or `None` if the token is not one.
fn decode_word(token: &str) -> Option<String> {
    let inner = token.strip_prefix("=?")?.strip_suffix("?=")?;
    let mut fields = inner.splitn(3, '?');
    let _charset = fields.next()?;
    let encoding = fields.next()?;
    let text = fields.next()?;

    let bytes = match encoding {
        "B" | "b" => decode_base64(text).ok()?,
        // Q encoding uses '_' for space
        "Q" | "q" => decode_quoted_printable(&text.replace('_', " ")),
        _ => return None,
    };

    Some(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_decode() {
        let decoded = decode_base64("SGVsbG8sIFdvcmxkIQ==").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn test_base64_decode_folded() {
        let decoded = decode_base64("SGVsbG8s\r\nIFdvcmxkIQ==").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn test_base64_decode_invalid() {
        assert!(decode_base64("!!not base64!!").is_err());
    }

    #[test]
    fn test_quoted_printable_decode() {
        assert_eq!(decode_quoted_printable("Hello, World!"), b"Hello, World!");
        assert_eq!(
            String::from_utf8(decode_quoted_printable("H=C3=A9llo")).unwrap(),
            "Héllo"
        );
    }

    #[test]
    fn test_quoted_printable_soft_line_break() {
        assert_eq!(decode_quoted_printable("Hello=\r\nWorld"), b"HelloWorld");
        assert_eq!(decode_quoted_printable("Hello=\nWorld"), b"HelloWorld");
    }

    #[test]
    fn test_quoted_printable_invalid_escape_kept() {
        assert_eq!(decode_quoted_printable("100=ZZ"), b"100=ZZ");
        assert_eq!(decode_quoted_printable("trailing="), b"trailing=");
    }

    #[test]
    fn test_encoded_word_base64() {
        assert_eq!(decode_encoded_words("=?utf-8?B?SMOpbGxv?="), "Héllo");
    }

    #[test]
    fn test_encoded_word_quoted_printable() {
        assert_eq!(decode_encoded_words("=?utf-8?Q?H=C3=A9llo?="), "Héllo");
        assert_eq!(decode_encoded_words("=?utf-8?Q?two_words?="), "two words");
    }

    #[test]
    fn test_mixed_plain_and_encoded() {
        assert_eq!(
            decode_encoded_words("Re: =?utf-8?B?SMOpbGxv?="),
            "Re: Héllo"
        );
    }

    #[test]
    fn test_adjacent_encoded_words_join() {
        // Whitespace between adjacent encoded words is not significant
        assert_eq!(
            decode_encoded_words("=?utf-8?B?SGVs?= =?utf-8?B?bG8=?="),
            "Hello"
        );
    }

    #[test]
    fn test_plain_value_passes_through() {
        assert_eq!(decode_encoded_words("Plain subject line"), "Plain subject line");
    }
}
