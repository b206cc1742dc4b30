//! Render-time HTML sanitization.
//!
//! Message bodies are stored verbatim and cleaned on every render, so a
//! policy change applies to already-stored mail. The allow-lists cover the
//! markup common in real mail (tables, inline styles, `font` tags) while
//! stripping scripts and event handlers.

use std::collections::HashSet;
use std::sync::LazyLock;

use ammonia::Builder;

static CLEANER: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let tags: HashSet<&str> = [
        "p", "br", "b", "i", "em", "strong", "u", "small", "sub", "sup", "h1", "h2", "h3", "h4",
        "h5", "h6", "ul", "ol", "li", "table", "thead", "tbody", "tr", "td", "th", "div", "span",
        "a", "img", "blockquote", "pre", "code", "style", "font", "center", "hr",
    ]
    .into_iter()
    .collect();

    let mut builder = Builder::default();
    builder
        // "style" defaults to clean-content; it must leave that set before
        // it can be allowed as a tag
        .rm_clean_content_tags(["style"])
        .tags(tags)
        .generic_attributes(["class", "id", "style"].into_iter().collect())
        .tag_attributes(
            [
                ("a", ["href", "target", "rel"].into_iter().collect()),
                ("img", ["src", "alt", "width", "height"].into_iter().collect()),
                (
                    "table",
                    ["border", "cellpadding", "cellspacing"].into_iter().collect(),
                ),
                ("font", ["face", "color", "size"].into_iter().collect()),
            ]
            .into_iter()
            .collect(),
        )
        // "rel" is an allowed attribute on <a>, so ammonia must not also
        // manage it
        .link_rel(None)
        .url_schemes(
            ["http", "https", "mailto", "tel", "data", "cid"]
                .into_iter()
                .collect(),
        );
    builder
});

/// Cleans untrusted HTML down to the mail-rendering allow-lists.
///
/// Idempotent: cleaning already-clean output is a no-op.
#[must_use]
pub fn sanitize(html: &str) -> String {
    CLEANER.clean(html).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_script_tags() {
        let out = sanitize("<p>hi</p><script>alert(1)</script>");
        assert!(out.contains("<p>hi</p>"));
        assert!(!out.contains("script"));
        assert!(!out.contains("alert"));
    }

    #[test]
    fn test_strips_event_handlers() {
        let out = sanitize(r#"<div onclick="evil()">x</div>"#);
        assert!(out.contains("<div>x</div>"));
        assert!(!out.contains("onclick"));
    }

    #[test]
    fn test_strips_unknown_attributes() {
        let out = sanitize(r#"<span data-track="1" id="s">x</span>"#);
        assert!(!out.contains("data-track"));
        assert!(out.contains(r#"id="s""#));
    }

    #[test]
    fn test_keeps_anchor_target() {
        let out = sanitize(r#"<a href="https://example.com" target="_blank">go</a>"#);
        assert!(out.contains(r#"target="_blank""#));
        assert!(out.contains(r#"href="https://example.com""#));
    }

    #[test]
    fn test_keeps_style_blocks() {
        let out = sanitize("<style>p { color: red; }</style><p>x</p>");
        assert!(out.contains("color: red"));
    }

    #[test]
    fn test_keeps_data_image_urls() {
        let out = sanitize(r#"<img src="data:image/png;base64,iVBORw0=" alt="logo">"#);
        assert!(out.contains("data:image/png;base64,iVBORw0="));
    }

    #[test]
    fn test_removes_javascript_urls() {
        let out = sanitize(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!out.contains("javascript"));
    }

    #[test]
    fn test_keeps_table_layout() {
        let out = sanitize(r#"<table border="0" cellpadding="4"><tr><td>c</td></tr></table>"#);
        assert!(out.contains(r#"border="0""#));
        assert!(out.contains(r#"cellpadding="4""#));
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(html in ".*") {
            let once = sanitize(&html);
            prop_assert_eq!(sanitize(&once), once);
        }
    }
}
