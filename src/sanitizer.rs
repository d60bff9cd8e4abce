use std::sync::Arc;

use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::rule::SanitizeMode;

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?(?:-->|$)").unwrap());

// A '<' only opens a tag when a letter, '/', '!' or '?' follows it
static ANY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)</?[A-Za-z!?][^>]*(?:>|$)").unwrap());

static DANGEROUS_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)<script\b[^>]*>.*?(?:</script\s*>|$)|<style\b[^>]*>.*?(?:</style\s*>|$)|<iframe\b[^>]*>.*?(?:</iframe\s*>|$)|<object\b[^>]*>.*?(?:</object\s*>|$)",
    )
    .unwrap()
});

static ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<(/?)([A-Za-z][A-Za-z0-9]*)([^>]*)(?:>|$)").unwrap());

static HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
});

const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "em", "i", "li", "ol", "p", "pre", "span", "strong",
    "u", "ul",
];

const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Cleaning primitives used for string parameters.
///
/// The extractor calls these for non-numeric string values according to the
/// rule's [`SanitizeMode`]. Implementations must be pure and safe to call from
/// several threads at once.
///
/// # Examples
///
/// ```
/// use request_params::{Sanitizer, SanitizeMode, DefaultSanitizer};
///
/// let sanitizer = DefaultSanitizer::new();
/// assert_eq!(sanitizer.strip_tags("<b>Al</b>"), "Al");
/// assert_eq!(sanitizer.sanitize(SanitizeMode::None, "<b>Al</b>"), "<b>Al</b>");
/// ```
pub trait Sanitizer: Send + Sync {
    /// Removes every markup tag, keeping the text between tags.
    fn strip_tags(&self, text: &str) -> String;

    /// Rewrites markup so only safe elements and attributes remain.
    fn purify(&self, text: &str) -> String;

    /// Applies the primitive selected by `mode`.
    fn sanitize(&self, mode: SanitizeMode, text: &str) -> String {
        match mode {
            SanitizeMode::None => text.to_string(),
            SanitizeMode::StripTags => self.strip_tags(text),
            SanitizeMode::HtmlPurify => self.purify(text),
        }
    }
}

impl<S: Sanitizer + ?Sized> Sanitizer for &S {
    fn strip_tags(&self, text: &str) -> String {
        (**self).strip_tags(text)
    }

    fn purify(&self, text: &str) -> String {
        (**self).purify(text)
    }
}

impl<S: Sanitizer + ?Sized> Sanitizer for Box<S> {
    fn strip_tags(&self, text: &str) -> String {
        (**self).strip_tags(text)
    }

    fn purify(&self, text: &str) -> String {
        (**self).purify(text)
    }
}

impl<S: Sanitizer + ?Sized> Sanitizer for Arc<S> {
    fn strip_tags(&self, text: &str) -> String {
        (**self).strip_tags(text)
    }

    fn purify(&self, text: &str) -> String {
        (**self).purify(text)
    }
}

/// Regex based sanitizer used when no other implementation is injected.
///
/// - `strip_tags` drops comments and anything shaped like a tag, including a
///   trailing unterminated one.
/// - `purify` removes `script`, `style`, `iframe` and `object` blocks with their
///   content, keeps allow-listed elements with all attributes removed (except a
///   safe `href` on `<a>`), drops other tags, and normalizes text entities.
///
/// This is a conservative default, not a full HTML parser. Applications with
/// richer markup needs should inject their own [`Sanitizer`].
#[derive(Debug, Clone)]
pub struct DefaultSanitizer {
    allowed_tags: Vec<String>,
}

impl DefaultSanitizer {
    /// Creates a sanitizer with the default purify allow-list.
    pub fn new() -> Self {
        Self::with_allowed_tags(DEFAULT_ALLOWED_TAGS.iter().copied())
    }

    /// Creates a sanitizer whose purify step keeps only the given elements.
    ///
    /// Tag names are matched case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_params::{DefaultSanitizer, Sanitizer};
    ///
    /// let sanitizer = DefaultSanitizer::with_allowed_tags(["b"]);
    /// assert_eq!(sanitizer.purify("<b>x</b><i>y</i>"), "<b>x</b>y");
    /// ```
    pub fn with_allowed_tags<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            allowed_tags: tags
                .into_iter()
                .map(|t| t.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Returns the purify allow-list.
    pub fn allowed_tags(&self) -> &[String] {
        &self.allowed_tags
    }

    fn is_allowed(&self, name: &str) -> bool {
        self.allowed_tags.iter().any(|t| t == name)
    }

    fn rewrite_element(&self, caps: &Captures<'_>) -> String {
        let closing = !caps[1].is_empty();
        let name = caps[2].to_ascii_lowercase();

        if !self.is_allowed(&name) {
            return String::new();
        }
        if closing {
            return format!("</{}>", name);
        }
        if name == "a" {
            if let Some(href) = safe_href(&caps[3]) {
                return format!("<a href=\"{}\">", encode_double_quoted_attribute(&href));
            }
        }
        format!("<{}>", name)
    }
}

impl Default for DefaultSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

fn safe_href(attributes: &str) -> Option<String> {
    let caps = HREF.captures(attributes)?;
    let raw = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    let href = decode_html_entities(raw.as_str()).trim().to_string();

    let lowered: String = href
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if UNSAFE_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }
    Some(href)
}

impl Sanitizer for DefaultSanitizer {
    fn strip_tags(&self, text: &str) -> String {
        let mut current = text.to_string();
        // Removing one tag can join the halves of another, e.g. `<<b>i>`
        loop {
            let without_comments = COMMENT.replace_all(&current, "");
            let stripped = ANY_TAG.replace_all(&without_comments, "").into_owned();
            if stripped == current {
                return stripped;
            }
            current = stripped;
        }
    }

    fn purify(&self, text: &str) -> String {
        let without_comments = COMMENT.replace_all(text, "");
        let without_blocks = DANGEROUS_BLOCK.replace_all(&without_comments, "");

        let mut out = String::with_capacity(without_blocks.len());
        let mut last = 0;
        for caps in ELEMENT.captures_iter(&without_blocks) {
            let Some(whole) = caps.get(0) else { continue };
            let between = &without_blocks[last..whole.start()];
            out.push_str(&encode_text(&decode_html_entities(between)));
            out.push_str(&self.rewrite_element(&caps));
            last = whole.end();
        }
        out.push_str(&encode_text(&decode_html_entities(&without_blocks[last..])));
        out
    }
}

/// A sanitizer that returns its input unchanged (for testing only).
///
/// **WARNING:** This sanitizer performs NO cleaning. It is useful for asserting
/// pipeline behavior independently of any markup handling.
///
/// # Examples
///
/// ```
/// use request_params::{PassthroughSanitizer, Sanitizer};
///
/// assert_eq!(PassthroughSanitizer.strip_tags("<b>x</b>"), "<b>x</b>");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughSanitizer;

impl Sanitizer for PassthroughSanitizer {
    fn strip_tags(&self, text: &str) -> String {
        text.to_string()
    }

    fn purify(&self, text: &str) -> String {
        text.to_string()
    }
}
