//! Rule grammar.
//!
//! A rule is a compact directive describing one parameter to extract:
//!
//! ```text
//! [type:]source[:mode][#dest][@default:literal]
//! ```
//!
//! - `type`: `s` (string, the default), `i` (integer), `f` or `d` (decimal),
//!   `a` (JSON array/object)
//! - `mode`: string rules only: `0` no sanitizing, `1` HTML purify,
//!   `2` strip tags (the default)
//! - `dest`: output key, when it differs from `source`
//! - `literal`: default used when the parameter is absent or not coercible
//!
//! A rule set is either one comma separated string or a list of rule strings.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RuleError;
use crate::value::Value;

static COMMA_SEP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*,[ \t]*").unwrap());

const DEFAULT_MARKER: &str = "@default:";

/// Target type of an extracted parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    /// Sanitized text
    #[default]
    String,
    /// Signed integer, [`INT_SENTINEL`](crate::INT_SENTINEL) when unusable
    Int,
    /// Decimal rendered with two fraction digits
    Decimal,
    /// JSON array or object
    Array,
}

impl ValueType {
    /// Resolves a one-letter type prefix.
    fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'i' => Some(ValueType::Int),
            'f' | 'd' => Some(ValueType::Decimal),
            's' => Some(ValueType::String),
            'a' => Some(ValueType::Array),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String => write!(f, "string"),
            ValueType::Int => write!(f, "int"),
            ValueType::Decimal => write!(f, "decimal"),
            ValueType::Array => write!(f, "array"),
        }
    }
}

/// How a string parameter is cleaned before it is returned.
///
/// The numeric codes match the rule suffixes `:0`, `:1` and `:2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SanitizeMode {
    /// Keep the text verbatim
    None,
    /// Run the text through the HTML purifier
    HtmlPurify,
    /// Remove all markup tags
    #[default]
    StripTags,
}

impl SanitizeMode {
    /// Maps a numeric mode code to a mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_params::SanitizeMode;
    ///
    /// assert_eq!(SanitizeMode::from_code(0), Some(SanitizeMode::None));
    /// assert_eq!(SanitizeMode::from_code(2), Some(SanitizeMode::StripTags));
    /// assert_eq!(SanitizeMode::from_code(7), None);
    /// ```
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SanitizeMode::None),
            1 => Some(SanitizeMode::HtmlPurify),
            2 => Some(SanitizeMode::StripTags),
            _ => None,
        }
    }

    /// Returns the numeric code of this mode.
    pub fn code(self) -> u8 {
        match self {
            SanitizeMode::None => 0,
            SanitizeMode::HtmlPurify => 1,
            SanitizeMode::StripTags => 2,
        }
    }

    /// Splits a trailing `:0`, `:1` or `:2` off `text`.
    fn split_suffix(text: &str) -> Option<(&str, Self)> {
        let (rest, code) = text.rsplit_once(':')?;
        let mut chars = code.chars();
        let digit = chars.next()?.to_digit(10)?;
        if chars.next().is_some() {
            return None;
        }
        let mode = Self::from_code(u8::try_from(digit).ok()?)?;
        Some((rest, mode))
    }
}

/// A parsed rule.
///
/// Descriptors are short-lived: they are produced by [`parse_rules`] and
/// consumed by an [`Extractor`](crate::Extractor) within the same call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDescriptor {
    /// Coercion target
    pub value_type: ValueType,
    /// Key looked up in the input, never empty
    pub source_key: String,
    /// Key written to the output
    pub dest_key: String,
    /// Cleaning applied to non-numeric string values
    pub sanitize_mode: SanitizeMode,
    /// Raw default text; `None` means no `@default:` marker was given
    pub default_literal: Option<String>,
}

/// A rule set as supplied by the caller.
///
/// # Examples
///
/// ```
/// use request_params::RuleSpec;
///
/// let single = RuleSpec::from("i:page@default:1, s:q");
/// let list = RuleSpec::from(vec!["i:page@default:1", "s:q"]);
///
/// assert_eq!(single.rule_strings(), list.rule_strings());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSpec {
    /// Comma separated rules in one string
    Single(String),
    /// One rule per element
    List(Vec<String>),
}

impl RuleSpec {
    /// Builds a rule set from an untyped value.
    ///
    /// A string becomes [`RuleSpec::Single`]. A sequence made only of strings
    /// becomes [`RuleSpec::List`]. Anything else, including a sequence with a
    /// single non-string element, yields an empty list, which makes the
    /// extractor pass its input through unchanged.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => RuleSpec::Single(s.clone()),
            Value::Sequence(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(RuleSpec::List)
                .unwrap_or_else(|| RuleSpec::List(Vec::new())),
            _ => RuleSpec::List(Vec::new()),
        }
    }

    /// Returns the individual rule strings, trimmed of spaces and tabs.
    pub fn rule_strings(&self) -> Vec<&str> {
        match self {
            RuleSpec::Single(s) if s.is_empty() => Vec::new(),
            RuleSpec::Single(s) => COMMA_SEP.split(s).map(trim_blank).collect(),
            RuleSpec::List(rules) => rules.iter().map(|r| trim_blank(r)).collect(),
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(s: &str) -> Self {
        RuleSpec::Single(s.to_string())
    }
}

impl From<String> for RuleSpec {
    fn from(s: String) -> Self {
        RuleSpec::Single(s)
    }
}

impl From<Vec<String>> for RuleSpec {
    fn from(rules: Vec<String>) -> Self {
        RuleSpec::List(rules)
    }
}

impl From<Vec<&str>> for RuleSpec {
    fn from(rules: Vec<&str>) -> Self {
        RuleSpec::List(rules.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for RuleSpec {
    fn from(rules: &[&str]) -> Self {
        RuleSpec::List(rules.iter().map(|r| r.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RuleSpec {
    fn from(rules: [&str; N]) -> Self {
        RuleSpec::List(rules.iter().map(|r| r.to_string()).collect())
    }
}

fn trim_blank(s: &str) -> &str {
    s.trim_matches(|c| c == ' ' || c == '\t')
}

/// Parses a single rule string.
///
/// Parsing happens in a fixed order: the `@default:` literal is split off
/// first so it cannot be mistaken for a type or mode, then the type prefix,
/// then the sanitize suffix (string rules only), then the `#` rename.
///
/// # Errors
///
/// Returns [`RuleError`] when nothing is left to use as a source key.
///
/// # Examples
///
/// ```
/// use request_params::{parse_rule, SanitizeMode, ValueType};
///
/// let rule = parse_rule("i:age#userAge@default:30").unwrap();
/// assert_eq!(rule.value_type, ValueType::Int);
/// assert_eq!(rule.source_key, "age");
/// assert_eq!(rule.dest_key, "userAge");
/// assert_eq!(rule.default_literal.as_deref(), Some("30"));
///
/// let rule = parse_rule("bio:1").unwrap();
/// assert_eq!(rule.sanitize_mode, SanitizeMode::HtmlPurify);
///
/// assert!(parse_rule("s:").is_err());
/// ```
pub fn parse_rule(rule: &str) -> Result<RuleDescriptor, RuleError> {
    let original = trim_blank(rule);
    if original.is_empty() {
        return Err(RuleError::EmptyRule);
    }

    let mut body = original;
    let mut default_literal = None;

    if body.contains(DEFAULT_MARKER) {
        if let Some((head, tail)) = body.rsplit_once('@') {
            let literal = tail.strip_prefix("default:").unwrap_or(tail);
            default_literal = Some(literal.to_string());
            body = head;
        }
    }

    let mut value_type = ValueType::String;
    let mut chars = body.chars();
    if let (Some(prefix), Some(':')) = (chars.next(), chars.next()) {
        if let Some(parsed) = ValueType::from_prefix(prefix) {
            value_type = parsed;
            body = &body[2..];
        }
    }

    let mut sanitize_mode = SanitizeMode::default();
    if value_type == ValueType::String {
        if let Some((rest, mode)) = SanitizeMode::split_suffix(body) {
            sanitize_mode = mode;
            body = rest;
        }
    }

    let (mut source, dest) = match body.split_once('#') {
        Some((source, dest)) if !dest.is_empty() => (source, Some(dest)),
        Some((source, _)) => (source, None),
        None => (body, None),
    };

    // `name:0#full` carries the mode on the source side of the rename
    if value_type == ValueType::String && dest.is_some() {
        if let Some((rest, mode)) = SanitizeMode::split_suffix(source) {
            sanitize_mode = mode;
            source = rest;
        }
    }

    if source.is_empty() {
        return Err(RuleError::EmptyKey {
            rule: original.to_string(),
        });
    }

    Ok(RuleDescriptor {
        value_type,
        source_key: source.to_string(),
        dest_key: dest.unwrap_or(source).to_string(),
        sanitize_mode,
        default_literal,
    })
}

/// Parses a rule set, dropping rules that have no usable key.
///
/// The result keeps the order of the input. An empty result tells the
/// extractor to pass its input through unchanged.
///
/// # Examples
///
/// ```
/// use request_params::parse_rules;
///
/// let rules = parse_rules("i:page, s:, q");
/// assert_eq!(rules.len(), 2);
/// assert_eq!(rules[0].source_key, "page");
/// assert_eq!(rules[1].source_key, "q");
/// ```
pub fn parse_rules(spec: impl Into<RuleSpec>) -> Vec<RuleDescriptor> {
    let spec = spec.into();

    spec.rule_strings()
        .into_iter()
        .filter_map(|rule| match parse_rule(rule) {
            Ok(descriptor) => Some(descriptor),
            Err(err) => {
                tracing::debug!(rule = %rule, reason = err.reason(), "dropping rule");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_key_is_stripped_string() {
        let rule = parse_rule("name").unwrap();

        assert_eq!(rule.value_type, ValueType::String);
        assert_eq!(rule.source_key, "name");
        assert_eq!(rule.dest_key, "name");
        assert_eq!(rule.sanitize_mode, SanitizeMode::StripTags);
        assert_eq!(rule.default_literal, None);
    }

    #[test]
    fn type_prefixes() {
        assert_eq!(parse_rule("i:n").unwrap().value_type, ValueType::Int);
        assert_eq!(parse_rule("f:n").unwrap().value_type, ValueType::Decimal);
        assert_eq!(parse_rule("d:n").unwrap().value_type, ValueType::Decimal);
        assert_eq!(parse_rule("s:n").unwrap().value_type, ValueType::String);
        assert_eq!(parse_rule("a:n").unwrap().value_type, ValueType::Array);
    }

    #[test]
    fn unknown_prefix_stays_in_key() {
        let rule = parse_rule("x:n").unwrap();

        assert_eq!(rule.value_type, ValueType::String);
        assert_eq!(rule.source_key, "x:n");
    }

    #[test]
    fn sanitize_suffixes() {
        assert_eq!(parse_rule("n:0").unwrap().sanitize_mode, SanitizeMode::None);
        assert_eq!(
            parse_rule("n:1").unwrap().sanitize_mode,
            SanitizeMode::HtmlPurify
        );
        assert_eq!(
            parse_rule("s:n:2").unwrap().sanitize_mode,
            SanitizeMode::StripTags
        );
        assert_eq!(parse_rule("s:n:0").unwrap().source_key, "n");
    }

    #[test]
    fn unrecognized_suffix_is_part_of_key() {
        let rule = parse_rule("n:3").unwrap();

        assert_eq!(rule.source_key, "n:3");
        assert_eq!(rule.sanitize_mode, SanitizeMode::StripTags);
    }

    #[test]
    fn suffix_only_applies_to_strings() {
        let rule = parse_rule("i:n:0").unwrap();

        assert_eq!(rule.value_type, ValueType::Int);
        assert_eq!(rule.source_key, "n:0");
    }

    #[test]
    fn rename_splits_on_first_hash() {
        let rule = parse_rule("a#b#c").unwrap();

        assert_eq!(rule.source_key, "a");
        assert_eq!(rule.dest_key, "b#c");
    }

    #[test]
    fn empty_rename_target_keeps_source() {
        let rule = parse_rule("name#").unwrap();

        assert_eq!(rule.source_key, "name");
        assert_eq!(rule.dest_key, "name");
    }

    #[test]
    fn suffix_on_either_side_of_rename() {
        let before = parse_rule("name:0#fullName").unwrap();
        let after = parse_rule("name#fullName:0").unwrap();

        for rule in [before, after] {
            assert_eq!(rule.source_key, "name");
            assert_eq!(rule.dest_key, "fullName");
            assert_eq!(rule.sanitize_mode, SanitizeMode::None);
        }
    }

    #[test]
    fn default_literal_is_split_first() {
        let rule = parse_rule("i:age@default:30").unwrap();

        assert_eq!(rule.source_key, "age");
        assert_eq!(rule.default_literal.as_deref(), Some("30"));
    }

    #[test]
    fn default_literal_can_be_empty() {
        let rule = parse_rule("s:q@default:").unwrap();

        assert_eq!(rule.default_literal.as_deref(), Some(""));
    }

    #[test]
    fn default_uses_last_at_sign() {
        let rule = parse_rule("s:mail@default:a@b.c").unwrap();

        // Everything before the last '@' is the rule body
        assert_eq!(rule.source_key, "mail@default:a");
        assert_eq!(rule.default_literal.as_deref(), Some("b.c"));
    }

    #[test]
    fn default_may_contain_colons_and_hashes() {
        let rule = parse_rule("s:when#at@default:12:00#x").unwrap();

        assert_eq!(rule.source_key, "when");
        assert_eq!(rule.dest_key, "at");
        assert_eq!(rule.default_literal.as_deref(), Some("12:00#x"));
    }

    #[test]
    fn at_sign_without_marker_is_key_text() {
        let rule = parse_rule("user@host").unwrap();

        assert_eq!(rule.source_key, "user@host");
        assert!(rule.default_literal.is_none());
    }

    #[test]
    fn empty_key_is_rejected() {
        assert_eq!(parse_rule(""), Err(RuleError::EmptyRule));
        assert_eq!(parse_rule(" \t "), Err(RuleError::EmptyRule));
        assert!(matches!(parse_rule("i:"), Err(RuleError::EmptyKey { .. })));
        assert!(matches!(parse_rule(":0"), Err(RuleError::EmptyKey { .. })));
        assert!(matches!(
            parse_rule("@default:5"),
            Err(RuleError::EmptyKey { .. })
        ));
        assert!(matches!(parse_rule("#dest"), Err(RuleError::EmptyKey { .. })));
    }

    #[test]
    fn comma_string_splits_with_blanks() {
        let spec = RuleSpec::from("a ,\tb,  c");

        assert_eq!(spec.rule_strings(), vec!["a", "b", "c"]);
    }

    #[test]
    fn list_entries_are_trimmed() {
        let spec = RuleSpec::from(vec![" a", "b\t"]);

        assert_eq!(spec.rule_strings(), vec!["a", "b"]);
    }

    #[test]
    fn empty_string_spec_has_no_rules() {
        assert!(parse_rules("").is_empty());
        assert!(parse_rules(" , ,").is_empty());
    }

    #[test]
    fn parse_rules_keeps_order_and_drops_invalid() {
        let rules = parse_rules(vec!["b", "i:", "a", "s:@default:x"]);
        let keys: Vec<&str> = rules.iter().map(|r| r.source_key.as_str()).collect();

        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn from_value_accepts_strings_only() {
        let text = Value::from("a,b");
        assert_eq!(RuleSpec::from_value(&text), RuleSpec::Single("a,b".to_string()));

        let list = Value::from(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(RuleSpec::from_value(&list).rule_strings(), vec!["a", "b"]);

        let mixed = Value::from(vec![Value::from("a"), Value::Int(1)]);
        assert!(RuleSpec::from_value(&mixed).rule_strings().is_empty());

        assert!(RuleSpec::from_value(&Value::Int(3)).rule_strings().is_empty());
        assert!(RuleSpec::from_value(&Value::Null).rule_strings().is_empty());
    }

    #[test]
    fn sanitize_mode_codes_round_trip() {
        for code in 0..3 {
            let mode = SanitizeMode::from_code(code).unwrap();
            assert_eq!(mode.code(), code);
        }
    }

    mod proptests {
        use super::*;
        use crate::test_utils::arb_key;
        use proptest::prelude::*;

        proptest! {
            /// Property: parsing never panics on arbitrary text
            #[test]
            fn proptest_parse_rule_is_total(input in ".{0,40}") {
                let _ = parse_rule(&input);
                let _ = parse_rules(input.as_str());
            }

            /// Property: a rule assembled from parts parses back into those parts
            #[test]
            fn proptest_composed_rule_parses_to_parts(
                source in arb_key(),
                dest in prop::option::of(arb_key()),
                prefix in prop_oneof![Just(""), Just("s:"), Just("i:"), Just("d:"), Just("f:"), Just("a:")],
                default in prop::option::of("[a-z0-9.]{0,8}"),
            ) {
                let mut rule = format!("{}{}", prefix, source);
                if let Some(dest) = &dest {
                    rule.push('#');
                    rule.push_str(dest);
                }
                if let Some(default) = &default {
                    rule.push_str("@default:");
                    rule.push_str(default);
                }

                let parsed = parse_rule(&rule).expect("composed rule is valid");
                prop_assert_eq!(&parsed.source_key, &source);
                prop_assert_eq!(&parsed.dest_key, dest.as_ref().unwrap_or(&source));
                prop_assert_eq!(parsed.default_literal, default);
            }

            /// Property: a comma string and the equivalent list parse identically
            #[test]
            fn proptest_single_and_list_agree(keys in prop::collection::vec(arb_key(), 0..6)) {
                let joined = keys.join(", ");
                let refs: Vec<&str> = keys.iter().map(String::as_str).collect();

                prop_assert_eq!(parse_rules(joined.as_str()), parse_rules(refs));
            }
        }
    }
}
