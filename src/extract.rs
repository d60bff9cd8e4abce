//! Rule-driven extraction of typed parameters.
//!
//! The [`Extractor`] applies a parsed rule set to an untyped input mapping and
//! builds a new mapping in which every value has the rule's type. Extraction is
//! total: a value that cannot be coerced falls back to the rule's default or to
//! a fixed per-type fallback, and nothing is reported to the caller.
//!
//! | Type      | Output value                  | Fallback                     |
//! |-----------|-------------------------------|------------------------------|
//! | `String`  | [`Value::String`]             | `""`                         |
//! | `Int`     | [`Value::Int`]                | [`INT_SENTINEL`]             |
//! | `Decimal` | [`Value::String`], 2 decimals | [`DECIMAL_FALLBACK`]         |
//! | `Array`   | `Sequence` or `Mapping`       | empty collection             |

use crate::coerce;
use crate::rule::{parse_rules, RuleDescriptor, RuleSpec, ValueType};
use crate::sanitizer::{DefaultSanitizer, Sanitizer};
use crate::value::{Params, Value};

/// Integer result meaning "not provided or not coercible".
///
/// Callers must treat this value as absent, never as a real number.
pub const INT_SENTINEL: i64 = i64::MIN;

/// Decimal result when neither the value nor the default is a number.
pub const DECIMAL_FALLBACK: &str = "0.00";

/// Applies rule descriptors to input parameters.
///
/// The extractor owns the [`Sanitizer`] used for string rules and nothing
/// else, so one instance can serve any number of calls and threads.
///
/// # Examples
///
/// ```
/// use request_params::{parse_rules, Extractor, Params, Value};
///
/// let mut input = Params::new();
/// input.insert("name".to_string(), Value::from("<b>Al</b>"));
/// input.insert("age".to_string(), Value::from("41"));
///
/// let rules = parse_rules("name#fullName, i:age, d:price");
/// let output = Extractor::new().extract(&input, &rules);
///
/// assert_eq!(output.get("fullName"), Some(&Value::from("Al")));
/// assert_eq!(output.get("age"), Some(&Value::Int(41)));
/// assert_eq!(output.get("price"), Some(&Value::from("0.00")));
/// ```
#[derive(Debug, Clone)]
pub struct Extractor<S = DefaultSanitizer> {
    sanitizer: S,
}

impl Extractor<DefaultSanitizer> {
    /// Creates an extractor backed by [`DefaultSanitizer`].
    pub fn new() -> Self {
        Self::with_sanitizer(DefaultSanitizer::new())
    }
}

impl Default for Extractor<DefaultSanitizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sanitizer> Extractor<S> {
    /// Creates an extractor backed by the given sanitizer.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_params::{Extractor, PassthroughSanitizer};
    ///
    /// let extractor = Extractor::with_sanitizer(PassthroughSanitizer);
    /// ```
    pub fn with_sanitizer(sanitizer: S) -> Self {
        Self { sanitizer }
    }

    /// Returns the sanitizer used for string rules.
    pub fn sanitizer(&self) -> &S {
        &self.sanitizer
    }

    /// Builds the output mapping for `rules` from `input`.
    ///
    /// When `rules` is empty the input is returned unchanged. Otherwise the
    /// output holds exactly one entry per distinct destination key, inserted in
    /// rule order; when two rules share a destination the later one wins.
    /// `input` is never modified.
    pub fn extract(&self, input: &Params, rules: &[RuleDescriptor]) -> Params {
        if rules.is_empty() {
            return input.clone();
        }

        let mut output = Params::with_capacity(rules.len());
        for rule in rules {
            let raw = input.get(&rule.source_key).filter(|v| !v.is_null());
            let value = self.coerce(rule, raw);
            output.insert(rule.dest_key.clone(), value);
        }
        output
    }

    /// Parses `spec` and extracts in one step.
    ///
    /// An unusable rule set (empty, or every rule invalid) returns the input
    /// unchanged.
    pub fn extract_with(&self, input: &Params, spec: impl Into<RuleSpec>) -> Params {
        let rules = parse_rules(spec);
        self.extract(input, &rules)
    }

    fn coerce(&self, rule: &RuleDescriptor, raw: Option<&Value>) -> Value {
        match rule.value_type {
            ValueType::String => Value::String(self.coerce_string(rule, raw)),
            ValueType::Int => Value::Int(coerce_int(rule, raw)),
            ValueType::Decimal => Value::String(coerce_decimal(rule, raw)),
            ValueType::Array => coerce_array(rule, raw),
        }
    }

    fn coerce_string(&self, rule: &RuleDescriptor, raw: Option<&Value>) -> String {
        match raw {
            Some(Value::String(text)) => self.clean(rule, text),
            Some(value) => coerce::scalar_text(value).unwrap_or_else(|| {
                tracing::trace!(key = %rule.source_key, kind = value.kind(), "non-scalar string parameter");
                String::new()
            }),
            None => match &rule.default_literal {
                Some(default) => self.clean(rule, default),
                None => String::new(),
            },
        }
    }

    fn clean(&self, rule: &RuleDescriptor, text: &str) -> String {
        if text.is_empty() || coerce::is_numeric(text) {
            return text.to_string();
        }
        self.sanitizer.sanitize(rule.sanitize_mode, text)
    }
}

fn coerce_int(rule: &RuleDescriptor, raw: Option<&Value>) -> i64 {
    if let Some(i) = raw.and_then(coerce::to_int) {
        return i;
    }
    if let Some(i) = rule.default_literal.as_deref().and_then(coerce::text_to_int) {
        return i;
    }
    tracing::trace!(key = %rule.source_key, value_type = %rule.value_type, "falling back to sentinel");
    INT_SENTINEL
}

fn coerce_decimal(rule: &RuleDescriptor, raw: Option<&Value>) -> String {
    raw.and_then(coerce::to_decimal_string)
        .or_else(|| {
            rule.default_literal
                .as_deref()
                .and_then(coerce::text_to_decimal_string)
        })
        .unwrap_or_else(|| {
            tracing::trace!(key = %rule.source_key, value_type = %rule.value_type, "falling back to zero");
            DECIMAL_FALLBACK.to_string()
        })
}

fn coerce_array(rule: &RuleDescriptor, raw: Option<&Value>) -> Value {
    let decoded = match raw {
        Some(Value::String(text)) => coerce::decode_collection(text),
        Some(collection @ (Value::Sequence(_) | Value::Mapping(_))) => Some(collection.clone()),
        Some(_) => None,
        None => rule
            .default_literal
            .as_deref()
            .and_then(coerce::decode_collection),
    };

    decoded.unwrap_or_else(|| {
        tracing::trace!(key = %rule.source_key, value_type = %rule.value_type, "falling back to empty sequence");
        Value::Sequence(Vec::new())
    })
}

/// Extracts parameters with the default sanitizer.
///
/// This is the one-call entry point: `spec` is a comma separated rule string
/// or a list of rule strings.
///
/// # Examples
///
/// ```
/// use request_params::{extract_params, Params, Value, INT_SENTINEL};
///
/// let mut input = Params::new();
/// input.insert("age".to_string(), Value::from("abc"));
///
/// let output = extract_params(&input, "i:age, i:page@default:1");
/// assert_eq!(output.get("age"), Some(&Value::Int(INT_SENTINEL)));
/// assert_eq!(output.get("page"), Some(&Value::Int(1)));
/// ```
pub fn extract_params(input: &Params, spec: impl Into<RuleSpec>) -> Params {
    Extractor::new().extract_with(input, spec)
}
