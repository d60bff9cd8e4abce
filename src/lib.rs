//! Typed, rule-driven extraction of untrusted request parameters.
//!
//! This crate turns an untyped parameter map (query string, form or JSON body)
//! plus a compact rule set into a normalized map with:
//! - **Enforced types**: strings, integers, two-digit decimals, JSON collections
//! - **Defaults**: per-rule `@default:` literals with fixed per-type fallbacks
//! - **Renames**: `source#dest` writes a value under a different key
//! - **Sanitization**: markup stripped or purified through an injected [`Sanitizer`]
//!
//! Extraction is total. Malformed rules are dropped, uncoercible values fall
//! back to documented sentinels, and nothing panics or returns an error.
//!
//! # Core Types
//!
//! - [`Value`] / [`Params`]: dynamically typed values and the ordered map holding them
//! - [`RuleDescriptor`]: one parsed rule, produced by [`parse_rules`]
//! - [`Extractor`]: applies descriptors to input using a [`Sanitizer`]
//! - [`web::RequestAdapter`]: collects request parameters for extraction
//!
//! # Rule Grammar
//!
//! ```text
//! [type:]source[:mode][#dest][@default:literal]
//! ```
//!
//! | Prefix      | Type    | Fallback          |
//! |-------------|---------|-------------------|
//! | `s:` / none | string  | `""`              |
//! | `i:`        | integer | [`INT_SENTINEL`]  |
//! | `d:` / `f:` | decimal | `"0.00"`          |
//! | `a:`        | array   | empty collection  |
//!
//! String rules accept a mode suffix: `:0` keeps text verbatim, `:1` purifies
//! HTML, `:2` (the default) strips tags.
//!
//! # Examples
//!
//! ```
//! use request_params::{extract_params, Params, Value, INT_SENTINEL};
//!
//! let mut input = Params::new();
//! input.insert("name".to_string(), Value::from("<b>Al</b>"));
//! input.insert("age".to_string(), Value::from("41"));
//! input.insert("tags".to_string(), Value::from("[1,2,3]"));
//!
//! let output = extract_params(&input, "name#fullName, i:age, i:score, d:price, a:tags");
//!
//! assert_eq!(output.get("fullName"), Some(&Value::from("Al")));
//! assert_eq!(output.get("age"), Some(&Value::Int(41)));
//! assert_eq!(output.get("score"), Some(&Value::Int(INT_SENTINEL)));
//! assert_eq!(output.get("price"), Some(&Value::from("0.00")));
//! assert_eq!(output.get("tags").and_then(Value::as_sequence).map(|t| t.len()), Some(3));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod coerce;
mod error;
mod extract;
mod rule;
mod sanitizer;
mod value;
pub mod web;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::RuleError;
pub use extract::{extract_params, Extractor, DECIMAL_FALLBACK, INT_SENTINEL};
pub use rule::{parse_rule, parse_rules, RuleDescriptor, RuleSpec, SanitizeMode, ValueType};
pub use sanitizer::{DefaultSanitizer, PassthroughSanitizer, Sanitizer};
pub use value::{params_from_json, Params, Value};
