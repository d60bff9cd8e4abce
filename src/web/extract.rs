//! Extraction boundary trait for web integration.
//!
//! This module defines the core abstraction for pulling raw parameters out of
//! framework-specific request types, and the functions that run a rule set
//! over them.

use crate::extract::Extractor;
use crate::rule::{parse_rules, RuleSpec};
use crate::sanitizer::Sanitizer;
use crate::value::Params;

/// Extracts raw parameters from a framework-specific request.
///
/// Implementations gather every untrusted input of the request (path, query,
/// form or JSON body fields) into one map. They should NOT coerce or sanitize;
/// that is the job of the rule set passed to [`request_params`].
///
/// # Examples
///
/// ```
/// use request_params::web::{request_params, ExtractParams};
/// use request_params::{Params, Value};
///
/// // Example framework-specific implementation
/// struct MyFrameworkRequest {
///     id: String,
///     query: Vec<(String, String)>,
/// }
///
/// impl ExtractParams for MyFrameworkRequest {
///     fn request_id(&self) -> &str {
///         &self.id
///     }
///
///     fn extract_params(&self) -> Params {
///         self.query
///             .iter()
///             .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
///             .collect()
///     }
/// }
///
/// let req = MyFrameworkRequest {
///     id: "req-1".to_string(),
///     query: vec![("page".to_string(), "2".to_string())],
/// };
/// let params = request_params(&req, "i:page");
/// assert_eq!(params.get("page"), Some(&Value::Int(2)));
/// ```
pub trait ExtractParams {
    /// Identifier attached to every log line emitted during extraction.
    fn request_id(&self) -> &str;

    /// Returns all untrusted parameters of the request.
    fn extract_params(&self) -> Params;
}

/// Runs a rule set over a request using the default sanitizer.
///
/// See [`request_params_with`].
pub fn request_params<R>(request: &R, spec: impl Into<RuleSpec>) -> Params
where
    R: ExtractParams + ?Sized,
{
    request_params_with(request, &Extractor::new(), spec)
}

/// Runs a rule set over a request using the given extractor.
///
/// Extraction runs inside an `info` span carrying the request ID. With an
/// unusable rule set the raw parameters are returned unchanged.
pub fn request_params_with<R, S>(
    request: &R,
    extractor: &Extractor<S>,
    spec: impl Into<RuleSpec>,
) -> Params
where
    R: ExtractParams + ?Sized,
    S: Sanitizer,
{
    let span = tracing::info_span!("request_params", request_id = %request.request_id());
    let _guard = span.enter();

    let rules = parse_rules(spec);
    let input = request.extract_params();
    tracing::debug!(rules = rules.len(), params = input.len(), "extracting request params");

    extractor.extract(&input, &rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitizer::PassthroughSanitizer;
    use crate::value::Value;

    // Test implementation for documentation
    struct TestRequest {
        id: String,
        params: Params,
    }

    impl ExtractParams for TestRequest {
        fn request_id(&self) -> &str {
            &self.id
        }

        fn extract_params(&self) -> Params {
            self.params.clone()
        }
    }

    fn request(entries: &[(&str, &str)]) -> TestRequest {
        TestRequest {
            id: "test-1".to_string(),
            params: entries
                .iter()
                .map(|(k, v)| (k.to_string(), Value::from(*v)))
                .collect(),
        }
    }

    #[test]
    fn request_params_applies_rules() {
        let req = request(&[("q", "<b>x</b>"), ("n", "5")]);
        let params = request_params(&req, "q, i:n");

        assert_eq!(params.get("q"), Some(&Value::from("x")));
        assert_eq!(params.get("n"), Some(&Value::Int(5)));
    }

    #[test]
    fn request_params_with_injected_sanitizer() {
        let req = request(&[("q", "<b>x</b>")]);
        let extractor = Extractor::with_sanitizer(PassthroughSanitizer);

        let params = request_params_with(&req, &extractor, vec!["q"]);
        assert_eq!(params.get("q"), Some(&Value::from("<b>x</b>")));
    }

    #[test]
    fn unusable_rules_return_raw_params() {
        let req = request(&[("q", "<b>x</b>")]);

        assert_eq!(request_params(&req, ""), req.params);
    }

    #[test]
    fn works_through_trait_objects() {
        let req = request(&[("n", "1")]);
        let dynamic: &dyn ExtractParams = &req;

        assert_eq!(
            request_params(dynamic, "i:n").get("n"),
            Some(&Value::Int(1))
        );
    }
}
