//! Request adapter for mapping HTTP requests to extractor input.

use serde_json::Value as JsonValue;

use crate::rule::RuleSpec;
use crate::value::{params_from_json, Params, Value};

use super::{request_params, ExtractParams};

/// Adapter for converting framework-specific HTTP requests into extractor input.
///
/// `RequestAdapter` is the primary integration point between web frameworks
/// and the extractor. It collects the three parameter sources of a request and
/// merges them into a single [`Params`] map.
///
/// When a key appears in more than one source, the body wins over the query
/// string and the query string wins over path parameters.
///
/// # Design Notes
///
/// This type holds simple, owned data to avoid coupling to any specific
/// framework's request types. Framework-specific code should implement
/// `From<FrameworkRequest>` for `RequestAdapter`, or implement
/// [`ExtractParams`] directly.
///
/// # Examples
///
/// ```
/// use request_params::web::{ExtractParams, RequestAdapter};
/// use request_params::Value;
///
/// let mut adapter = RequestAdapter::new("req-12345");
/// adapter.add_path_param("id", "7");
/// adapter.add_query_param("id", "8");
///
/// let params = adapter.extract_params();
/// assert_eq!(params.get("id"), Some(&Value::from("8")));
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    /// Unique request identifier (required)
    request_id: String,
    /// Path parameters from routing
    path_params: Params,
    /// Query parameters from URL
    query_params: Params,
    /// Form or JSON body fields
    body_params: Params,
}

impl RequestAdapter {
    /// Creates a new request adapter with the given request ID.
    ///
    /// All parameter sources start empty.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            path_params: Params::new(),
            query_params: Params::new(),
            body_params: Params::new(),
        }
    }

    /// Adds a path parameter.
    pub fn add_path_param(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.path_params.insert(key.into(), value.into());
    }

    /// Adds a query parameter.
    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.query_params.insert(key.into(), value.into());
    }

    /// Adds a body field.
    pub fn add_body_param(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.body_params.insert(key.into(), value.into());
    }

    /// Adds every field of a decoded JSON body.
    ///
    /// Only JSON objects carry named fields. Any other body shape is ignored
    /// and `false` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_params::web::RequestAdapter;
    ///
    /// let mut adapter = RequestAdapter::new("req-1");
    /// assert!(adapter.add_json_body(serde_json::json!({"tags": [1, 2]})));
    /// assert!(!adapter.add_json_body(serde_json::json!([1, 2])));
    /// ```
    pub fn add_json_body(&mut self, body: JsonValue) -> bool {
        match params_from_json(body) {
            Some(fields) => {
                self.body_params.extend(fields);
                true
            }
            None => {
                tracing::warn!(request_id = %self.request_id, "ignoring non-object JSON body");
                false
            }
        }
    }

    /// Returns a reference to the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the path parameters.
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns the query parameters.
    pub fn query_params(&self) -> &Params {
        &self.query_params
    }

    /// Returns the body fields.
    pub fn body_params(&self) -> &Params {
        &self.body_params
    }

    /// Merges all sources into one map, later sources overriding earlier ones.
    ///
    /// Keys keep the position of their first appearance, path parameters first.
    pub fn params(&self) -> Params {
        let mut merged = self.path_params.clone();
        for source in [&self.query_params, &self.body_params] {
            for (key, value) in source {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    /// Extracts typed parameters from this request with the default sanitizer.
    pub fn request_params(&self, spec: impl Into<RuleSpec>) -> Params {
        request_params(self, spec)
    }
}

impl ExtractParams for RequestAdapter {
    fn request_id(&self) -> &str {
        &self.request_id
    }

    fn extract_params(&self) -> Params {
        self.params()
    }
}
