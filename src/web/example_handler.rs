//! Example handlers demonstrating rule-driven parameter extraction.
//!
//! **These examples are for documentation and testing only.**
//! They show how a handler declares its parameters as a rule set, reads the
//! typed result, and honors the "not provided" sentinels, without requiring
//! actual HTTP infrastructure.

use std::fmt;

use crate::extract::INT_SENTINEL;
use crate::value::{Params, Value};

use super::RequestAdapter;

/// Error returned when a required parameter is absent or not coercible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingParameter {
    /// Name of the parameter as seen by the handler
    pub name: &'static str,
}

impl fmt::Display for MissingParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing or invalid parameter '{}'", self.name)
    }
}

impl std::error::Error for MissingParameter {}

fn string_param(params: &Params, key: &str) -> String {
    params
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn int_param(params: &Params, key: &'static str) -> Result<i64, MissingParameter> {
    match params.get(key).and_then(Value::as_int) {
        Some(INT_SENTINEL) | None => Err(MissingParameter { name: key }),
        Some(n) => Ok(n),
    }
}

/// Result of the search endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Request ID for tracing
    pub request_id: String,
    /// Search text with markup stripped
    pub query: String,
    /// 1-based page number
    pub page: i64,
    /// Page size
    pub per_page: i64,
    /// Tag filter decoded from a JSON array
    pub tags: Vec<Value>,
}

/// Handles a public search endpoint.
///
/// Parameters: `q` (text, tags stripped), `page` (default 1), `per_page`
/// (default 20, exposed as `perPage`), `tags` (JSON array).
///
/// # Examples
///
/// ```
/// use request_params::web::{RequestAdapter, example_handler::handle_search};
///
/// let mut adapter = RequestAdapter::new("req-search-001");
/// adapter.add_query_param("q", "<em>rust</em> params");
/// adapter.add_query_param("tags", "[\"web\"]");
///
/// let search = handle_search(&adapter);
/// assert_eq!(search.query, "rust params");
/// assert_eq!(search.page, 1);
/// assert_eq!(search.per_page, 20);
/// assert_eq!(search.tags.len(), 1);
/// ```
pub fn handle_search(adapter: &RequestAdapter) -> SearchQuery {
    let params = adapter.request_params(
        "s:q, i:page@default:1, i:per_page#perPage@default:20, a:tags",
    );

    SearchQuery {
        request_id: adapter.request_id().to_string(),
        query: string_param(&params, "q"),
        page: params.get("page").and_then(Value::as_int).unwrap_or(1),
        per_page: params.get("perPage").and_then(Value::as_int).unwrap_or(20),
        tags: params
            .get("tags")
            .and_then(Value::as_sequence)
            .map(<[Value]>::to_vec)
            .unwrap_or_default(),
    }
}

/// Result of the profile update endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    /// Request ID for tracing
    pub request_id: String,
    /// Target user
    pub user_id: i64,
    /// Display name, markup stripped
    pub display_name: String,
    /// Biography, purified HTML
    pub bio_html: String,
    /// Raw signature, stored verbatim
    pub signature: String,
    /// Balance as two-digit decimal text
    pub balance: String,
}

/// Handles an authenticated profile update.
///
/// `user_id` is required: the integer sentinel is turned into an error rather
/// than being stored as a real id.
///
/// # Examples
///
/// ```
/// use request_params::web::{RequestAdapter, example_handler::handle_profile_update};
///
/// let mut adapter = RequestAdapter::new("req-profile-001");
/// adapter.add_path_param("user_id", "12");
/// adapter.add_body_param("name", "<b>Al</b>");
///
/// let update = handle_profile_update(&adapter).expect("user id present");
/// assert_eq!(update.user_id, 12);
/// assert_eq!(update.display_name, "Al");
/// assert_eq!(update.balance, "0.00");
///
/// let empty = RequestAdapter::new("req-profile-002");
/// assert!(handle_profile_update(&empty).is_err());
/// ```
pub fn handle_profile_update(adapter: &RequestAdapter) -> Result<ProfileUpdate, MissingParameter> {
    let params = adapter.request_params(vec![
        "i:user_id#userId",
        "name#displayName",
        "bio:1",
        "signature:0",
        "d:balance",
    ]);

    let user_id = int_param(&params, "userId")?;
    tracing::info!(request_id = %adapter.request_id(), user_id, "profile update accepted");

    Ok(ProfileUpdate {
        request_id: adapter.request_id().to_string(),
        user_id,
        display_name: string_param(&params, "displayName"),
        bio_html: string_param(&params, "bio"),
        signature: string_param(&params, "signature"),
        balance: string_param(&params, "balance"),
    })
}
