//! Web framework integration surface.
//!
//! This module is the boundary between HTTP frameworks and the extractor. It
//! handles:
//! - Collecting path, query and body parameters into one [`Params`](crate::Params) map
//! - Request-ID propagation into extraction logs
//! - The `request_params` entry point used by handlers
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: Nothing here depends on a specific HTTP
//!    framework. Integrations implement [`ExtractParams`] or fill a
//!    [`RequestAdapter`].
//!
//! 2. **Untrusted by Default**: Every collected value is treated as raw input;
//!    handlers only see what a rule set lets through, typed and sanitized.
//!
//! 3. **Explicit Context**: No global state. The request ID and the parameters
//!    flow through values.
//!
//! # Example Flow
//!
//! ```
//! use request_params::web::RequestAdapter;
//! use request_params::{Value, INT_SENTINEL};
//!
//! let mut adapter = RequestAdapter::new("req-42");
//! adapter.add_query_param("q", "<b>rust</b>");
//! adapter.add_query_param("page", "3");
//!
//! let params = adapter.request_params("q, i:page@default:1, i:size");
//!
//! assert_eq!(params.get("q"), Some(&Value::from("rust")));
//! assert_eq!(params.get("page"), Some(&Value::Int(3)));
//! assert_eq!(params.get("size"), Some(&Value::Int(INT_SENTINEL)));
//! ```

mod adapter;
pub mod example_handler;
mod extract;

pub use adapter::RequestAdapter;
pub use extract::{request_params, request_params_with, ExtractParams};
