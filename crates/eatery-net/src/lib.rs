//! Network-facing parts of the dining engine.
//!
//! - [`Cached`]: a staleness-bounded, single-flight cache for one value
//! - [`with_retry`]: bounded retry with invalidation between attempts
//! - [`AccountClient`]: account queries over a cached session ID
//! - [`HttpTransport`]: the HTTP binding for the account service

mod account;
mod cache;
mod http;
mod retry;

pub use account::{
    Account, AccountClient, AccountError, AccountEvent, AccountTransport,
    DEFAULT_MAX_SESSION_STALENESS_SECS, Transaction,
};
pub use cache::Cached;
pub use http::{DEFAULT_API_URL, HttpTransport};
pub use retry::{RetryPolicy, with_retry};
