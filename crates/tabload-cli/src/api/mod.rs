//! API client module
//!
//! HTTP client for the key/attribute collection store.

pub mod client;
pub mod endpoints;
pub mod retry;
pub mod types;

pub use client::ApiClient;
pub use retry::RetryPolicy;
pub use types::*;
