//! HTTP client module
//!
//! Single-shot GET requests with per-request timeouts and status
//! pass-through. Authentication comes from the auth module.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, HttpResponse, RequestConfig};
