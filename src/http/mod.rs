//! HTTP client module
//!
//! Transport for the upstream search service.
//!
//! # Features
//!
//! - **Bearer Auth**: API key sent as `Authorization: Bearer <key>`
//! - **Error Classification**: status, rate limit and timeout errors
//! - **Optional Retries**: constant, linear and exponential backoff, off by default

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
