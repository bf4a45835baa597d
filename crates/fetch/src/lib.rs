//! Availability fetcher.
//!
//! This crate provides:
//! - `AvailabilityFetcher` trait so the scheduler can be driven by a fake in tests
//! - `HttpFetcher`, a reqwest client with a fixed 15 second timeout
//! - `FetchError`, which keeps timeouts, transport failures, upstream error
//!   payloads, and unreadable bodies apart

pub mod http;
pub mod traits;

pub use http::{HttpFetcher, FETCH_TIMEOUT};
pub use traits::{AvailabilityFetcher, AvailabilityQuery, FetchError};
