//! Storefront HTTP boundary
//!
//! Typed wire models and the blocking client for the shop's endpoints.

pub mod client;
pub mod models;

pub use client::StoreClient;
pub use models::{OrderResponse, ProductSummary};
