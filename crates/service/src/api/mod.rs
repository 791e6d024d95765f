//! Marketplace backend client.
//!
//! `MarketplaceApi` is the seam the session store talks to; `HttpMarketplaceApi`
//! is the `reqwest` implementation and `mock` a scripted one for tests.

pub mod errors;
pub mod client;
pub mod http;
pub mod mock;

pub use client::MarketplaceApi;
pub use errors::ApiError;
pub use http::HttpMarketplaceApi;
