//! Client-side session service for the moving marketplace.
//! - `storage`: durable key-value storage and the session record adapter.
//! - `api`: backend client seam, `reqwest` implementation and a mock.
//! - `session`: the session store with login routing and write-through persistence.
//! - `access`: route gating by role and subscription.

pub mod errors;
pub mod storage;
pub mod api;
pub mod session;
pub mod access;
