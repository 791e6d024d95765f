//! Cross-cutting helpers shared by the client crates: logging setup and
//! runtime environment checks.

pub mod env;
pub mod utils;
