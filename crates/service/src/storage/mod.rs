//! Storage abstractions for the client session.
//!
//! `KeyValueStore` is the durable string store (the browser-localStorage
//! analogue); `SessionStorage` is the only code that knows its key names.

pub mod kv_store;
pub mod memory_store;
pub mod json_file_store;
pub mod session_storage;

pub use kv_store::KeyValueStore;
pub use memory_store::MemoryStore;
pub use json_file_store::JsonFileStore;
pub use session_storage::SessionStorage;
