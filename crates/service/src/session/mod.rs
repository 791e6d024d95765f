//! Client session: who is logged in, persisted across restarts, and the
//! post-login routing that depends on role and subscription.

pub mod errors;
pub mod events;
pub mod store;

pub use errors::SessionError;
pub use events::{EventBus, SessionEvent};
pub use store::{CompanyStatus, LoginSuccess, SessionStore};
