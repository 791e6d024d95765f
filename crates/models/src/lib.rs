//! Client-side data model for the moving-services marketplace: the persisted
//! session record, closed role/plan types, backend envelope and payloads.

pub mod errors;
pub mod role;
pub mod plan;
pub mod session;
pub mod company;
pub mod envelope;
pub mod auth;
pub mod redirect;

pub use role::Role;
pub use plan::{PlanTier, SubscriptionPlan};
pub use session::{Session, SessionPatch};
pub use company::CompanyRecord;
pub use envelope::{Envelope, Reply};
pub use redirect::Redirect;
