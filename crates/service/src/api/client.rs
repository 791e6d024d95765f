use async_trait::async_trait;
use models::auth::{LoginData, LoginRequest, SignupRequest};
use models::CompanyRecord;

use super::errors::ApiError;

/// Backend operations the session store depends on.
///
/// The bearer slot models the HTTP client's default `Authorization` header:
/// it is process-wide, and every request made through the client carries it.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Create an account. Returns the server's message on success.
    async fn signup(&self, request: &SignupRequest) -> Result<Option<String>, ApiError>;

    async fn login(&self, request: &LoginRequest) -> Result<LoginData, ApiError>;

    /// Companies owned by `email`; empty when none is registered.
    async fn get_my_company(&self, email: &str) -> Result<Vec<CompanyRecord>, ApiError>;

    /// Set (`Some`) or delete (`None`) the default bearer credential.
    fn set_bearer_token(&self, token: Option<&str>);

    /// Current default `Authorization` header value, e.g. `Bearer tok1`.
    fn authorization(&self) -> Option<String>;
}

/// `Authorization` header value for a bearer token.
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}
