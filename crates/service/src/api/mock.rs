//! Scripted in-memory backend for tests and doc examples.

use std::sync::Mutex;

use async_trait::async_trait;
use models::auth::{LoginData, LoginRequest, SignupRequest};
use models::CompanyRecord;

use super::client::{bearer_header, MarketplaceApi};
use super::errors::ApiError;

/// A call the mock received, with the `Authorization` header in effect then.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub call: MockCall,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Signup(SignupRequest),
    Login(LoginRequest),
    GetMyCompany(String),
}

type Scripted<T> = Mutex<Option<Result<T, ApiError>>>;

/// Unscripted operations fail with a transport error.
#[derive(Default)]
pub struct MockMarketplaceApi {
    signup: Scripted<Option<String>>,
    login: Scripted<LoginData>,
    company: Scripted<Vec<CompanyRecord>>,
    bearer: Mutex<Option<String>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockMarketplaceApi {
    pub fn new() -> Self { Self::default() }

    pub fn with_signup(self, reply: Result<Option<String>, ApiError>) -> Self {
        *self.signup.lock().unwrap() = Some(reply);
        self
    }

    pub fn with_login(self, reply: Result<LoginData, ApiError>) -> Self {
        *self.login.lock().unwrap() = Some(reply);
        self
    }

    pub fn with_companies(self, reply: Result<Vec<CompanyRecord>, ApiError>) -> Self {
        *self.company.lock().unwrap() = Some(reply);
        self
    }

    /// Replace the company reply after construction, e.g. between two logins.
    pub fn set_companies(&self, reply: Result<Vec<CompanyRecord>, ApiError>) {
        *self.company.lock().unwrap() = Some(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&MockCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(&c.call)).count()
    }

    fn record(&self, call: MockCall) {
        let authorization = self.authorization();
        self.calls.lock().unwrap().push(RecordedCall { call, authorization });
    }

    fn reply<T: Clone>(slot: &Scripted<T>) -> Result<T, ApiError> {
        slot.lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted reply".into())))
    }
}

#[async_trait]
impl MarketplaceApi for MockMarketplaceApi {
    async fn signup(&self, request: &SignupRequest) -> Result<Option<String>, ApiError> {
        self.record(MockCall::Signup(request.clone()));
        Self::reply(&self.signup)
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginData, ApiError> {
        self.record(MockCall::Login(request.clone()));
        Self::reply(&self.login)
    }

    async fn get_my_company(&self, email: &str) -> Result<Vec<CompanyRecord>, ApiError> {
        self.record(MockCall::GetMyCompany(email.to_string()));
        Self::reply(&self.company)
    }

    fn set_bearer_token(&self, token: Option<&str>) {
        *self.bearer.lock().unwrap() = token.filter(|t| !t.is_empty()).map(str::to_string);
    }

    fn authorization(&self) -> Option<String> {
        self.bearer.lock().unwrap().as_deref().map(bearer_header)
    }
}
