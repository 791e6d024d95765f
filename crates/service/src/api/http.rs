use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use configs::ApiConfig;
use models::auth::{LoginData, LoginRequest, SignupRequest};
use models::envelope::{self, Reply};
use models::CompanyRecord;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::client::{bearer_header, MarketplaceApi};
use super::errors::ApiError;

/// `reqwest` implementation of [`MarketplaceApi`].
///
/// Timeouts come from the config and are the only ones applied; there is
/// no retry.
#[derive(Clone)]
pub struct HttpMarketplaceApi {
    client: Client,
    cfg: ApiConfig,
    bearer: Arc<RwLock<Option<String>>>,
}

impl HttpMarketplaceApi {
    pub fn new(cfg: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, cfg))
    }

    pub fn with_client(client: Client, cfg: ApiConfig) -> Self {
        Self { client, cfg, bearer: Arc::new(RwLock::new(None)) }
    }

    fn token(&self) -> Option<String> {
        match self.bearer.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Reply<T>, ApiError> {
        let req = match self.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let resp = req.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        if !status.is_success() {
            let message = envelope::error_message(&body);
            warn!(status = status.as_u16(), "backend returned error status");
            return Err(ApiError::Status { status: status.as_u16(), message });
        }
        envelope::decode::<T>(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Split a decoded reply into data or a rejection.
fn accept<T>(reply: Reply<T>) -> Result<(Option<T>, Option<String>), ApiError> {
    match reply {
        Reply::Ok { data, message } => Ok((data, message)),
        Reply::Err { message } => Err(ApiError::Rejected { message }),
    }
}

#[async_trait]
impl MarketplaceApi for HttpMarketplaceApi {
    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role))]
    async fn signup(&self, request: &SignupRequest) -> Result<Option<String>, ApiError> {
        let url = self.cfg.url_for(&self.cfg.signup_path);
        let reply = self.send::<serde_json::Value>(self.client.post(&url).json(request)).await?;
        let (_, message) = accept(reply)?;
        Ok(message)
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest) -> Result<LoginData, ApiError> {
        let url = self.cfg.url_for(&self.cfg.login_path);
        let reply = self.send::<LoginData>(self.client.post(&url).json(request)).await?;
        let (data, _) = accept(reply)?;
        data.ok_or_else(|| ApiError::Decode("login response carried no data".into()))
    }

    #[instrument(skip(self))]
    async fn get_my_company(&self, email: &str) -> Result<Vec<CompanyRecord>, ApiError> {
        let url = self.cfg.url_for(&self.cfg.company_path);
        let reply = self
            .send::<Vec<CompanyRecord>>(self.client.get(&url).query(&[("email", email)]))
            .await?;
        let (data, _) = accept(reply)?;
        let companies = data.unwrap_or_default();
        debug!(count = companies.len(), "companies fetched");
        Ok(companies)
    }

    fn set_bearer_token(&self, token: Option<&str>) {
        let next = token.filter(|t| !t.is_empty()).map(str::to_string);
        match self.bearer.write() {
            Ok(mut slot) => *slot = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    fn authorization(&self) -> Option<String> {
        self.token().map(|t| bearer_header(&t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_slot_set_and_cleared() {
        let api = HttpMarketplaceApi::new(ApiConfig::default()).unwrap();
        assert_eq!(api.authorization(), None);
        api.set_bearer_token(Some("tok1"));
        assert_eq!(api.authorization().as_deref(), Some("Bearer tok1"));
        api.set_bearer_token(Some(""));
        assert_eq!(api.authorization(), None);
    }

    #[test]
    fn clones_share_the_header() {
        let api = HttpMarketplaceApi::new(ApiConfig::default()).unwrap();
        let other = api.clone();
        api.set_bearer_token(Some("shared"));
        assert_eq!(other.authorization().as_deref(), Some("Bearer shared"));
    }
}
