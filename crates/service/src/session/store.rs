use std::sync::Arc;

use models::auth::{LoginRequest, RegistrationForm, SignupRequest};
use models::{CompanyRecord, PlanTier, Redirect, Session, SessionPatch, SubscriptionPlan};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, instrument, warn};

use crate::access::{self, Access, Area};
use crate::api::MarketplaceApi;
use crate::storage::{KeyValueStore, SessionStorage};

use super::errors::{SessionError, COMPANY_FETCH_FAILED, LOGIN_FAILED, REGISTRATION_FAILED};
use super::events::{EventBus, SessionEvent};

/// Successful login: the stored session and where the UI should go next.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub session: Session,
    pub redirect: Redirect,
}

/// Outcome of a company lookup that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum CompanyStatus {
    Missing,
    Registered(CompanyRecord),
}

impl CompanyStatus {
    pub fn exists(&self) -> bool {
        matches!(self, CompanyStatus::Registered(_))
    }

    pub fn company(&self) -> Option<&CompanyRecord> {
        match self {
            CompanyStatus::Registered(c) => Some(c),
            CompanyStatus::Missing => None,
        }
    }
}

/// Holds the current session and keeps storage and the API client's
/// `Authorization` header in step with it.
///
/// Every mutation is write-through: the record is persisted before the
/// in-memory copy is replaced, inside the same call. Concurrent mutators are
/// not versioned; the last write wins. No method panics or returns a
/// transport error unconverted.
pub struct SessionStore<A: MarketplaceApi + ?Sized, K: KeyValueStore + ?Sized> {
    api: Arc<A>,
    storage: SessionStorage<K>,
    current: RwLock<Option<Session>>,
    events: EventBus,
}

impl<A: MarketplaceApi + ?Sized, K: KeyValueStore + ?Sized> SessionStore<A, K> {
    /// Build the store and hydrate it from storage.
    ///
    /// When a stored token exists the API client's header is set before this
    /// returns, so requests issued during startup are authenticated.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::api::mock::MockMarketplaceApi;
    /// use service::session::SessionStore;
    /// use service::storage::MemoryStore;
    /// let store = SessionStore::new(Arc::new(MockMarketplaceApi::new()), Arc::new(MemoryStore::new()));
    /// assert!(tokio_test::block_on(store.session()).is_none());
    /// assert!(!tokio_test::block_on(store.is_authenticated()));
    /// ```
    pub fn new(api: Arc<A>, kv: Arc<K>) -> Self {
        let storage = SessionStorage::new(kv);
        let session = hydrate(api.as_ref(), &storage);
        Self { api, storage, current: RwLock::new(session), events: EventBus::default() }
    }

    /// Re-read the stored session and re-sync the header. Idempotent.
    pub async fn refresh_auth(&self) {
        let mut guard = self.current.write().await;
        *guard = hydrate(self.api.as_ref(), &self.storage);
        debug!(authenticated = guard.as_ref().map_or(false, Session::is_authenticated), "session refreshed");
    }

    pub async fn session(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.as_ref().map_or(false, Session::is_authenticated)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn bolt_on_offer_seen(&self) -> bool {
        self.storage.bolt_on_offer_seen()
    }

    pub fn api(&self) -> &A {
        self.api.as_ref()
    }

    /// Gate a UI area against the current session.
    pub async fn gate(&self, area: Area) -> Access {
        access::gate(self.current.read().await.as_ref(), area)
    }

    /// Create an account. Does not log in; returns the server's message.
    #[instrument(skip(self, form), fields(email = %form.email, user_type = %form.user_type))]
    pub async fn register(&self, form: RegistrationForm) -> Result<Option<String>, SessionError> {
        let request = SignupRequest::from(form);
        match self.api.signup(&request).await {
            Ok(message) => {
                info!(role = %request.role, event = "registered", "signup accepted");
                Ok(message)
            }
            Err(e) => {
                let err = SessionError::Registration(e.user_message(REGISTRATION_FAILED));
                warn!(error = %e, code = err.code(), "signup failed");
                Err(err)
            }
        }
    }

    /// Log in, replace the session wholesale and work out the next screen.
    ///
    /// Logistics managers are routed by their company and plan; a failed
    /// company lookup sends them to company registration rather than
    /// failing the login.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use models::{auth::LoginData, Redirect, Role};
    /// use service::api::mock::MockMarketplaceApi;
    /// use service::session::SessionStore;
    /// use service::storage::MemoryStore;
    /// let api = MockMarketplaceApi::new().with_login(Ok(LoginData {
    ///     role: Some(Role::User),
    ///     token: Some("tok1".into()),
    ///     ..LoginData::default()
    /// }));
    /// let store = SessionStore::new(Arc::new(api), Arc::new(MemoryStore::new()));
    /// let ok = tokio_test::block_on(store.login("a@b.com", "pw")).unwrap();
    /// assert_eq!(ok.redirect, Redirect::Dashboard);
    /// assert_eq!(ok.session.token, "tok1");
    /// ```
    #[instrument(skip(self, email, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSuccess, SessionError> {
        let request = LoginRequest { email: email.to_string(), password: password.to_string() };
        let data = self.api.login(&request).await.map_err(|e| {
            let err = SessionError::Login(e.user_message(LOGIN_FAILED));
            warn!(error = %e, code = err.code(), "login failed");
            err
        })?;

        let fresh = data.into_session(email);
        let session = self.mutate(|s| *s = fresh).await;
        self.api.set_bearer_token(Some(&session.token).filter(|t| !t.is_empty()).map(String::as_str));
        self.events.emit(SessionEvent::LoggedIn);
        info!(role = %session.role, event = "logged_in", "session established");

        let redirect = if session.role.is_logistics_manager() {
            self.company_redirect(email).await
        } else {
            Redirect::Dashboard
        };
        let session = self.session().await.unwrap_or(session);
        info!(redirect = redirect.path(), "post-login redirect");
        Ok(LoginSuccess { session, redirect })
    }

    async fn company_redirect(&self, email: &str) -> Redirect {
        match self.fetch_company(email).await {
            Ok(CompanyStatus::Registered(_)) => {}
            Ok(CompanyStatus::Missing) => return Redirect::RegisterCompany,
            Err(e) => {
                warn!(error = %e, "company lookup during login failed");
                return Redirect::RegisterCompany;
            }
        }

        let plan = self.session().await.map(|s| s.subscription_plan).unwrap_or_default();
        match plan.tier() {
            PlanTier::Free => Redirect::OnboardingSubscription,
            PlanTier::BoltOn => {
                self.storage.set_bolt_on_offer_seen(true);
                Redirect::LogisticDashboardHome
            }
            PlanTier::Paid => {
                self.storage.set_bolt_on_offer_seen(false);
                Redirect::BoltOnUpgrade
            }
        }
    }

    /// Look up the company owned by `email` and fold it into the session.
    ///
    /// Only the first record counts. An empty result marks the session as
    /// having no company.
    #[instrument(skip(self))]
    pub async fn fetch_company(&self, email: &str) -> Result<CompanyStatus, SessionError> {
        if email.is_empty() {
            return Err(SessionError::MissingEmail);
        }

        let companies = self.api.get_my_company(email).await.map_err(|e| {
            let err = SessionError::Company(e.user_message(COMPANY_FETCH_FAILED));
            error!(error = %e, code = err.code(), "fetching company failed");
            err
        })?;

        let Some(company) = companies.into_iter().next() else {
            self.mutate(|s| s.company_registered = false).await;
            info!(event = "company_missing", "no company registered for this email");
            return Ok(CompanyStatus::Missing);
        };

        let registered = company.is_registered();
        let name = company.company_name.clone().unwrap_or_default();
        let plan = SubscriptionPlan::from(company.subscription_plan.clone().unwrap_or_default());
        let session = self
            .mutate(|s| {
                s.company_registered = registered;
                s.company_name = name;
                s.subscription_plan = plan;
            })
            .await;
        info!(
            company = %session.company_name,
            plan = %session.subscription_plan,
            authenticated = session.is_authenticated(),
            "company folded into session"
        );
        Ok(CompanyStatus::Registered(company))
    }

    /// Drop the session, its stored keys and the `Authorization` header.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let mut guard = self.current.write().await;
        self.storage.clear_session();
        *guard = None;
        self.api.set_bearer_token(None);
        drop(guard);
        self.events.emit(SessionEvent::LoggedOut);
        info!(event = "logged_out", "session cleared");
    }

    /// Merge `patch` onto the current session, or onto a default one.
    pub async fn update_user(&self, patch: SessionPatch) -> Session {
        self.mutate(|s| s.apply(patch)).await
    }

    /// Record a plan purchased in this client before the backend confirms it.
    #[instrument(skip(self))]
    pub async fn activate_subscription_local(&self, plan: &str) -> Session {
        let plan = SubscriptionPlan::from(plan);
        let session = self
            .mutate(|s| {
                s.subscription_plan = plan;
                s.company_registered = true;
            })
            .await;
        self.storage.mark_subscription_active();
        self.events.emit(SessionEvent::SubscriptionUpdated);
        info!(plan = %session.subscription_plan, event = "subscription_activated", "plan activated locally");
        session
    }

    /// Read-modify-write under the write lock, then persist and re-sync the
    /// header if the token changed. Storage failures are logged and ignored.
    async fn mutate<F>(&self, f: F) -> Session
    where
        F: FnOnce(&mut Session),
    {
        let mut guard = self.current.write().await;
        let previous_token = guard.as_ref().map(|s| s.token.clone()).unwrap_or_default();
        let mut next = guard.clone().unwrap_or_default();
        f(&mut next);
        let next = next.normalized();

        if let Err(e) = self.storage.save_session(&next) {
            warn!(error = %e, "persisting session failed; keeping in-memory copy");
        }
        if next.token != previous_token {
            self.api.set_bearer_token(Some(next.token.as_str()).filter(|t| !t.is_empty()));
        }
        *guard = Some(next.clone());
        next
    }
}

/// Load the stored session and point the header at its token, falling
/// back to the legacy token key.
fn hydrate<A, K>(api: &A, storage: &SessionStorage<K>) -> Option<Session>
where
    A: MarketplaceApi + ?Sized,
    K: KeyValueStore + ?Sized,
{
    let session = storage.load_session().map(Session::normalized);
    let token = session
        .as_ref()
        .map(|s| s.token.clone())
        .filter(|t| !t.is_empty())
        .or_else(|| storage.legacy_token());
    api.set_bearer_token(token.as_deref());
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockMarketplaceApi;
    use crate::errors::StorageError;
    use crate::storage::MemoryStore;
    use models::Role;

    /// Storage whose writes always fail.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> { self.0.get(key) }
        fn set(&self, _: &str, _: &str) -> Result<(), StorageError> { Err(StorageError::Io("quota exceeded".into())) }
        fn remove(&self, _: &str) -> Result<(), StorageError> { Err(StorageError::Io("quota exceeded".into())) }
    }

    #[tokio::test]
    async fn storage_failures_are_swallowed() {
        let store = SessionStore::new(Arc::new(MockMarketplaceApi::new()), Arc::new(ReadOnlyStore(MemoryStore::new())));
        let s = store.update_user(SessionPatch { phone: Some("123".into()), ..SessionPatch::default() }).await;
        assert_eq!(s.phone, "123");
        assert_eq!(store.session().await.map(|s| s.phone), Some("123".into()));
        store.logout().await;
        assert!(store.session().await.is_none());
    }

    #[tokio::test]
    async fn token_change_through_update_resyncs_header() {
        let api = Arc::new(MockMarketplaceApi::new());
        let store = SessionStore::new(api.clone(), Arc::new(MemoryStore::new()));
        store.update_user(SessionPatch { token: Some("t2".into()), ..SessionPatch::default() }).await;
        assert_eq!(api.authorization().as_deref(), Some("Bearer t2"));
        store.update_user(SessionPatch { token: Some(String::new()), ..SessionPatch::default() }).await;
        assert_eq!(api.authorization(), None);
    }

    #[tokio::test]
    async fn hydrated_user_session_is_role_isolated() {
        let raw = r#"{"email":"u@e.com","role":"User","token":"t","company_registered":true,"subscription_plan":"Premium"}"#;
        let kv = Arc::new(MemoryStore::with_entries([("user", raw)]));
        let store = SessionStore::new(Arc::new(MockMarketplaceApi::new()), kv);
        let s = store.session().await.unwrap();
        assert_eq!(s.role, Role::User);
        assert!(!s.company_registered);
        assert_eq!(s.subscription_plan, SubscriptionPlan::Free);
    }
}
