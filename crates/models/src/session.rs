use serde::{Deserialize, Deserializer, Serialize};

use crate::plan::SubscriptionPlan;
use crate::role::Role;

/// The logged-in identity plus the company flags derived from it.
///
/// Field names on the wire match the persisted `user` record, so an existing
/// stored session deserializes unchanged. Missing or `null` fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(rename = "fullName", deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: Role,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_registered: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subscription_plan: SubscriptionPlan,
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

impl Session {
    /// A session authenticates requests only while it carries a token.
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Reset company fields for roles that never own a company.
    pub fn enforce_role_isolation(&mut self) {
        if self.role.excludes_company() {
            self.company_registered = false;
            self.company_name.clear();
            self.subscription_plan = SubscriptionPlan::Free;
        }
    }

    pub fn normalized(mut self) -> Self {
        self.enforce_role_isolation();
        self
    }

    pub fn apply(&mut self, patch: SessionPatch) {
        patch.apply_to(self);
    }
}

/// Field-wise partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPatch {
    pub email: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub phone: Option<String>,
    pub token: Option<String>,
    pub company_registered: Option<bool>,
    pub company_name: Option<String>,
    pub subscription_plan: Option<SubscriptionPlan>,
}

impl SessionPatch {
    pub fn is_empty(&self) -> bool {
        *self == SessionPatch::default()
    }

    fn apply_to(self, s: &mut Session) {
        if let Some(v) = self.email { s.email = v; }
        if let Some(v) = self.full_name { s.full_name = v; }
        if let Some(v) = self.role { s.role = v; }
        if let Some(v) = self.phone { s.phone = v; }
        if let Some(v) = self.token { s.token = v; }
        if let Some(v) = self.company_registered { s.company_registered = v; }
        if let Some(v) = self.company_name { s.company_name = v; }
        if let Some(v) = self.subscription_plan { s.subscription_plan = v; }
    }
}
