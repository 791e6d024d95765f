use serde::{Deserialize, Serialize};

use crate::plan::SubscriptionPlan;
use crate::role::Role;
use crate::session::Session;

/// Registration form as collected by the signup page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub otp: String,
    pub pincode: String,
    pub city: String,
    pub state: String,
    /// `"logistic"` for logistics operators, anything else for customers.
    pub user_type: String,
}

/// Body of the signup endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub otp: String,
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub role: Role,
}

impl From<RegistrationForm> for SignupRequest {
    fn from(f: RegistrationForm) -> Self {
        let role = Role::from_user_type(&f.user_type);
        Self {
            full_name: f.full_name,
            email: f.email,
            password: f.password,
            phone: f.phone,
            otp: f.otp,
            pincode: f.pincode,
            city: f.city,
            state: f.state,
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `data` of a successful login. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginData {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub phone: Option<String>,
    pub token: Option<String>,
    pub company_registered: Option<bool>,
    pub company_name: Option<String>,
    pub subscription_plan: Option<SubscriptionPlan>,
}

impl LoginData {
    /// Build a complete session; absent fields fall back to the data model
    /// defaults, the email to the one used for logging in.
    pub fn into_session(self, login_email: &str) -> Session {
        Session {
            email: self.email.filter(|e| !e.is_empty()).unwrap_or_else(|| login_email.to_string()),
            full_name: self.full_name.unwrap_or_default(),
            role: self.role.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            token: self.token.unwrap_or_default(),
            company_registered: self.company_registered.unwrap_or(false),
            company_name: self.company_name.unwrap_or_default(),
            subscription_plan: self.subscription_plan.unwrap_or_default(),
        }
        .normalized()
    }
}
