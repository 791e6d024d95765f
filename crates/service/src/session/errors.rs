use thiserror::Error;

pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const LOGIN_FAILED: &str = "Login failed";
pub const COMPANY_FETCH_FAILED: &str = "Failed to fetch company details";

/// Caller-facing failures of session operations.
///
/// The display text is the message meant for the user: the server's own
/// message when it sent one, otherwise a generic fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("No email provided")]
    MissingEmail,
    #[error("{0}")]
    Registration(String),
    #[error("{0}")]
    Login(String),
    #[error("{0}")]
    Company(String),
}

impl SessionError {
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            SessionError::MissingEmail => 2001,
            SessionError::Registration(_) => 2101,
            SessionError::Login(_) => 2102,
            SessionError::Company(_) => 2201,
        }
    }
}
