//! Route gating by role and subscription state.

use std::str::FromStr;

use models::{Redirect, Session};

/// UI areas with distinct entry requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Public,
    UserDashboard,
    LogisticDashboard,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Redirect(Redirect),
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }
}

impl FromStr for Area {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Area::Public),
            "dashboard" | "user" => Ok(Area::UserDashboard),
            "logistic" | "logistic-dashboard" => Ok(Area::LogisticDashboard),
            "admin" => Ok(Area::Admin),
            other => Err(format!("unknown area: {other}")),
        }
    }
}

/// Decide whether `session` may enter `area`, or where to send it instead.
pub fn gate(session: Option<&Session>, area: Area) -> Access {
    if area == Area::Public {
        return Access::Granted;
    }
    let Some(session) = session.filter(|s| s.is_authenticated()) else {
        return Access::Redirect(Redirect::Login);
    };

    match area {
        Area::Public | Area::UserDashboard => Access::Granted,
        Area::Admin if session.role.is_admin() => Access::Granted,
        Area::Admin => Access::Redirect(Redirect::Dashboard),
        Area::LogisticDashboard if !session.role.is_logistics_manager() => Access::Redirect(Redirect::Dashboard),
        Area::LogisticDashboard if !session.company_registered => Access::Redirect(Redirect::RegisterCompany),
        Area::LogisticDashboard if session.subscription_plan.is_free() => {
            Access::Redirect(Redirect::OnboardingSubscription)
        }
        Area::LogisticDashboard => Access::Granted,
    }
}
