use std::fmt;

/// Navigation hint handed back to the UI layer; the client never navigates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Redirect {
    Login,
    Dashboard,
    RegisterCompany,
    OnboardingSubscription,
    LogisticDashboardHome,
    BoltOnUpgrade,
}

impl Redirect {
    pub fn path(&self) -> &'static str {
        match self {
            Redirect::Login => "/login",
            Redirect::Dashboard => "/dashboard",
            Redirect::RegisterCompany => "/register-company",
            Redirect::OnboardingSubscription => "/onboarding-subscription",
            Redirect::LogisticDashboardHome => "/logistic-dashboard/home",
            Redirect::BoltOnUpgrade => "/logistic-dashboard/bolt-on-upgrade",
        }
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
