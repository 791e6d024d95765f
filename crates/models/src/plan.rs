use std::fmt;

use serde::{Deserialize, Serialize};

/// Fragments that mark a bolt-on purchase. Matched as substrings of the
/// lower-cased plan name since the backend varies casing and spacing.
const BOLT_ON_MARKERS: [&str; 4] = ["extra leads", "additional jobs", "extra_leads", "additional_jobs"];

/// Subscription plan of a logistics company.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Basic,
    Standard,
    Premium,
    /// Bolt-on names and anything else the backend sends, kept verbatim.
    Other(String),
}

/// Coarse classification used by post-login routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTier {
    Free,
    BoltOn,
    Paid,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &str {
        match self {
            SubscriptionPlan::Free => "Free",
            SubscriptionPlan::Basic => "Basic",
            SubscriptionPlan::Standard => "Standard",
            SubscriptionPlan::Premium => "Premium",
            SubscriptionPlan::Other(s) => s,
        }
    }

    pub fn tier(&self) -> PlanTier {
        classify(self.as_str())
    }

    pub fn is_free(&self) -> bool {
        self.tier() == PlanTier::Free
    }

    pub fn is_bolt_on(&self) -> bool {
        self.tier() == PlanTier::BoltOn
    }
}

/// Classify a raw plan name: empty or `free` is free, any bolt-on marker
/// anywhere in the name is a bolt-on, the rest are paid plans.
pub fn classify(raw: &str) -> PlanTier {
    let plan = raw.trim().to_lowercase();
    if plan.is_empty() || plan == "free" {
        PlanTier::Free
    } else if BOLT_ON_MARKERS.iter().any(|m| plan.contains(m)) {
        PlanTier::BoltOn
    } else {
        PlanTier::Paid
    }
}

impl From<String> for SubscriptionPlan {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("free") {
            SubscriptionPlan::Free
        } else if trimmed.eq_ignore_ascii_case("basic") {
            SubscriptionPlan::Basic
        } else if trimmed.eq_ignore_ascii_case("standard") {
            SubscriptionPlan::Standard
        } else if trimmed.eq_ignore_ascii_case("premium") {
            SubscriptionPlan::Premium
        } else {
            SubscriptionPlan::Other(value)
        }
    }
}

impl From<&str> for SubscriptionPlan {
    fn from(value: &str) -> Self {
        SubscriptionPlan::from(value.to_string())
    }
}

impl From<SubscriptionPlan> for String {
    fn from(plan: SubscriptionPlan) -> Self {
        match plan {
            SubscriptionPlan::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
