use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the "get my company" result list. Only the fields the
/// session depends on are typed; everything else is carried along.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CompanyRecord {
    pub fn named(name: &str) -> Self {
        Self { company_name: Some(name.to_string()), ..Self::default() }
    }

    pub fn with_plan(mut self, plan: &str) -> Self {
        self.subscription_plan = Some(plan.to_string());
        self
    }

    /// A company counts as registered once it has a non-empty name.
    pub fn is_registered(&self) -> bool {
        self.company_name.as_deref().map_or(false, |n| !n.is_empty())
    }
}
