use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role as reported by the backend.
///
/// Serialized as the exact backend string; values the client does not know
/// yet survive a round trip through [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    LogisticsManager,
    Admin,
    Administrator,
    SystemManager,
    #[default]
    Unset,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "User",
            Role::LogisticsManager => "Logistics Manager",
            Role::Admin => "Admin",
            Role::Administrator => "Administrator",
            Role::SystemManager => "System Manager",
            Role::Unset => "",
            Role::Other(s) => s,
        }
    }

    /// Signup form `userType` to role: `"logistic"` registers a logistics
    /// operator, anything else a regular user.
    pub fn from_user_type(user_type: &str) -> Self {
        if user_type == "logistic" { Role::LogisticsManager } else { Role::User }
    }

    pub fn is_logistics_manager(&self) -> bool {
        matches!(self, Role::LogisticsManager)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::Administrator | Role::SystemManager)
    }

    /// Company and subscription fields belong to logistics operators only.
    /// Unset and unrecognised roles are left alone.
    pub fn excludes_company(&self) -> bool {
        matches!(self, Role::User | Role::Admin | Role::Administrator | Role::SystemManager)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "User" => Role::User,
            "Logistics Manager" => Role::LogisticsManager,
            "Admin" => Role::Admin,
            "Administrator" => Role::Administrator,
            "System Manager" => Role::SystemManager,
            "" => Role::Unset,
            _ => Role::Other(value),
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Role::from(value.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_round_trip_through_json() {
        for raw in ["User", "Logistics Manager", "Admin", "Administrator", "System Manager", ""] {
            let role = Role::from(raw);
            assert!(!matches!(role, Role::Other(_)), "{raw} should be known");
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{raw}\""));
        }
    }

    #[test]
    fn unknown_role_is_preserved() {
        let role: Role = serde_json::from_str("\"Dispatcher\"").unwrap();
        assert_eq!(role, Role::Other("Dispatcher".into()));
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"Dispatcher\"");
        assert!(!role.excludes_company());
    }

    #[test]
    fn user_type_mapping() {
        assert_eq!(Role::from_user_type("logistic"), Role::LogisticsManager);
        assert_eq!(Role::from_user_type("customer"), Role::User);
        assert_eq!(Role::from_user_type(""), Role::User);
    }

    #[test]
    fn admin_family() {
        assert!(Role::SystemManager.is_admin());
        assert!(Role::Administrator.is_admin());
        assert!(!Role::LogisticsManager.is_admin());
    }
}
