use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::{ROLE_CLIENT, ROLE_INVESTIGATOR};

/// Marketplace role. A user may hold both grants and pick one as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Investigator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => ROLE_CLIENT,
            Role::Investigator => ROLE_INVESTIGATOR,
        }
    }

    /// The role a dual-role user switches to from `self`
    pub fn other(&self) -> Role {
        match self {
            Role::Client => Role::Investigator,
            Role::Investigator => Role::Client,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_CLIENT => Ok(Role::Client),
            ROLE_INVESTIGATOR => Ok(Role::Investigator),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Caller identity resolved by the auth middleware from the bearer token
/// and the user's currently active role grants.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Active role grants, ordered by role id
    pub roles: Vec<Role>,
    /// Role the caller is currently acting as
    pub active_role: Option<Role>,
}

impl AuthenticatedUser {
    /// Check if user holds an active grant for `role`
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_client(&self) -> bool {
        self.has_role(Role::Client)
    }

    pub fn is_investigator(&self) -> bool {
        self.has_role(Role::Investigator)
    }

    /// Resolve the acting role: the token's claim if it still names an active
    /// grant, otherwise the first active grant.
    pub fn resolve_active_role(roles: &[Role], claimed: Option<Role>) -> Option<Role> {
        match claimed {
            Some(role) if roles.contains(&role) => Some(role),
            _ => roles.first().copied(),
        }
    }
}

/// Claims carried by access tokens issued by this service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub iat: i64,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        assert_eq!("client".parse::<Role>(), Ok(Role::Client));
        assert_eq!("investigator".parse::<Role>(), Ok(Role::Investigator));
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(Role::Investigator.to_string(), "investigator");
    }

    #[test]
    fn test_claimed_role_must_be_active() {
        let both = [Role::Client, Role::Investigator];
        assert_eq!(
            AuthenticatedUser::resolve_active_role(&both, Some(Role::Investigator)),
            Some(Role::Investigator)
        );
        assert_eq!(
            AuthenticatedUser::resolve_active_role(&both, None),
            Some(Role::Client)
        );

        let only_investigator = [Role::Investigator];
        assert_eq!(
            AuthenticatedUser::resolve_active_role(&only_investigator, Some(Role::Client)),
            Some(Role::Investigator)
        );
        assert_eq!(AuthenticatedUser::resolve_active_role(&[], Some(Role::Client)), None);
    }

    #[test]
    fn test_claims_omit_missing_role() {
        let claims = AccessClaims {
            sub: Uuid::nil(),
            role: None,
            iat: 0,
            exp: 1,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("role").is_none());
    }
}
