use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Closed set of account roles.
///
/// Roles carry no implied ordering: a route that admits `Admin` does not
/// admit `Super` unless it lists both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Super,
    Admin,
    #[default]
    Generic,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Super, UserRole::Admin, UserRole::Generic];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Super => "super",
            UserRole::Admin => "admin",
            UserRole::Generic => "generic",
        }
    }

    /// Super and admin accounts may manage other people's resources.
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Super | UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid user role `{0}`")]
pub struct ParseRoleError(pub String);

impl FromStr for UserRole {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super" => Ok(UserRole::Super),
            "admin" => Ok(UserRole::Admin),
            "generic" => Ok(UserRole::Generic),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = ParseRoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
