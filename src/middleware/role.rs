use anyhow::anyhow;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use gourze_auth::UserRole;
use gourze_core::AppError;
use tracing::debug;

use super::auth::CurrentUser;

/// Per-route access policy.
///
/// - `mandatory`: reject requests without an identity.
/// - `allowed_roles`: when non-empty, an identified caller must hold one of
///   these roles exactly. Roles are not ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    pub mandatory: bool,
    pub allowed_roles: &'static [UserRole],
}

impl Gate {
    /// Guests allowed; identity is used when present.
    pub const OPTIONAL: Gate = Gate {
        mandatory: false,
        allowed_roles: &[],
    };

    /// Any signed-in user.
    pub const AUTHENTICATED: Gate = Gate {
        mandatory: true,
        allowed_roles: &[],
    };

    /// Super and admin only.
    pub const STAFF: Gate = Gate {
        mandatory: true,
        allowed_roles: &[UserRole::Super, UserRole::Admin],
    };

    pub fn check(&self, user: Option<&CurrentUser>) -> Result<(), AppError> {
        match user {
            None if self.mandatory => {
                Err(AppError::unauthorized(anyhow!("Authentication required")))
            }
            None => Ok(()),
            Some(user)
                if !self.allowed_roles.is_empty() && !self.allowed_roles.contains(&user.role) =>
            {
                debug!(user_id = user.id, role = %user.role, "Role not allowed");
                Err(AppError::unauthorized(anyhow!(
                    "Insufficient permissions for this resource"
                )))
            }
            Some(_) => Ok(()),
        }
    }
}

/// Route layer enforcing a [`Gate`]; the handler never runs on rejection.
pub async fn authorize(
    State(gate): State<Gate>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate.check(req.extensions().get::<CurrentUser>())?;
    Ok(next.run(req).await)
}
