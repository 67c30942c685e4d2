//! Centralized access policy. Instead of repeating role and ownership
//! checks across handlers, every handler asks one question: may this
//! principal perform this action.

use crate::middleware::auth::AuthUser;
use crate::services::ServiceError;

/// Operations that require an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Admin only.
    ListUsers,
    /// Self or admin.
    ViewUser { target_id: i64 },
    /// Admin only.
    DeleteUser,
    /// Admin only.
    ManageRoles,
    /// Owner only. No admin override for task content.
    AccessTask { owner_id: i64 },
}

pub fn authorize(principal: &AuthUser, action: Action) -> Result<(), ServiceError> {
    let allowed = match action {
        Action::ListUsers | Action::DeleteUser | Action::ManageRoles => principal.is_admin(),
        Action::ViewUser { target_id } => principal.is_admin() || principal.user_id == target_id,
        Action::AccessTask { owner_id } => principal.user_id == owner_id,
    };

    if allowed {
        return Ok(());
    }

    let message = match action {
        Action::ListUsers => "current user is not authorized to list users",
        Action::ViewUser { .. } => "current user is not authorized to view this user",
        Action::DeleteUser => "current user is not authorized to delete users",
        Action::ManageRoles => "current user is not authorized to update roles",
        Action::AccessTask { .. } => "current user does not own this task",
    };
    Err(ServiceError::Unauthorized(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> AuthUser {
        AuthUser {
            user_id: id,
            username: format!("user{}", id),
            roles: vec!["USER".to_string()],
        }
    }

    fn admin(id: i64) -> AuthUser {
        AuthUser {
            user_id: id,
            username: format!("admin{}", id),
            roles: vec!["USER".to_string(), "ADMIN".to_string()],
        }
    }

    #[test]
    fn admin_only_actions() {
        for action in [Action::ListUsers, Action::DeleteUser, Action::ManageRoles] {
            assert!(authorize(&admin(1), action).is_ok());
            assert!(matches!(
                authorize(&user(1), action),
                Err(ServiceError::Unauthorized(_))
            ));
        }
    }

    #[test]
    fn view_user_is_self_or_admin() {
        assert!(authorize(&user(7), Action::ViewUser { target_id: 7 }).is_ok());
        assert!(authorize(&admin(1), Action::ViewUser { target_id: 7 }).is_ok());
        assert!(authorize(&user(2), Action::ViewUser { target_id: 7 }).is_err());
    }

    #[test]
    fn tasks_have_no_admin_override() {
        assert!(authorize(&user(3), Action::AccessTask { owner_id: 3 }).is_ok());
        assert!(authorize(&admin(1), Action::AccessTask { owner_id: 3 }).is_err());
        assert!(authorize(&user(2), Action::AccessTask { owner_id: 3 }).is_err());
    }
}
