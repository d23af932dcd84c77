use std::fmt;
use std::str::FromStr;

use common::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of account roles. Anything outside of it is rejected at
/// the boundary with `AppError::UnknownRole`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "guest" => Ok(Role::Guest),
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            other => Err(AppError::UnknownRole(other.to_string())),
        }
    }
}

/// Whether `actor` may edit or delete a resource owned by `owner`.
///
/// Admins may act on anything. Members only on their own resources.
/// Guests own nothing, so they are denied even if the ids happen to
/// match.
pub fn can_edit_resource(actor_role: Role, actor_id: Uuid, resource_owner_id: Uuid) -> bool {
    match actor_role {
        Role::Admin => true,
        Role::Member => actor_id == resource_owner_id,
        Role::Guest => false,
    }
}

/// Whether `actor_role` may create member content: recipes, posts,
/// comments, likes.
pub fn can_create_member_content(actor_role: Role) -> bool {
    matches!(actor_role, Role::Member | Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_edits_anything() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(can_edit_resource(Role::Admin, a, b));
        assert!(can_edit_resource(Role::Admin, a, a));
    }

    #[test]
    fn member_edits_own_resources_only() {
        let u = Uuid::new_v4();
        let v = Uuid::new_v4();
        assert!(can_edit_resource(Role::Member, u, u));
        assert!(!can_edit_resource(Role::Member, u, v));
    }

    #[test]
    fn guest_never_edits() {
        // guests own nothing; equal ids must still be denied rather than crash
        let u = Uuid::new_v4();
        assert!(!can_edit_resource(Role::Guest, u, u));
        assert!(!can_edit_resource(Role::Guest, u, Uuid::new_v4()));
    }

    #[test]
    fn member_content_requires_member_or_admin() {
        assert!(can_create_member_content(Role::Member));
        assert!(can_create_member_content(Role::Admin));
        assert!(!can_create_member_content(Role::Guest));
    }

    #[test]
    fn role_parsing_is_closed() {
        assert_eq!("member".parse::<Role>().unwrap(), Role::Member);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!(matches!(
            "superuser".parse::<Role>(),
            Err(AppError::UnknownRole(_))
        ));
    }
}
