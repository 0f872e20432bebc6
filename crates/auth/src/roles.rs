use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Permission;
use crate::permissions::{RECORDS_READ, RECORDS_WRITE};

/// Role identifier used for RBAC.
///
/// Roles stay opaque strings on the wire; [`permissions_for_roles`] is the one
/// place that gives the well-known ones meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const STAFF: &'static str = "staff";
    pub const VIEWER: &'static str = "viewer";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role -> permission mapping for the back office.
///
/// - `admin`: wildcard (deletes, zone maintenance, identifier audits)
/// - `staff`: read + create/update records
/// - `viewer`: read only
///
/// Unknown roles grant nothing.
pub fn permissions_for_roles(roles: &[Role]) -> Vec<Permission> {
    let mut perms: Vec<Permission> = Vec::new();
    for role in roles {
        let granted: &[&'static str] = match role.as_str() {
            Role::ADMIN => return vec![Permission::new("*")],
            Role::STAFF => &[RECORDS_READ, RECORDS_WRITE],
            Role::VIEWER => &[RECORDS_READ],
            _ => &[],
        };
        for name in granted {
            if !perms.iter().any(|p| p.as_str() == *name) {
                perms.push(Permission::new(*name));
            }
        }
    }
    perms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_gets_wildcard() {
        let perms = permissions_for_roles(&[Role::new("viewer"), Role::new("admin")]);
        assert_eq!(perms, vec![Permission::new("*")]);
    }

    #[test]
    fn staff_can_read_and_write() {
        let perms = permissions_for_roles(&[Role::new("staff")]);
        assert!(perms.iter().any(|p| p.as_str() == RECORDS_READ));
        assert!(perms.iter().any(|p| p.as_str() == RECORDS_WRITE));
    }

    #[test]
    fn unknown_roles_grant_nothing() {
        assert!(permissions_for_roles(&[Role::new("guest")]).is_empty());
    }
}
