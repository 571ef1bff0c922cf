//! User directory keyed by phone number.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{Role, SessionClaims};
use crate::store::StoreError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Claims to embed in a freshly issued credential.
    pub fn claims(&self) -> SessionClaims {
        SessionClaims {
            sub: self.id.to_string(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            role: self.role,
        }
    }
}

/// Phone number with separators (spaces, dashes, dots, parentheses) removed.
///
/// Directory keys and admin phones both go through this.
pub fn normalize_phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect()
}

/// Registered users. Phones listed as admin phones register with [`Role::Admin`].
pub struct UserDirectory {
    by_phone: DashMap<String, User>,
    admin_phones: HashSet<String>,
}

impl UserDirectory {
    pub fn new(admin_phones: impl IntoIterator<Item = String>) -> Self {
        Self {
            by_phone: DashMap::new(),
            admin_phones: admin_phones
                .into_iter()
                .map(|p| normalize_phone(&p))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn register(&self, name: &str, phone: &str) -> Result<User, StoreError> {
        match self.by_phone.entry(phone.to_string()) {
            Entry::Occupied(_) => Err(StoreError::Conflict("user")),
            Entry::Vacant(slot) => {
                let role = if self.admin_phones.contains(phone) {
                    Role::Admin
                } else {
                    Role::User
                };
                let user = User {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    phone: phone.to_string(),
                    role,
                    created_at: Utc::now(),
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    pub fn find_by_phone(&self, phone: &str) -> Option<User> {
        self.by_phone.get(phone).map(|r| r.value().clone())
    }

    pub fn find_by_id(&self, id: &Uuid) -> Option<User> {
        self.by_phone
            .iter()
            .find(|r| r.value().id == *id)
            .map(|r| r.value().clone())
    }

    pub fn update_name(&self, id: &Uuid, name: &str) -> Result<User, StoreError> {
        let phone = self
            .find_by_id(id)
            .map(|u| u.phone)
            .ok_or(StoreError::NotFound("user"))?;

        let mut user = self
            .by_phone
            .get_mut(&phone)
            .ok_or(StoreError::NotFound("user"))?;
        user.name = name.to_string();
        Ok(user.clone())
    }

    /// Change a user's role. Credentials already issued keep their old role
    /// until they expire or are reissued.
    pub fn set_role(&self, phone: &str, role: Role) -> Result<User, StoreError> {
        let mut user = self
            .by_phone
            .get_mut(phone)
            .ok_or(StoreError::NotFound("user"))?;
        user.role = role;
        Ok(user.clone())
    }

    pub fn count(&self) -> usize {
        self.by_phone.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_roles() {
        let dir = UserDirectory::new(vec!["+6200".to_string()]);
        let admin = dir.register("Admin", "+6200").unwrap();
        let member = dir.register("Member", "+6211").unwrap();

        assert_eq!(admin.role, Role::Admin);
        assert_eq!(member.role, Role::User);
        assert_eq!(dir.count(), 2);
    }

    #[test]
    fn test_admin_phones_are_normalized() {
        let dir = UserDirectory::new(vec!["+62 812-0000-0001".to_string()]);
        let admin = dir.register("Admin", "+6281200000001").unwrap();
        assert_eq!(admin.role, Role::Admin);
    }

    #[test]
    fn test_duplicate_phone_conflicts() {
        let dir = UserDirectory::new(Vec::new());
        dir.register("A", "+6211").unwrap();
        assert_eq!(dir.register("B", "+6211"), Err(StoreError::Conflict("user")));
    }

    #[test]
    fn test_update_name() {
        let dir = UserDirectory::new(Vec::new());
        let user = dir.register("Old", "+6211").unwrap();
        let updated = dir.update_name(&user.id, "New").unwrap();

        assert_eq!(updated.name, "New");
        assert_eq!(dir.find_by_phone("+6211").unwrap().name, "New");
        assert_eq!(
            dir.update_name(&Uuid::new_v4(), "x"),
            Err(StoreError::NotFound("user"))
        );
    }

    #[test]
    fn test_claims_carry_identity() {
        let dir = UserDirectory::new(Vec::new());
        let user = dir.register("Sari", "+6299").unwrap();
        let claims = user.claims();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.phone, "+6299");
        assert_eq!(claims.role, Role::User);
    }
}
