//! Authenticated principals.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ids::RecordId, wire};

/// Access role attached to a principal. Unknown or missing roles degrade to
/// [`Role::User`]; only an explicit (case-insensitive) `admin` unlocks the
/// operator surfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordinary customer.
    #[default]
    User,
    /// Platform operator.
    Admin,
}

impl Role {
    /// Parse a role string, case-insensitively, defaulting to `User`.
    #[must_use]
    pub fn parse_lossy(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }

    /// Uppercase form the identity service expects on registration.
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    /// Whether this role unlocks the admin surfaces.
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

/// The authenticated identity driving every ownership check.
///
/// Created from a login response, persisted for the session, destroyed on
/// logout. `id` is optional because some identity records only carry an
/// email; ownership matching falls back accordingly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// Backend identifier, when the identity service provided one.
    pub id: Option<RecordId>,
    /// Login email. May be blank for legacy records.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Access role.
    pub role: Role,
}

impl Principal {
    /// Canonicalize a login/profile response.
    ///
    /// The identity service has emitted ids under `id`/`_id`/`userId` and
    /// names under `name`/`fullName`/`username` across versions; this is the
    /// single place those spellings are resolved.
    #[must_use]
    pub fn from_wire(value: &Value) -> Self {
        let id = wire::id_at(value, &["id", "_id", "userId", "userid", "user_id"]);
        let name = wire::string_at(value, &["name", "fullName", "username"]).unwrap_or_default();
        let email = wire::string_at(value, &["email", "username"]).unwrap_or_default();

        let role =
            wire::string_at(value, &["role"]).map_or(Role::User, |raw| Role::parse_lossy(&raw));

        Self {
            id,
            email,
            name,
            role,
        }
    }

    /// Email in the lowercase form used for ownership comparison.
    #[must_use]
    pub fn email_normalized(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// Whether any owner key (id or email) is present. Order fetches need at
    /// least one of the two.
    #[must_use]
    pub fn has_identifier(&self) -> bool {
        self.id.is_some() || !self.email.trim().is_empty()
    }
}

/// A user row as the admin screens see it: a principal plus the contact
/// fields collected at registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Identity fields shared with [`Principal`].
    pub principal: Principal,
    /// Contact phone number. Blank when the backend omitted it.
    pub phone: String,
    /// Delivery address. Blank when the backend omitted it.
    pub address: String,
}

impl UserAccount {
    /// Canonicalize a user record from the admin listing.
    #[must_use]
    pub fn from_wire(value: &Value) -> Self {
        let phone =
            wire::string_at(value, &["phoneNumber", "phone", "mobileNo"]).unwrap_or_default();
        let address = wire::string_at(value, &["address"]).unwrap_or_default();

        Self {
            principal: Principal::from_wire(value),
            phone,
            address,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!(Role::parse_lossy("ADMIN"), Role::Admin);
        assert_eq!(Role::parse_lossy("Admin"), Role::Admin);
        assert_eq!(Role::parse_lossy("user"), Role::User);
        assert_eq!(Role::parse_lossy("driver"), Role::User);
    }

    #[test]
    fn wire_form_is_uppercase() {
        assert_eq!(Role::Admin.as_wire(), "ADMIN");
        assert_eq!(Role::User.as_wire(), "USER");
    }

    #[test]
    fn canonicalizes_alternate_field_names() {
        let principal = Principal::from_wire(&json!({
            "_id": "66f0a",
            "fullName": "Asha Rai",
            "username": "asha@example.com",
            "role": "ADMIN",
        }));

        assert_eq!(principal.id, RecordId::new("66f0a"));
        assert_eq!(principal.name, "Asha Rai");
        assert_eq!(principal.email, "asha@example.com");
        assert!(principal.role.is_admin());
    }

    #[test]
    fn missing_fields_degrade_gracefully() {
        let principal = Principal::from_wire(&json!({"id": 7}));

        assert_eq!(principal.id, Some(RecordId::from(7_i64)));
        assert_eq!(principal.email, "");
        assert_eq!(principal.role, Role::User);
        assert!(principal.has_identifier());
    }

    #[test]
    fn blank_identity_has_no_identifier() {
        let principal = Principal::from_wire(&json!({"name": "Guest"}));

        assert!(!principal.has_identifier());
    }

    #[test]
    fn user_account_picks_up_contact_fields() {
        let account = UserAccount::from_wire(&json!({
            "userId": 12,
            "name": "Bimal",
            "email": "bimal@example.com",
            "phoneNumber": "9815550000",
            "address": "Lakeside, Pokhara",
        }));

        assert_eq!(account.principal.id, Some(RecordId::from(12_i64)));
        assert_eq!(account.phone, "9815550000");
        assert_eq!(account.address, "Lakeside, Pokhara");
    }

    #[test]
    fn persisted_form_roundtrips() {
        let principal = Principal {
            id: Some(RecordId::from(7_i64)),
            email: "a@x.com".to_owned(),
            name: "A".to_owned(),
            role: Role::User,
        };

        let raw = serde_json::to_string(&principal).expect("serialize");
        let restored: Principal = serde_json::from_str(&raw).expect("deserialize");

        assert_eq!(restored, principal);
    }
}
