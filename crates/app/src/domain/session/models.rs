//! Session data shapes.

use foodiehub::Role;
use serde_json::{Map, Value, json};

/// Data collected by the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub role: Role,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
}

impl Registration {
    /// Registration payload in the spelling the identity service expects.
    /// The role travels uppercase.
    pub(crate) fn to_wire(&self) -> Value {
        json!({
            "role": self.role.as_wire(),
            "name": self.name,
            "email": self.email,
            "password": self.password,
            "phoneNumber": self.phone,
            "address": self.address,
        })
    }
}

/// Partial profile edit; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ProfileUpdate {
    pub(crate) fn to_wire(&self) -> Value {
        let mut payload = Map::new();

        if let Some(name) = &self.name {
            payload.insert("name".to_owned(), Value::from(name.clone()));
        }
        if let Some(phone) = &self.phone {
            payload.insert("phoneNumber".to_owned(), Value::from(phone.clone()));
        }
        if let Some(address) = &self.address {
            payload.insert("address".to_owned(), Value::from(address.clone()));
        }

        Value::Object(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_wire_payload_uses_backend_spellings() {
        let registration = Registration {
            role: Role::Admin,
            name: "Asha".to_owned(),
            email: "asha@example.com".to_owned(),
            password: "secret".to_owned(),
            phone: "9815550000".to_owned(),
            address: "Lakeside".to_owned(),
        };

        let wire = registration.to_wire();

        assert_eq!(wire["role"], "ADMIN");
        assert_eq!(wire["phoneNumber"], "9815550000");
        assert_eq!(wire["address"], "Lakeside");
    }

    #[test]
    fn profile_update_omits_unset_fields() {
        let update = ProfileUpdate {
            name: Some("New Name".to_owned()),
            ..ProfileUpdate::default()
        };

        let wire = update.to_wire();

        assert_eq!(wire["name"], "New Name");
        assert!(wire.get("phoneNumber").is_none());
        assert!(wire.get("address").is_none());
    }
}
