//! Menu admin data shapes.

use foodiehub::{RecordId, menu::Category};
use rust_decimal::Decimal;
use serde_json::{Value, json};

/// A catalog entry as edited on the admin screen. `id` is `None` for a new
/// item and set when editing an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemDraft {
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Option<Category>,
    /// Base64-encoded image payload, when one was picked.
    pub image: Option<String>,
}

impl MenuItemDraft {
    pub(crate) fn to_wire(&self) -> Value {
        let mut payload = json!({
            "name": self.name,
            "description": self.description,
            "price": self.price,
        });

        if let Some(category) = &self.category {
            payload["category"] = Value::from(category.as_wire());
        }
        if let Some(image) = &self.image {
            payload["image"] = Value::from(image.clone());
        }

        // Update payloads repeat the id under every spelling deployed
        // backend revisions have keyed on.
        if let Some(id) = &self.id {
            payload["id"] = Value::from(id.as_str());
            payload["menuid"] = Value::from(id.as_str());
            payload["menuId"] = Value::from(id.as_str());
        }

        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_payload_repeats_the_id_under_alternate_keys() {
        let draft = MenuItemDraft {
            id: RecordId::new("31"),
            name: "Margherita Pizza".to_owned(),
            description: "Classic".to_owned(),
            price: Decimal::from(799),
            category: Some(Category::Pizza),
            image: None,
        };

        let wire = draft.to_wire();

        assert_eq!(wire["id"], "31");
        assert_eq!(wire["menuid"], "31");
        assert_eq!(wire["menuId"], "31");
        assert_eq!(wire["category"], "PIZZA");
    }

    #[test]
    fn new_item_payload_carries_no_id() {
        let draft = MenuItemDraft {
            id: None,
            name: "Halloumi Wrap".to_owned(),
            description: String::new(),
            price: Decimal::from(450),
            category: None,
            image: Some("aGk=".to_owned()),
        };

        let wire = draft.to_wire();

        assert!(wire.get("id").is_none());
        assert_eq!(wire["image"], "aGk=");
    }
}
