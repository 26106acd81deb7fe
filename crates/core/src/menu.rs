//! Menu catalog.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{ids::RecordId, wire};

/// Menu category. The fixed set mirrors the storefront sections; anything
/// else the menu service emits is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    /// Pizzas.
    Pizza,
    /// Burgers.
    Burger,
    /// Drinks.
    Drinks,
    /// Desserts.
    Dessert,
    /// Snacks and sides.
    Snacks,
    /// Any other category string, kept as received.
    Other(String),
}

impl Category {
    /// Parse a category string case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        match trimmed.to_ascii_uppercase().as_str() {
            "PIZZA" => Self::Pizza,
            "BURGER" => Self::Burger,
            "DRINKS" => Self::Drinks,
            "DESSERT" => Self::Dessert,
            "SNACKS" => Self::Snacks,
            _ => Self::Other(trimmed.to_owned()),
        }
    }

    /// Uppercase wire form used by the menu service.
    #[must_use]
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Pizza => "PIZZA",
            Self::Burger => "BURGER",
            Self::Drinks => "DRINKS",
            Self::Dessert => "DESSERT",
            Self::Snacks => "SNACKS",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        Ok(Self::parse(&raw))
    }
}

/// One catalog entry as the menu service describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Catalog identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Short description shown on cards.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Decimal,
    /// Image, either a URL or raw base64 depending on the backend revision.
    #[serde(default)]
    pub image: Option<String>,
    /// Storefront section.
    #[serde(default)]
    pub category: Option<Category>,
    /// Units sold, when the service reports it (admin statistics).
    #[serde(default)]
    pub sold: u32,
}

impl MenuItem {
    /// Canonicalize a menu record, normalizing the id spelling variants the
    /// menu service has used (`id`, `_id`, `menuid`, `menuId`).
    ///
    /// Returns `None` when no id can be resolved; such records cannot be
    /// edited, deleted or added to a cart and are dropped at the boundary.
    #[must_use]
    pub fn from_wire(value: &Value) -> Option<Self> {
        let id = wire::id_at(value, &["id", "_id", "menuid", "menuId"])?;

        Some(Self {
            id,
            name: wire::string_at(value, &["name", "title"]).unwrap_or_default(),
            description: wire::string_at(value, &["description"]).unwrap_or_default(),
            price: wire::amount_at(value, &["price"]).unwrap_or_default(),
            image: wire::string_at(value, &["image"]),
            category: wire::string_at(value, &["category"]).map(|raw| Category::parse(&raw)),
            sold: value
                .get("sold")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0),
        })
    }

    /// Whether the item matches a free-text search term (name and
    /// description, case-insensitive substring).
    #[must_use]
    pub fn matches_query(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();

        if term.is_empty() {
            return true;
        }

        let haystack = format!("{} {}", self.name, self.description).to_lowercase();

        haystack.contains(&term)
    }
}

/// Filter a catalog by optional category and free-text query, preserving
/// catalog order.
#[must_use]
pub fn filter<'a>(
    items: &'a [MenuItem],
    query: Option<&str>,
    category: Option<&Category>,
) -> Vec<&'a MenuItem> {
    items
        .iter()
        .filter(|item| category.is_none_or(|wanted| item.category.as_ref() == Some(wanted)))
        .filter(|item| query.is_none_or(|term| item.matches_query(term)))
        .collect()
}

/// Catalog revenue: `price * sold` summed over all items, the figure the
/// admin dashboard reports.
#[must_use]
pub fn catalog_revenue(items: &[MenuItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.price * Decimal::from(item.sold))
        .sum()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn item(id: i64, name: &str, description: &str, category: Category) -> MenuItem {
        MenuItem {
            id: RecordId::from(id),
            name: name.to_owned(),
            description: description.to_owned(),
            price: Decimal::from(500),
            image: None,
            category: Some(category),
            sold: 0,
        }
    }

    #[test]
    fn category_parse_is_case_insensitive_and_keeps_unknowns() {
        assert_eq!(Category::parse("pizza"), Category::Pizza);
        assert_eq!(Category::parse(" SNACKS "), Category::Snacks);
        assert_eq!(
            Category::parse("Momo"),
            Category::Other("Momo".to_owned())
        );
    }

    #[test]
    fn from_wire_resolves_alternate_id_spellings() {
        let item = MenuItem::from_wire(&json!({
            "menuId": 3,
            "name": "Cheeseburger",
            "price": 599,
            "category": "BURGER",
        }))
        .expect("menu item");

        assert_eq!(item.id, RecordId::from(3_i64));
        assert_eq!(item.category, Some(Category::Burger));
    }

    #[test]
    fn from_wire_drops_records_without_id() {
        assert!(MenuItem::from_wire(&json!({"name": "Mystery"})).is_none());
    }

    #[test]
    fn filter_applies_query_and_category() {
        let items = vec![
            item(1, "Margherita Pizza", "Classic cheese & tomato", Category::Pizza),
            item(2, "Cheeseburger", "Beef patty, cheese, lettuce", Category::Burger),
            item(3, "French Fries", "Crispy salted fries", Category::Snacks),
        ];

        let cheese = filter(&items, Some("cheese"), None);
        assert_eq!(cheese.len(), 2, "query matches name and description");

        let burgers = filter(&items, Some("cheese"), Some(&Category::Burger));
        assert_eq!(burgers.len(), 1);
        assert_eq!(burgers.first().map(|i| i.id.as_str()), Some("2"));

        assert_eq!(filter(&items, None, None).len(), 3);
    }

    #[test]
    fn revenue_sums_price_times_sold() {
        let mut items = vec![item(1, "A", "", Category::Pizza), item(2, "B", "", Category::Pizza)];
        if let Some(first) = items.get_mut(0) {
            first.sold = 3;
        }
        if let Some(second) = items.get_mut(1) {
            second.sold = 1;
        }

        assert_eq!(catalog_revenue(&items), Decimal::from(2000));
    }
}
