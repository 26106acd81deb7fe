//! Cart state.
//!
//! The working selection of products before they become orders. One line per
//! distinct menu item (merge-on-add), insertion order preserved, quantities
//! never below one. The cart is purely local state; order submission and
//! persistence are the app layer's concern.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ids::RecordId, menu::MenuItem};

/// Clamp a requested quantity to the cart invariant: an integer of at
/// least 1. Zero, negative and absurd values all collapse to sane bounds.
#[must_use]
pub fn clamp_qty(qty: i64) -> u32 {
    if qty < 1 {
        1
    } else {
        u32::try_from(qty).unwrap_or(u32::MAX)
    }
}

/// One product-plus-quantity entry in the pre-checkout selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog identifier of the product.
    pub menu_id: RecordId,
    /// Product name at the time of adding.
    pub name: String,
    /// Unit price at the time of adding.
    pub unit_price: Decimal,
    /// Selected quantity, always ≥ 1.
    pub quantity: u32,
    /// Product image reference, carried for display.
    #[serde(default)]
    pub image: Option<String>,
}

impl CartLine {
    /// Price for this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The authenticated user's working cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted lines (e.g. after a reload).
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// Add `qty` units of `item`.
    ///
    /// The quantity is clamped to ≥ 1. If a line for the item already
    /// exists its quantity is incremented; otherwise a new line is appended,
    /// keeping insertion order. Returns the applied quantity so callers can
    /// build the matching order snapshot.
    pub fn add(&mut self, item: &MenuItem, qty: i64) -> u32 {
        let qty = clamp_qty(qty);

        if let Some(line) = self.lines.iter_mut().find(|line| line.menu_id == item.id) {
            line.quantity = line.quantity.saturating_add(qty);
        } else {
            self.lines.push(CartLine {
                menu_id: item.id.clone(),
                name: item.name.clone(),
                unit_price: item.price,
                quantity: qty,
                image: item.image.clone(),
            });
        }

        qty
    }

    /// Remove the line for `menu_id`. A missing line is a no-op; removal is
    /// idempotent.
    pub fn remove(&mut self, menu_id: &RecordId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.menu_id != menu_id);

        self.lines.len() != before
    }

    /// Set the quantity of an existing line directly (no merge), clamped
    /// to ≥ 1. Returns `false` when no such line exists.
    pub fn change_qty(&mut self, menu_id: &RecordId, qty: i64) -> bool {
        match self.lines.iter_mut().find(|line| &line.menu_id == menu_id) {
            Some(line) => {
                line.quantity = clamp_qty(qty);
                true
            }
            None => false,
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
