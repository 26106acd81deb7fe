//! Canonical order, payment and driver records.
//!
//! The backend services disagree on field names, casing and even value types
//! for the same records. All of that tolerance lives here: the `from_wire`
//! constructors accept every shape the services have been observed to send
//! and produce one typed record, so nothing downstream ever touches raw JSON.
//! Outbound payloads (`OrderDraft`, `PaymentDraft`) pin the exact wire
//! spelling the order service expects.

pub mod ownership;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::{
    cart::CartLine,
    ids::RecordId,
    menu::MenuItem,
    principal::Principal,
    wire,
};

/// Lifecycle state of an order as reported by the ledger.
///
/// Only `PENDING` and `COMPLETED` carry meaning for the client; anything
/// else the services send is kept verbatim so it still displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    /// Placed but not yet paid.
    Pending,
    /// Paid and settled.
    Completed,
    /// Any other status string, surfaced verbatim.
    Other(String),
}

impl OrderStatus {
    /// Parse a wire status. A blank value means the ledger never set one,
    /// which has always been treated as pending.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Self::Pending;
        }

        match trimmed.to_ascii_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "COMPLETED" => Self::Completed,
            _ => Self::Other(trimmed.to_owned()),
        }
    }

    /// Whether the order still awaits payment. The services spell pending
    /// loosely ("Payment Pending", "pending_confirmation"), so any status
    /// containing the word counts.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        match self {
            Self::Pending => true,
            Self::Completed => false,
            Self::Other(raw) => raw.to_lowercase().contains("pending"),
        }
    }

    /// The spelling sent back to the services.
    #[must_use]
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        Ok(Self::parse(&raw))
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Availability state of a delivery driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverStatus {
    /// Free to take an order.
    Available,
    /// Currently delivering.
    OnDelivery,
    /// Any other roster state, surfaced verbatim.
    Other(String),
}

impl DriverStatus {
    /// Parse a wire status, normalizing case and the space/hyphen/underscore
    /// spellings of "on delivery".
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let normalized = trimmed.to_ascii_uppercase().replace([' ', '-'], "_");

        match normalized.as_str() {
            "AVAILABLE" => Self::Available,
            "ON_DELIVERY" => Self::OnDelivery,
            _ => Self::Other(trimmed.to_owned()),
        }
    }

    /// Whether the driver can be assigned.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// The spelling sent back to the driver service.
    #[must_use]
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Available => "AVAILABLE",
            Self::OnDelivery => "ON_DELIVERY",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl Serialize for DriverStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for DriverStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        Ok(Self::parse(&raw))
    }
}

/// An immutable copy of one ordered line, captured at order-creation time.
/// It deliberately does not track later catalog price changes.
///
/// Serializes with the order service's field spelling (`id`, `name`,
/// `price`, `qty`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSnapshot {
    /// Catalog id of the ordered product.
    #[serde(rename = "id")]
    pub menu_id: RecordId,
    /// Product name at order time.
    pub name: String,
    /// Unit price at order time.
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    /// Ordered quantity.
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl LineSnapshot {
    /// Read a snapshot out of a wire item record.
    ///
    /// Lines with no recognizable product id are dropped; every other field
    /// falls back to a neutral default, matching how forgiving the order
    /// service is about its own payloads.
    #[must_use]
    pub fn from_wire(value: &Value) -> Option<Self> {
        let menu_id = wire::id_at(value, &["id", "menuId", "menu_id", "itemId", "productId"])?;
        let name =
            wire::string_at(value, &["name", "title", "itemName"]).unwrap_or_default();
        let unit_price =
            wire::amount_at(value, &["price", "itemPrice", "unit_price"]).unwrap_or_default();
        let quantity = wire::qty_at(value, &["qty", "quantity"]);

        Some(Self { menu_id, name, unit_price, quantity })
    }

    /// Price for this snapshot line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

impl From<&CartLine> for LineSnapshot {
    fn from(line: &CartLine) -> Self {
        Self {
            menu_id: line.menu_id.clone(),
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
        }
    }
}

// The order service stores `items` as an opaque string, so drafts must send
// the snapshot list JSON-encoded inside the JSON body.
fn items_as_json_string<S: Serializer>(
    items: &[LineSnapshot],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let raw = serde_json::to_string(items).map_err(serde::ser::Error::custom)?;

    serializer.serialize_str(&raw)
}

fn items_from_wire(value: Option<&Value>) -> Vec<LineSnapshot> {
    match value {
        Some(Value::Array(entries)) => {
            entries.iter().filter_map(LineSnapshot::from_wire).collect()
        }
        // A JSON-encoded string is the shape our own drafts write.
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(entries)) => {
                entries.iter().filter_map(LineSnapshot::from_wire).collect()
            }
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// The payload POSTed to the order service when a product is added to the
/// cart. Covers only the quantity added by that call, not the merged line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDraft {
    /// Owner of the order, when the principal carries an id.
    #[serde(rename = "userId")]
    pub user_ref: Option<RecordId>,
    /// Display name for the order.
    #[serde(rename = "customerName")]
    pub customer_name: String,
    /// Contact email, doubling as the fallback ownership key.
    #[serde(rename = "customerEmail")]
    pub customer_email: String,
    /// Always `PENDING` for a fresh submission.
    pub status: OrderStatus,
    /// Unit price times the added quantity.
    #[serde(rename = "totalAmount")]
    pub total_amount: Decimal,
    /// Client-side submission time.
    #[serde(rename = "orderDate")]
    pub order_date: Timestamp,
    /// The added line, JSON-encoded as a string on the wire.
    #[serde(serialize_with = "items_as_json_string")]
    pub items: Vec<LineSnapshot>,
}

impl OrderDraft {
    /// Build the submission for adding `quantity` units of `item` on behalf
    /// of `principal`. A principal with no name falls back to "Guest".
    #[must_use]
    pub fn for_added_item(
        principal: &Principal,
        item: &MenuItem,
        quantity: u32,
        order_date: Timestamp,
    ) -> Self {
        let customer_name = if principal.name.trim().is_empty() {
            "Guest".to_owned()
        } else {
            principal.name.clone()
        };

        let snapshot = LineSnapshot {
            menu_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity,
        };

        Self {
            user_ref: principal.id.clone(),
            customer_name,
            customer_email: principal.email.clone(),
            status: OrderStatus::Pending,
            total_amount: item.price * Decimal::from(quantity),
            order_date,
            items: vec![snapshot],
        }
    }
}

/// The payload POSTed to the payment ledger at checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentDraft {
    /// Client-generated ledger id.
    #[serde(rename = "paymentId")]
    pub payment_id: RecordId,
    /// The order being settled, when it carries an id.
    #[serde(rename = "orderId", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<RecordId>,
    /// Owner of the order.
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_ref: Option<RecordId>,
    /// Customer display name.
    #[serde(rename = "customerName", skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Customer email.
    #[serde(rename = "customerEmail", skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Always `COMPLETED` on the ledger.
    pub status: OrderStatus,
    /// Settled amount.
    #[serde(rename = "totalAmount")]
    pub total_amount: Decimal,
    /// Settlement time.
    #[serde(rename = "paymentDate")]
    pub paid_at: Timestamp,
    /// Snapshot lines, JSON-encoded as a string on the wire.
    #[serde(serialize_with = "items_as_json_string")]
    pub items: Vec<LineSnapshot>,
}

impl PaymentDraft {
    /// Build the ledger entry for settling `order`. The amount is the
    /// order's stored total when present, otherwise recomputed from its
    /// line snapshots.
    #[must_use]
    pub fn from_order(order: &OrderRecord, payment_id: RecordId, paid_at: Timestamp) -> Self {
        Self {
            payment_id,
            order_id: order.order_id.clone(),
            user_ref: order.user_ref.clone(),
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            status: OrderStatus::Completed,
            total_amount: order.total(),
            paid_at,
            items: order.items.clone(),
        }
    }
}

/// Driver identity and contact fields as merged onto an order view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DriverContact {
    /// Roster id of the driver, when known.
    pub id: Option<RecordId>,
    /// Driver name.
    pub name: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Vehicle registration.
    pub vehicle: Option<String>,
    /// Vehicle kind (bike, car, ...).
    pub vehicle_type: Option<String>,
}

impl DriverContact {
    fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.name.is_none()
            && self.phone.is_none()
            && self.vehicle.is_none()
            && self.vehicle_type.is_none()
    }
}

/// The assignment record the order service keeps per order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DriverAssignment {
    /// The assigned order.
    pub order_ref: Option<RecordId>,
    /// The assigned driver.
    pub driver_id: Option<RecordId>,
    /// Driver name as recorded on the assignment.
    pub driver_name: Option<String>,
    /// Driver phone as recorded on the assignment.
    pub driver_phone: Option<String>,
    /// Vehicle registration as recorded on the assignment.
    pub driver_vehicle: Option<String>,
    /// Vehicle kind as recorded on the assignment.
    pub driver_vehicle_type: Option<String>,
}

impl DriverAssignment {
    /// Read an assignment out of a wire record.
    #[must_use]
    pub fn from_wire(value: &Value) -> Self {
        Self {
            order_ref: wire::id_at(value, &["orderId", "order_id", "orderRef"]),
            driver_id: wire::id_at(value, &["driverId", "driver_id", "driverRef"]),
            driver_name: wire::string_at(value, &["driverName", "name", "driver.name"]),
            driver_phone: wire::string_at(
                value,
                &["driverPhone", "phoneNumber", "phone", "driver.phone"],
            ),
            driver_vehicle: wire::string_at(
                value,
                &["driverVehicle", "vehicleNumber", "vehicle", "vehicleNo"],
            ),
            driver_vehicle_type: wire::string_at(
                value,
                &["driverVehicleType", "vehicleType", "vehicle_type"],
            ),
        }
    }

    /// Whether the record actually names a driver.
    #[must_use]
    pub fn has_driver(&self) -> bool {
        self.driver_id.is_some()
    }

    /// The contact fields to merge onto the order view, or `None` when the
    /// record carries nothing worth merging.
    #[must_use]
    pub fn contact(&self) -> Option<DriverContact> {
        let contact = DriverContact {
            id: self.driver_id.clone(),
            name: self.driver_name.clone(),
            phone: self.driver_phone.clone(),
            vehicle: self.driver_vehicle.clone(),
            vehicle_type: self.driver_vehicle_type.clone(),
        };

        if contact.is_empty() { None } else { Some(contact) }
    }
}

/// A delivery driver on the roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    /// Roster id.
    pub id: RecordId,
    /// Driver name.
    pub name: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Vehicle registration.
    pub vehicle: Option<String>,
    /// Vehicle kind.
    pub vehicle_type: Option<String>,
    /// Availability state.
    pub status: DriverStatus,
}

impl Driver {
    /// Read a driver out of a wire record. Records with no id cannot be
    /// assigned and are dropped.
    #[must_use]
    pub fn from_wire(value: &Value) -> Option<Self> {
        let id = wire::id_at(value, &["id", "_id", "driverId", "driver_id"])?;
        let name = wire::string_at(value, &["name", "driverName", "firstName", "fullName"])
            .unwrap_or_default();
        let phone = wire::string_at(value, &["phoneNumber", "phone", "mobileNo"]);
        let vehicle = wire::string_at(value, &["vehicleNumber", "vehicle", "vehicleNo"]);
        let vehicle_type = wire::string_at(value, &["vehicleType", "vehicle_type"]);
        let status = wire::string_at(value, &["status", "driverStatus"])
            .map_or(DriverStatus::Other(String::new()), |raw| DriverStatus::parse(&raw));

        Some(Self { id, name, phone, vehicle, vehicle_type, status })
    }

    /// Contact view of this driver, for merging onto orders.
    #[must_use]
    pub fn contact(&self) -> DriverContact {
        DriverContact {
            id: Some(self.id.clone()),
            name: Some(self.name.clone()),
            phone: self.phone.clone(),
            vehicle: self.vehicle.clone(),
            vehicle_type: self.vehicle_type.clone(),
        }
    }
}

/// A remote-owned order, canonicalized from whatever the order service sent.
///
/// Every field the services have been seen to omit is optional; the record
/// itself is never dropped during canonicalization. Keeping records the
/// principal does not own out of view is [`ownership`]'s job.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderRecord {
    /// Ledger id of the order.
    pub order_id: Option<RecordId>,
    /// Owning user id, when the service recorded one.
    pub user_ref: Option<RecordId>,
    /// Customer display name.
    pub customer_name: Option<String>,
    /// Customer email, the fallback ownership key.
    pub customer_email: Option<String>,
    /// Lifecycle state.
    pub status: OrderStatus,
    /// Stored total, absent on some older records.
    pub total_amount: Option<Decimal>,
    /// Creation time.
    pub order_date: Option<Timestamp>,
    /// Ordered lines.
    pub items: Vec<LineSnapshot>,
    /// Driver contact merged on by assignment enrichment.
    pub assigned_driver: Option<DriverContact>,
}

impl OrderRecord {
    /// Canonicalize a wire order record.
    ///
    /// `items` may arrive as a JSON array or as a JSON-encoded string (the
    /// shape our own submissions write); both decode. An unparseable items
    /// value yields an empty line list rather than an error.
    #[must_use]
    pub fn from_wire(value: &Value) -> Self {
        let assigned_driver = DriverAssignment::from_wire(value).contact().or_else(|| {
            let embedded = DriverContact {
                id: wire::id_at(value, &["assignedDriverId", "assigned_driver_id"]),
                name: wire::string_at(value, &["assignedDriverName"]),
                phone: wire::string_at(value, &["assignedDriverPhone"]),
                vehicle: wire::string_at(value, &["assignedDriverVehicle"]),
                vehicle_type: wire::string_at(value, &["assignedDriverVehicleType"]),
            };

            if embedded.is_empty() { None } else { Some(embedded) }
        });

        Self {
            order_id: wire::id_at(value, &["orderId", "id", "_id", "order_id"]),
            user_ref: wire::id_at(
                value,
                &["user_id", "userId", "user", "customerId", "customer_id", "userid"],
            ),
            customer_name: wire::string_at(
                value,
                &["customerName", "customer_name", "customer.name"],
            ),
            customer_email: wire::string_at(
                value,
                &["customerEmail", "customer_email", "email", "customer.email"],
            ),
            status: wire::string_at(value, &["status", "order_status", "paymentStatus"])
                .map_or(OrderStatus::Pending, |raw| OrderStatus::parse(&raw)),
            total_amount: wire::amount_at(value, &["totalAmount", "total_amount", "total", "amount"]),
            order_date: wire::timestamp_at(
                value,
                &["orderDate", "order_date", "createdAt", "created_at", "paymentDate"],
            ),
            items: items_from_wire(wire::lookup(value, "items")),
            assigned_driver,
        }
    }

    /// The order total: the stored amount when present, otherwise the sum
    /// of the line snapshots.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total_amount
            .unwrap_or_else(|| self.items.iter().map(LineSnapshot::line_total).sum())
    }

    /// Whether the order belongs in the pending view.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// The assigned driver's id, when enrichment found one. Unassignment
    /// needs this to release the right driver.
    #[must_use]
    pub fn driver_id(&self) -> Option<&RecordId> {
        self.assigned_driver.as_ref().and_then(|driver| driver.id.as_ref())
    }

    /// Case-insensitive substring match over id, customer name and email,
    /// for the admin search box.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();

        if needle.is_empty() {
            return true;
        }

        let id_hit = self
            .order_id
            .as_ref()
            .is_some_and(|id| id.as_str().to_lowercase().contains(&needle));
        let name_hit = self
            .customer_name
            .as_ref()
            .is_some_and(|name| name.to_lowercase().contains(&needle));
        let email_hit = self
            .customer_email
            .as_ref()
            .is_some_and(|email| email.to_lowercase().contains(&needle));

        id_hit || name_hit || email_hit
    }
}

/// An append-only payment-ledger entry, canonicalized like [`OrderRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaidOrderRecord {
    /// Ledger id of the payment.
    pub payment_id: Option<RecordId>,
    /// The settled order.
    pub order_id: Option<RecordId>,
    /// Owning user id.
    pub user_ref: Option<RecordId>,
    /// Customer display name.
    pub customer_name: Option<String>,
    /// Customer email.
    pub customer_email: Option<String>,
    /// Ledger status; a record that omits one is settled by definition.
    pub status: OrderStatus,
    /// Settled amount.
    pub total_amount: Option<Decimal>,
    /// Settlement time.
    pub paid_at: Option<Timestamp>,
    /// Snapshot lines.
    pub items: Vec<LineSnapshot>,
}

impl PaidOrderRecord {
    /// Canonicalize a wire ledger entry.
    #[must_use]
    pub fn from_wire(value: &Value) -> Self {
        Self {
            payment_id: wire::id_at(value, &["paymentId", "payment_id"]),
            order_id: wire::id_at(value, &["orderId", "id", "_id", "order_id"]),
            user_ref: wire::id_at(value, &["userId", "user_id", "userid"]),
            customer_name: wire::string_at(value, &["customerName", "name"]),
            customer_email: wire::string_at(value, &["customerEmail", "email"]),
            status: wire::string_at(value, &["status", "order_status", "paymentStatus"])
                .map_or(OrderStatus::Completed, |raw| OrderStatus::parse(&raw)),
            total_amount: wire::amount_at(
                value,
                &["totalAmount", "total_amount", "total", "amount"],
            ),
            paid_at: wire::timestamp_at(
                value,
                &["orderDate", "createdAt", "paymentDate", "date", "paid_at"],
            ),
            items: items_from_wire(wire::lookup(value, "items")),
        }
    }

    /// The key the ledger entry is selected by: payment id, falling back to
    /// the order id.
    #[must_use]
    pub fn ledger_key(&self) -> Option<&RecordId> {
        self.payment_id.as_ref().or(self.order_id.as_ref())
    }

    /// Settled amount, recomputed from snapshots when the stored total is
    /// absent.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total_amount
            .unwrap_or_else(|| self.items.iter().map(LineSnapshot::line_total).sum())
    }
}
