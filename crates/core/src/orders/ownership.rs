//! Order ownership resolution.
//!
//! An order belongs to a principal when its `user_ref` equals the
//! principal's id, or when its customer email equals the principal's email
//! case-insensitively. Both keys are sufficient on their own; neither takes
//! precedence. The backends have been seen to return over-broad result
//! sets, so the client filters defensively after every fetch.

use crate::{orders::OrderRecord, principal::Principal};

/// Id-key match: both sides carry an id and they compare equal.
#[must_use]
pub fn match_by_id(record: &OrderRecord, principal: &Principal) -> bool {
    match (&record.user_ref, &principal.id) {
        (Some(user_ref), Some(id)) => user_ref == id,
        _ => false,
    }
}

/// Email-key match: both sides carry a non-blank email and they compare
/// equal after trimming and lowercasing.
#[must_use]
pub fn match_by_email(record: &OrderRecord, principal: &Principal) -> bool {
    let principal_email = principal.email_normalized();

    if principal_email.is_empty() {
        return false;
    }

    record
        .customer_email
        .as_ref()
        .map(|email| email.trim().to_lowercase())
        .is_some_and(|email| !email.is_empty() && email == principal_email)
}

/// Whether `record` belongs to `principal` under either key.
#[must_use]
pub fn owned_by(record: &OrderRecord, principal: &Principal) -> bool {
    match_by_id(record, principal) || match_by_email(record, principal)
}

/// Keep only the records owned by `principal`, preserving order.
#[must_use]
pub fn filter_owned(records: Vec<OrderRecord>, principal: &Principal) -> Vec<OrderRecord> {
    records
        .into_iter()
        .filter(|record| owned_by(record, principal))
        .collect()
}
