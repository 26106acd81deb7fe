//! Test Helpers

use foodiehub::{MenuItem, Principal, RecordId, Role};
use rust_decimal::Decimal;
use tempfile::TempDir;

use crate::storage::{LocalStore, StorageError};

/// A logged-in customer principal with both ownership keys present.
pub(crate) fn guest() -> Principal {
    Principal {
        id: Some(RecordId::from(7_i64)),
        email: "a@x.com".to_owned(),
        name: "Ayesha".to_owned(),
        role: Role::User,
    }
}

/// A minimal catalog entry.
pub(crate) fn menu_item(id: i64, name: &str, price: i64) -> MenuItem {
    MenuItem {
        id: RecordId::from(id),
        name: name.to_owned(),
        description: String::new(),
        price: Decimal::from(price),
        image: None,
        category: None,
        sold: 0,
    }
}

/// A [`LocalStore`] over a fresh temporary directory. The directory guard
/// must stay alive for the store's lifetime.
pub(crate) fn temp_store() -> Result<(TempDir, LocalStore), StorageError> {
    let dir = tempfile::tempdir()?;
    let store = LocalStore::open(dir.path())?;

    Ok((dir, store))
}
