//! Local review lists.
//!
//! A legacy client-only feature: reviews are appended to a per-item list in
//! local storage and never synced to a backend.

use foodiehub::RecordId;
use mockall::automock;

use crate::{
    domain::reviews::models::Review,
    storage::{LocalStore, StorageError},
};

fn key_for(menu_id: &RecordId) -> String {
    format!("reviews:{menu_id}")
}

/// Review service over the [`LocalStore`].
pub struct LocalReviewsService {
    store: LocalStore,
}

impl LocalReviewsService {
    #[must_use]
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }
}

impl ReviewsService for LocalReviewsService {
    fn reviews_for(&self, menu_id: &RecordId) -> Vec<Review> {
        self.store.get(&key_for(menu_id)).unwrap_or_default()
    }

    fn add_review(&self, review: Review) -> Result<(), StorageError> {
        let mut reviews = self.reviews_for(&review.menu_id);
        let key = key_for(&review.menu_id);

        reviews.push(review);
        self.store.set(&key, &reviews)
    }
}

/// Per-item review lists, oldest first.
#[automock]
pub trait ReviewsService: Send + Sync {
    /// All reviews of one menu item. Corrupt stored lists read as empty.
    fn reviews_for(&self, menu_id: &RecordId) -> Vec<Review>;

    /// Append a review to its item's list.
    fn add_review(&self, review: Review) -> Result<(), StorageError>;
}
