//! Review data shapes.

use foodiehub::RecordId;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A locally kept review of one menu item. Reviews never leave the client;
/// they live under per-item storage keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// The reviewed catalog entry.
    pub menu_id: RecordId,
    /// Display name of the reviewer.
    pub author: String,
    /// Star rating, clamped to 1..=5 on creation.
    pub rating: u8,
    /// Free-text comment.
    pub comment: String,
    /// When the review was written.
    pub written_at: Timestamp,
}

impl Review {
    /// Build a review, clamping the rating into 1..=5.
    #[must_use]
    pub fn new(
        menu_id: RecordId,
        author: impl Into<String>,
        rating: u8,
        comment: impl Into<String>,
        written_at: Timestamp,
    ) -> Self {
        Self {
            menu_id,
            author: author.into(),
            rating: rating.clamp(1, 5),
            comment: comment.into(),
            written_at,
        }
    }
}
