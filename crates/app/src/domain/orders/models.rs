//! Payment batch outcomes.

use foodiehub::RecordId;

/// How one order fared during a payment batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Ledger entry created and the source order flipped to COMPLETED.
    Settled,
    /// Ledger entry created but the status follow-up did not land; the
    /// order still reads PENDING until repair catches it.
    SettledUnconfirmed,
    /// The ledger POST itself failed; nothing changed for this order.
    Failed(String),
}

impl PaymentOutcome {
    /// Whether a ledger entry exists for the order.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled | Self::SettledUnconfirmed)
    }
}

/// One order's result within a [`PaymentSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentResult {
    /// The attempted order, when it carried an id.
    pub order_id: Option<RecordId>,
    /// What happened.
    pub outcome: PaymentOutcome,
}

/// Result of settling a batch of pending orders, in attempt order. Every
/// order is attempted exactly once; failures never abort the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentSummary {
    /// Per-order results.
    pub results: Vec<PaymentResult>,
}

impl PaymentSummary {
    /// Orders with a ledger entry.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.outcome.is_settled())
            .count()
    }

    /// Orders whose checkout failed outright.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}
