//! Cart service: the working selection, persisted locally, submitted remotely.
//!
//! The cart itself is client-local state (`foodiehub::Cart`) round-tripped to
//! the [`LocalStore`] on every mutation so a restart restores it. Each `add`
//! additionally enqueues a fire-and-forget order submission; delivery failures
//! land on the submitter's ledger and never roll the cart back.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use foodiehub::{Cart, CartLine, MenuItem, RecordId, orders::OrderDraft};
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    domain::{
        carts::{
            CartsServiceError,
            submitter::{OrderSubmitter, SubmissionRecord},
        },
        session::SessionService,
    },
    storage::LocalStore,
};

/// Storage key holding the persisted cart lines.
const CART_KEY: &str = "cart";

/// Cart service over a [`LocalStore`] and the background [`OrderSubmitter`].
pub struct LocalCartsService {
    store: LocalStore,
    session: Arc<dyn SessionService>,
    submitter: OrderSubmitter,
    cart: Mutex<Cart>,
}

impl LocalCartsService {
    /// Build the service, restoring any persisted cart. A corrupt or missing
    /// stored value reads as an empty cart.
    #[must_use]
    pub fn new(
        store: LocalStore,
        session: Arc<dyn SessionService>,
        submitter: OrderSubmitter,
    ) -> Self {
        let lines: Vec<CartLine> = store.get(CART_KEY).unwrap_or_default();

        Self {
            store,
            session,
            submitter,
            cart: Mutex::new(Cart::from_lines(lines)),
        }
    }

    fn persist(&self, cart: &Cart) -> Result<(), CartsServiceError> {
        self.store.set(CART_KEY, &cart.lines())?;
        Ok(())
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, Cart> {
        self.cart.lock().expect("cart state poisoned")
    }
}

#[async_trait]
impl CartsService for LocalCartsService {
    #[tracing::instrument(name = "cart.add", skip(self, item), fields(menu_id = %item.id), err)]
    fn add(&self, item: &MenuItem, qty: i64) -> Result<u32, CartsServiceError> {
        let principal = self
            .session
            .current()
            .ok_or(CartsServiceError::NotLoggedIn)?;

        let mut cart = self.locked();
        let applied = cart.add(item, qty);
        self.persist(&cart)?;
        drop(cart);

        // The remote submission is fire-and-forget: the cart mutation above
        // stands regardless of how delivery goes.
        let draft = OrderDraft::for_added_item(&principal, item, applied, Timestamp::now());
        let seq = self.submitter.enqueue(draft);

        info!(seq, qty = applied, "cart line added, submission queued");

        Ok(applied)
    }

    fn remove(&self, menu_id: &RecordId) -> Result<bool, CartsServiceError> {
        let mut cart = self.locked();
        let removed = cart.remove(menu_id);
        self.persist(&cart)?;

        Ok(removed)
    }

    fn change_qty(&self, menu_id: &RecordId, qty: i64) -> Result<bool, CartsServiceError> {
        let mut cart = self.locked();
        let changed = cart.change_qty(menu_id, qty);
        self.persist(&cart)?;

        Ok(changed)
    }

    fn clear(&self) -> Result<(), CartsServiceError> {
        let mut cart = self.locked();
        cart.clear();
        self.persist(&cart)
    }

    fn lines(&self) -> Vec<CartLine> {
        self.locked().lines().to_vec()
    }

    fn subtotal(&self) -> Decimal {
        self.locked().subtotal()
    }

    fn submissions(&self) -> Vec<SubmissionRecord> {
        self.submitter.submissions()
    }

    async fn flush(&self) -> Vec<SubmissionRecord> {
        self.submitter.drain().await
    }
}

/// The authenticated user's working cart and its submission ledger.
#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Add `qty` units (clamped to ≥ 1) of `item`, merging into an existing
    /// line, and queue the matching order submission. Returns the applied
    /// quantity.
    fn add(&self, item: &MenuItem, qty: i64) -> Result<u32, CartsServiceError>;

    /// Remove the line for `menu_id`; `false` when there was none.
    fn remove(&self, menu_id: &RecordId) -> Result<bool, CartsServiceError>;

    /// Set a line's quantity directly (clamped to ≥ 1, no merge); `false`
    /// when there is no such line.
    fn change_qty(&self, menu_id: &RecordId, qty: i64) -> Result<bool, CartsServiceError>;

    /// Empty the cart.
    fn clear(&self) -> Result<(), CartsServiceError>;

    /// The lines, in insertion order.
    fn lines(&self) -> Vec<CartLine>;

    /// Sum of all line totals.
    fn subtotal(&self) -> Decimal;

    /// Snapshot of this session's order submissions.
    fn submissions(&self) -> Vec<SubmissionRecord>;

    /// Wait for queued submissions to settle and return the ledger.
    async fn flush(&self) -> Vec<SubmissionRecord>;
}

#[cfg(test)]
mod tests {
    use foodiehub::Principal;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        clients::MockOrdersApi,
        domain::{carts::submitter::SubmissionStatus, session::MockSessionService},
        test::helpers::{guest, menu_item, temp_store},
    };

    use super::*;

    fn logged_in_session(principal: Principal) -> Arc<dyn SessionService> {
        let mut session = MockSessionService::new();
        session
            .expect_current()
            .returning(move || Some(principal.clone()));

        Arc::new(session)
    }

    fn delivering_submitter() -> OrderSubmitter {
        let mut api = MockOrdersApi::new();
        api.expect_submit_order().returning(|_| Ok(()));

        OrderSubmitter::spawn(Arc::new(api))
    }

    #[tokio::test]
    async fn adds_merge_and_persist_across_restarts() -> TestResult {
        let (_dir, store) = temp_store()?;
        let session = logged_in_session(guest());

        let service = LocalCartsService::new(
            store.clone(),
            Arc::clone(&session),
            delivering_submitter(),
        );

        service.add(&menu_item(101, "Cheeseburger", 500), 2)?;
        service.add(&menu_item(102, "French Fries", 220), 1)?;
        service.add(&menu_item(101, "Cheeseburger", 500), 3)?;

        assert_eq!(service.lines().len(), 2, "one line per product");
        assert_eq!(service.subtotal(), Decimal::from(2720));

        // A fresh service over the same store restores the cart.
        let restored = LocalCartsService::new(store, session, delivering_submitter());
        assert_eq!(restored.lines(), service.lines());

        Ok(())
    }

    #[tokio::test]
    async fn add_queues_submission_with_the_added_quantity_total() -> TestResult {
        let (_dir, store) = temp_store()?;

        let service =
            LocalCartsService::new(store, logged_in_session(guest()), delivering_submitter());

        service.add(&menu_item(101, "Cheeseburger", 500), 2)?;

        let ledger = service.flush().await;

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].status, SubmissionStatus::Sent);
        assert_eq!(ledger[0].draft.total_amount, Decimal::from(1000));

        Ok(())
    }

    #[tokio::test]
    async fn failed_submission_leaves_the_cart_intact() -> TestResult {
        let (_dir, store) = temp_store()?;

        let mut api = MockOrdersApi::new();
        api.expect_submit_order().returning(|_| {
            Err(crate::clients::ApiError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                message: "down".to_owned(),
            })
        });

        let service = LocalCartsService::new(
            store,
            logged_in_session(guest()),
            OrderSubmitter::spawn(Arc::new(api)),
        );

        service.add(&menu_item(101, "Cheeseburger", 500), 2)?;
        let ledger = service.flush().await;

        assert!(
            matches!(ledger[0].status, SubmissionStatus::Failed(_)),
            "submission recorded as failed"
        );
        assert_eq!(service.lines().len(), 1, "local cart keeps the line");

        Ok(())
    }

    #[tokio::test]
    async fn add_without_session_is_rejected() -> TestResult {
        let (_dir, store) = temp_store()?;

        let mut session = MockSessionService::new();
        session.expect_current().returning(|| None);

        let service =
            LocalCartsService::new(store, Arc::new(session), delivering_submitter());

        let result = service.add(&menu_item(101, "Cheeseburger", 500), 1);

        assert!(
            matches!(result, Err(CartsServiceError::NotLoggedIn)),
            "expected NotLoggedIn, got {result:?}"
        );
        assert!(service.lines().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn invalid_quantities_clamp_to_one() -> TestResult {
        let (_dir, store) = temp_store()?;

        let service =
            LocalCartsService::new(store, logged_in_session(guest()), delivering_submitter());

        assert_eq!(service.add(&menu_item(101, "Cheeseburger", 500), 0)?, 1);
        assert_eq!(service.add(&menu_item(101, "Cheeseburger", 500), -3)?, 1);

        assert_eq!(service.lines()[0].quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn remove_is_idempotent_and_change_qty_clamps() -> TestResult {
        let (_dir, store) = temp_store()?;

        let service =
            LocalCartsService::new(store, logged_in_session(guest()), delivering_submitter());

        service.add(&menu_item(101, "Cheeseburger", 500), 4)?;

        assert!(service.change_qty(&RecordId::from(101_i64), 0)?);
        assert_eq!(service.lines()[0].quantity, 1);

        assert!(service.remove(&RecordId::from(101_i64))?);
        assert!(!service.remove(&RecordId::from(101_i64))?, "second removal is a no-op");

        Ok(())
    }

    #[tokio::test]
    async fn corrupt_persisted_cart_reads_as_empty() -> TestResult {
        let (dir, store) = temp_store()?;

        std::fs::write(dir.path().join("cart.json"), "[{broken")?;

        let service =
            LocalCartsService::new(store, logged_in_session(guest()), delivering_submitter());

        assert!(service.lines().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_cart_and_storage() -> TestResult {
        let (_dir, store) = temp_store()?;
        let session = logged_in_session(guest());

        let service = LocalCartsService::new(
            store.clone(),
            Arc::clone(&session),
            delivering_submitter(),
        );

        service.add(&menu_item(101, "Cheeseburger", 500), 2)?;
        service.clear()?;

        assert!(service.lines().is_empty());

        let restored = LocalCartsService::new(store, session, delivering_submitter());
        assert!(restored.lines().is_empty(), "cleared cart stays cleared");

        Ok(())
    }
}
