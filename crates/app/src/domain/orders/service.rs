//! Order reconciliation service.
//!
//! Presents the remote ledger of a principal's orders, partitioned by
//! status, and drives the status transitions: checkout (ledger POST plus a
//! best-effort status PUT), batch payment, deletion and split-brain repair.
//! Every fetched batch is ownership-filtered client-side; the backends have
//! been seen to answer wider than asked.

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use foodiehub::{
    OrderRecord, OrderStatus, PaidOrderRecord, Principal, RecordId,
    envelope,
    orders::{PaymentDraft, ownership},
};
use jiff::Timestamp;
use mockall::automock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    clients::{BillDocument, BillKind, OrdersApi},
    domain::orders::{
        OrdersServiceError,
        models::{PaymentOutcome, PaymentResult, PaymentSummary},
    },
    saga::SagaReport,
};

/// Order service backed by the remote order/payment endpoints.
pub struct RemoteOrdersService {
    api: Arc<dyn OrdersApi>,
}

impl RemoteOrdersService {
    #[must_use]
    pub fn new(api: Arc<dyn OrdersApi>) -> Self {
        Self { api }
    }

    fn fresh_payment_id() -> RecordId {
        // now_v7 ids are never blank, but the constructor is fallible.
        RecordId::new(Uuid::now_v7().to_string())
            .unwrap_or_else(|| RecordId::from(0_i64))
    }
}

#[async_trait]
impl OrdersService for RemoteOrdersService {
    #[tracing::instrument(name = "orders.fetch", skip_all, err)]
    async fn fetch_orders(
        &self,
        principal: &Principal,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        // Prefer the id-keyed endpoint; fall back to the email query.
        let body = if let Some(id) = &principal.id {
            self.api.orders_by_user(id).await?
        } else if !principal.email.trim().is_empty() {
            self.api.orders_by_email(&principal.email).await?
        } else {
            return Err(OrdersServiceError::NoIdentifier);
        };

        let records: Vec<OrderRecord> = envelope::records(body)
            .iter()
            .map(OrderRecord::from_wire)
            .collect();
        let fetched = records.len();

        let mine = ownership::filter_owned(records, principal);

        if mine.len() < fetched {
            warn!(
                excluded = fetched - mine.len(),
                "dropped order records not owned by the principal"
            );
        }

        Ok(mine)
    }

    async fn pending_orders(
        &self,
        principal: &Principal,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let orders = self.fetch_orders(principal).await?;

        Ok(orders.into_iter().filter(|o| o.is_pending()).collect())
    }

    #[tracing::instrument(name = "orders.fetch_all", skip_all, err)]
    async fn all_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let body = self.api.orders().await?;

        Ok(envelope::records(body)
            .iter()
            .map(OrderRecord::from_wire)
            .collect())
    }

    #[tracing::instrument(name = "orders.paid", skip_all, err)]
    async fn paid_orders(
        &self,
        principal: &Principal,
    ) -> Result<Vec<PaidOrderRecord>, OrdersServiceError> {
        let id = principal.id.as_ref().ok_or(OrdersServiceError::NoUserId)?;
        let body = self.api.paid_orders_for(id).await?;

        Ok(envelope::records(body)
            .iter()
            .map(PaidOrderRecord::from_wire)
            .collect())
    }

    #[tracing::instrument(name = "orders.checkout", skip_all, fields(order_id = ?order.order_id), err)]
    async fn checkout(&self, order: &OrderRecord) -> Result<SagaReport, OrdersServiceError> {
        let mut saga = SagaReport::begin("checkout");

        let draft = PaymentDraft::from_order(order, Self::fresh_payment_id(), Timestamp::now());

        // Step 1: the ledger entry. Its failure fails the whole checkout.
        self.api.add_paid_order(&draft).await?;
        saga.completed("ledger");

        // Step 2: flip the source order to COMPLETED. Best effort; a failure
        // here leaves the ledger row standing and the order PENDING.
        match &order.order_id {
            Some(order_id) => {
                match self
                    .api
                    .update_status(order_id, &OrderStatus::Completed)
                    .await
                {
                    Ok(()) => saga.completed("settle"),
                    Err(error) => {
                        warn!(%order_id, %error, "ledgered but could not settle order status");
                        saga.failed("settle", error.to_string());
                    }
                }
            }
            None => saga.skipped("settle", "order carries no id"),
        }

        info!(%saga, "checkout finished");

        Ok(saga)
    }

    async fn pay_all(&self, orders: &[OrderRecord]) -> PaymentSummary {
        let mut summary = PaymentSummary::default();

        // Strictly sequential: one settlement at a time, every order
        // attempted exactly once, no early abort.
        for order in orders {
            let outcome = match self.checkout(order).await {
                Ok(saga) if saga.all_completed() => PaymentOutcome::Settled,
                Ok(_) => PaymentOutcome::SettledUnconfirmed,
                Err(error) => PaymentOutcome::Failed(error.to_string()),
            };

            summary.results.push(PaymentResult {
                order_id: order.order_id.clone(),
                outcome,
            });
        }

        info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "payment batch finished"
        );

        summary
    }

    #[tracing::instrument(name = "orders.delete", skip(self), err)]
    async fn delete_order(&self, order_id: &RecordId) -> Result<(), OrdersServiceError> {
        self.api.delete_order(order_id).await?;
        Ok(())
    }

    async fn bill(
        &self,
        order_id: &RecordId,
        kind: BillKind,
    ) -> Result<BillDocument, OrdersServiceError> {
        Ok(self.api.bill(order_id, kind).await?)
    }

    #[tracing::instrument(name = "orders.repair", skip_all, err)]
    async fn repair_split_brain(
        &self,
        principal: &Principal,
    ) -> Result<Vec<RecordId>, OrdersServiceError> {
        let paid = self.paid_orders(principal).await?;
        let settled: HashSet<&RecordId> = paid
            .iter()
            .filter_map(|entry| entry.order_id.as_ref())
            .collect();

        let stranded: Vec<RecordId> = self
            .pending_orders(principal)
            .await?
            .into_iter()
            .filter_map(|order| order.order_id)
            .filter(|id| settled.contains(id))
            .collect();

        let mut repaired = Vec::new();

        for order_id in stranded {
            match self
                .api
                .update_status(&order_id, &OrderStatus::Completed)
                .await
            {
                Ok(()) => {
                    info!(%order_id, "repaired order stuck pending after checkout");
                    repaired.push(order_id);
                }
                Err(error) => warn!(%order_id, %error, "repair attempt failed, will retry later"),
            }
        }

        Ok(repaired)
    }
}

/// The remote order ledger from one principal's point of view.
#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// All orders owned by `principal`, defensively filtered.
    async fn fetch_orders(
        &self,
        principal: &Principal,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// The pending view: orders whose status reads as pending.
    async fn pending_orders(
        &self,
        principal: &Principal,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Every order on the ledger, unfiltered. Operator surfaces only.
    async fn all_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// The paid-orders ledger for `principal`.
    async fn paid_orders(
        &self,
        principal: &Principal,
    ) -> Result<Vec<PaidOrderRecord>, OrdersServiceError>;

    /// Settle one order: ledger POST, then a best-effort status PUT.
    async fn checkout(&self, order: &OrderRecord) -> Result<SagaReport, OrdersServiceError>;

    /// Settle a batch sequentially, recording per-order outcomes.
    async fn pay_all(&self, orders: &[OrderRecord]) -> PaymentSummary;

    /// Irreversibly delete an order. Confirmation is the caller's duty.
    async fn delete_order(&self, order_id: &RecordId) -> Result<(), OrdersServiceError>;

    /// Fetch an order's bill, branching on the served content type.
    async fn bill(
        &self,
        order_id: &RecordId,
        kind: BillKind,
    ) -> Result<BillDocument, OrdersServiceError>;

    /// Re-issue the status PUT for orders that have a ledger entry but
    /// still read PENDING. Returns the repaired order ids.
    async fn repair_split_brain(
        &self,
        principal: &Principal,
    ) -> Result<Vec<RecordId>, OrdersServiceError>;
}
