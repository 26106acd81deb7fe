//! Admin dispatch workflow: binding drivers to orders.
//!
//! Assignment state lives on the order service, driver availability on the
//! driver service, and nothing keeps them transactionally consistent. Each
//! assign/unassign is a two-step write recorded as a [`SagaReport`]: the
//! leading step decides success, the follow-up status flip is best effort.
//! The locally cached available-roster is edited optimistically so the
//! operator view converges without waiting for a re-fetch.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use foodiehub::{
    OrderRecord, RecordId, envelope,
    orders::{Driver, DriverAssignment, DriverStatus},
};
use mockall::automock;
use tracing::{info, warn};

use crate::{
    clients::{DriversApi, OrdersApi},
    domain::dispatch::DispatchServiceError,
    saga::SagaReport,
};

/// Dispatch service over the order and driver endpoints.
pub struct RemoteDispatchService {
    orders: Arc<dyn OrdersApi>,
    drivers: Arc<dyn DriversApi>,
    available: Mutex<Vec<Driver>>,
}

impl RemoteDispatchService {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersApi>, drivers: Arc<dyn DriversApi>) -> Self {
        Self {
            orders,
            drivers,
            available: Mutex::new(Vec::new()),
        }
    }

    fn roster(&self) -> std::sync::MutexGuard<'_, Vec<Driver>> {
        self.available.lock().expect("driver roster poisoned")
    }

    fn drop_from_roster(&self, driver_id: &RecordId) {
        self.roster().retain(|driver| &driver.id != driver_id);
    }

    fn add_to_roster(&self, driver: Driver) {
        let mut roster = self.roster();

        if !roster.iter().any(|known| known.id == driver.id) {
            roster.push(driver);
        }
    }

    /// Best reconstruction of the released driver for the optimistic
    /// reinsert: the roster detail endpoint when it answers, otherwise the
    /// contact fields already merged onto the order.
    async fn released_driver(&self, order: &OrderRecord, driver_id: &RecordId) -> Driver {
        match self.drivers.driver(driver_id).await {
            Ok(body) => {
                if let Some(mut driver) = envelope::record(body).as_ref().and_then(Driver::from_wire)
                {
                    driver.status = DriverStatus::Available;
                    return driver;
                }
            }
            Err(error) => {
                warn!(%driver_id, %error, "driver detail fetch failed, rebuilding from order view");
            }
        }

        let contact = order.assigned_driver.clone().unwrap_or_default();

        Driver {
            id: driver_id.clone(),
            name: contact.name.unwrap_or_default(),
            phone: contact.phone,
            vehicle: contact.vehicle,
            vehicle_type: contact.vehicle_type,
            status: DriverStatus::Available,
        }
    }
}

#[async_trait]
impl DispatchService for RemoteDispatchService {
    #[tracing::instrument(name = "dispatch.roster", skip_all, err)]
    async fn available_drivers(&self) -> Result<Vec<Driver>, DispatchServiceError> {
        let body = self.drivers.roster().await?;

        let available: Vec<Driver> = envelope::records(body)
            .iter()
            .filter_map(Driver::from_wire)
            .filter(|driver| driver.status.is_available())
            .collect();

        *self.roster() = available.clone();

        Ok(available)
    }

    fn cached_available(&self) -> Vec<Driver> {
        self.roster().clone()
    }

    async fn enrich_orders(&self, mut orders: Vec<OrderRecord>) -> Vec<OrderRecord> {
        for order in &mut orders {
            let Some(order_id) = &order.order_id else {
                continue;
            };

            // Individual enrichment failures leave the order un-enriched;
            // the listing as a whole still renders.
            match self.orders.assignment_for(order_id).await {
                Ok(body) => {
                    if let Some(contact) = envelope::record(body)
                        .map(|record| DriverAssignment::from_wire(&record))
                        .and_then(|assignment| assignment.contact())
                    {
                        order.assigned_driver = Some(contact);
                    }
                }
                Err(error) => {
                    warn!(%order_id, %error, "assignment fetch failed, order left un-enriched");
                }
            }
        }

        orders
    }

    #[tracing::instrument(
        name = "dispatch.assign",
        skip_all,
        fields(order_id = ?order.order_id, driver_id = %driver.id),
        err
    )]
    async fn assign(
        &self,
        order: &OrderRecord,
        driver: &Driver,
    ) -> Result<SagaReport, DispatchServiceError> {
        let order_id = order
            .order_id
            .as_ref()
            .ok_or(DispatchServiceError::MissingOrderId)?;

        let mut saga = SagaReport::begin("assign-driver");

        // Step 1: the assignment itself. Failure aborts before any
        // driver-pool mutation. Re-assigning an already assigned order is
        // last-writer-wins server-side; the client does not special-case it.
        self.orders.assign_driver(order_id, &driver.id).await?;
        saga.completed("assignment");

        // Step 2: mark the driver on delivery. A failure here leaves the
        // order assigned while the pool still shows the driver available;
        // recorded, logged, not surfaced as an operation failure.
        match self
            .drivers
            .update_status(&driver.id, &DriverStatus::OnDelivery)
            .await
        {
            Ok(()) => saga.completed("driver-status"),
            Err(error) => {
                warn!(%error, "order assigned but driver still reads available");
                saga.failed("driver-status", error.to_string());
            }
        }

        self.drop_from_roster(&driver.id);

        info!(%saga, "assignment finished");

        Ok(saga)
    }

    #[tracing::instrument(name = "dispatch.unassign", skip_all, fields(order_id = ?order.order_id), err)]
    async fn unassign(&self, order: &OrderRecord) -> Result<SagaReport, DispatchServiceError> {
        let order_id = order
            .order_id
            .as_ref()
            .ok_or(DispatchServiceError::MissingOrderId)?;
        let driver_id = order
            .driver_id()
            .ok_or(DispatchServiceError::MissingDriverId)?
            .clone();

        let mut saga = SagaReport::begin("unassign-driver");

        self.orders.unassign_driver(order_id, &driver_id).await?;
        saga.completed("unassignment");

        match self
            .drivers
            .update_status(&driver_id, &DriverStatus::Available)
            .await
        {
            Ok(()) => saga.completed("driver-status"),
            Err(error) => {
                warn!(%error, "order released but driver still reads on delivery");
                saga.failed("driver-status", error.to_string());
            }
        }

        let released = self.released_driver(order, &driver_id).await;
        self.add_to_roster(released);

        info!(%saga, "unassignment finished");

        Ok(saga)
    }
}

/// Driver assignment from the operator's point of view.
#[automock]
#[async_trait]
pub trait DispatchService: Send + Sync {
    /// Fetch the roster and keep only available drivers, refreshing the
    /// local cache.
    async fn available_drivers(&self) -> Result<Vec<Driver>, DispatchServiceError>;

    /// The optimistically maintained available list, as of the last fetch
    /// and the local edits since.
    fn cached_available(&self) -> Vec<Driver>;

    /// Merge each order's current assignment onto the order view. Per-order
    /// fetch failures are swallowed.
    async fn enrich_orders(&self, orders: Vec<OrderRecord>) -> Vec<OrderRecord>;

    /// Bind `driver` to `order`: assignment POST, then a best-effort status
    /// flip to ON_DELIVERY.
    async fn assign(
        &self,
        order: &OrderRecord,
        driver: &Driver,
    ) -> Result<SagaReport, DispatchServiceError>;

    /// Release the order's assigned driver: assignment DELETE, then a
    /// best-effort status flip back to AVAILABLE.
    async fn unassign(&self, order: &OrderRecord) -> Result<SagaReport, DispatchServiceError>;
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;
    use testresult::TestResult;

    use crate::clients::{ApiError, MockDriversApi, MockOrdersApi};

    use super::*;

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "down".to_owned(),
        }
    }

    fn assigned_order(order_id: i64, driver_id: i64) -> OrderRecord {
        OrderRecord::from_wire(&json!({
            "orderId": order_id,
            "userId": 7,
            "status": "PENDING",
            "driverId": driver_id,
            "driverName": "Kiran",
        }))
    }

    fn driver(id: i64, name: &str) -> Driver {
        Driver {
            id: RecordId::from(id),
            name: name.to_owned(),
            phone: Some("9815550000".to_owned()),
            vehicle: Some("BA 2 PA 1234".to_owned()),
            vehicle_type: Some("bike".to_owned()),
            status: DriverStatus::Available,
        }
    }

    #[tokio::test]
    async fn roster_keeps_only_available_drivers() -> TestResult {
        let mut drivers = MockDriversApi::new();
        drivers.expect_roster().returning(|| {
            Ok(json!({"data": [
                {"id": 1, "name": "Kiran", "status": "AVAILABLE"},
                {"id": 2, "name": "Mina", "status": "on_delivery"},
                {"id": 3, "name": "Raj", "status": "available"},
                {"name": "No Id", "status": "AVAILABLE"},
            ]}))
        });

        let service =
            RemoteDispatchService::new(Arc::new(MockOrdersApi::new()), Arc::new(drivers));
        let available = service.available_drivers().await?;

        let names: Vec<&str> = available.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Kiran", "Raj"]);
        assert_eq!(service.cached_available().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn enrichment_merges_contacts_and_swallows_failures() {
        let mut orders_api = MockOrdersApi::new();
        orders_api.expect_assignment_for().returning(|order_id| {
            if order_id.as_str() == "1" {
                Ok(json!({"orderId": 1, "driverId": 42, "driverName": "Kiran"}))
            } else {
                Err(unavailable())
            }
        });

        let service =
            RemoteDispatchService::new(Arc::new(orders_api), Arc::new(MockDriversApi::new()));

        let orders = vec![
            OrderRecord::from_wire(&json!({"orderId": 1, "userId": 7, "status": "PENDING"})),
            OrderRecord::from_wire(&json!({"orderId": 2, "userId": 7, "status": "PENDING"})),
        ];
        let enriched = service.enrich_orders(orders).await;

        assert_eq!(
            enriched[0].driver_id().map(RecordId::as_str),
            Some("42"),
            "first order enriched"
        );
        assert!(
            enriched[1].assigned_driver.is_none(),
            "failed fetch leaves the order un-enriched"
        );
    }

    #[tokio::test]
    async fn assign_removes_the_driver_from_the_available_list() -> TestResult {
        let mut orders_api = MockOrdersApi::new();
        orders_api
            .expect_assign_driver()
            .withf(|order, drv| order.as_str() == "1" && drv.as_str() == "42")
            .returning(|_, _| Ok(()));

        let mut drivers_api = MockDriversApi::new();
        drivers_api.expect_roster().returning(|| {
            Ok(json!([{"id": 42, "name": "Kiran", "status": "AVAILABLE"}]))
        });
        drivers_api
            .expect_update_status()
            .withf(|_, status| *status == DriverStatus::OnDelivery)
            .returning(|_, _| Ok(()));

        let service = RemoteDispatchService::new(Arc::new(orders_api), Arc::new(drivers_api));
        service.available_drivers().await?;

        let order =
            OrderRecord::from_wire(&json!({"orderId": 1, "userId": 7, "status": "PENDING"}));
        let saga = service.assign(&order, &driver(42, "Kiran")).await?;

        assert!(saga.all_completed());
        assert!(service.cached_available().is_empty(), "driver removed optimistically");

        Ok(())
    }

    #[tokio::test]
    async fn failed_assignment_post_aborts_without_touching_the_pool() -> TestResult {
        let mut orders_api = MockOrdersApi::new();
        orders_api
            .expect_assign_driver()
            .returning(|_, _| Err(unavailable()));

        let mut drivers_api = MockDriversApi::new();
        drivers_api.expect_roster().returning(|| {
            Ok(json!([{"id": 42, "name": "Kiran", "status": "AVAILABLE"}]))
        });
        // No update_status expectation: step 2 must never run.

        let service = RemoteDispatchService::new(Arc::new(orders_api), Arc::new(drivers_api));
        service.available_drivers().await?;

        let order =
            OrderRecord::from_wire(&json!({"orderId": 1, "userId": 7, "status": "PENDING"}));
        let result = service.assign(&order, &driver(42, "Kiran")).await;

        assert!(matches!(result, Err(DispatchServiceError::Api(_))));
        assert_eq!(service.cached_available().len(), 1, "pool untouched");

        Ok(())
    }

    #[tokio::test]
    async fn failed_driver_flip_reports_split_brain_not_failure() -> TestResult {
        let mut orders_api = MockOrdersApi::new();
        orders_api.expect_assign_driver().returning(|_, _| Ok(()));

        let mut drivers_api = MockDriversApi::new();
        drivers_api
            .expect_update_status()
            .returning(|_, _| Err(unavailable()));

        let service = RemoteDispatchService::new(Arc::new(orders_api), Arc::new(drivers_api));

        let order =
            OrderRecord::from_wire(&json!({"orderId": 1, "userId": 7, "status": "PENDING"}));
        let saga = service.assign(&order, &driver(42, "Kiran")).await?;

        assert!(saga.is_split_brain(), "order assigned, pool disagrees");

        Ok(())
    }

    #[tokio::test]
    async fn unassign_round_trips_the_driver_back_to_the_pool() -> TestResult {
        let mut orders_api = MockOrdersApi::new();
        orders_api.expect_assign_driver().returning(|_, _| Ok(()));
        orders_api
            .expect_unassign_driver()
            .withf(|order, drv| order.as_str() == "1" && drv.as_str() == "42")
            .returning(|_, _| Ok(()));

        let mut drivers_api = MockDriversApi::new();
        drivers_api.expect_roster().returning(|| {
            Ok(json!([{"id": 42, "name": "Kiran", "status": "AVAILABLE"}]))
        });
        drivers_api.expect_update_status().returning(|_, _| Ok(()));
        drivers_api.expect_driver().returning(|_| {
            Ok(json!({"id": 42, "name": "Kiran", "status": "ON_DELIVERY"}))
        });

        let service = RemoteDispatchService::new(Arc::new(orders_api), Arc::new(drivers_api));
        service.available_drivers().await?;

        let kiran = driver(42, "Kiran");
        let plain_order =
            OrderRecord::from_wire(&json!({"orderId": 1, "userId": 7, "status": "PENDING"}));
        service.assign(&plain_order, &kiran).await?;
        assert!(service.cached_available().is_empty());

        let saga = service.unassign(&assigned_order(1, 42)).await?;

        assert!(saga.all_completed());

        let roster = service.cached_available();
        assert_eq!(roster.len(), 1, "driver reinserted optimistically");
        assert_eq!(roster[0].id.as_str(), "42");
        assert_eq!(roster[0].status, DriverStatus::Available);

        Ok(())
    }

    #[tokio::test]
    async fn unassign_requires_a_resolvable_driver() {
        let service = RemoteDispatchService::new(
            Arc::new(MockOrdersApi::new()),
            Arc::new(MockDriversApi::new()),
        );

        let order =
            OrderRecord::from_wire(&json!({"orderId": 1, "userId": 7, "status": "PENDING"}));
        let result = service.unassign(&order).await;

        assert!(
            matches!(result, Err(DispatchServiceError::MissingDriverId)),
            "expected MissingDriverId, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unassign_reinserts_from_order_view_when_detail_fetch_fails() -> TestResult {
        let mut orders_api = MockOrdersApi::new();
        orders_api.expect_unassign_driver().returning(|_, _| Ok(()));

        let mut drivers_api = MockDriversApi::new();
        drivers_api.expect_update_status().returning(|_, _| Ok(()));
        drivers_api
            .expect_driver()
            .returning(|_| Err(unavailable()));

        let service = RemoteDispatchService::new(Arc::new(orders_api), Arc::new(drivers_api));

        service.unassign(&assigned_order(1, 42)).await?;

        let roster = service.cached_available();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Kiran", "contact fields carried from the order view");

        Ok(())
    }
}
