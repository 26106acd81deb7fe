//! End-to-end reconciliation pipeline tests: raw service bodies through
//! envelope unwrapping, canonicalization, ownership filtering and status
//! partitioning.

use foodiehub::{
    OrderRecord, OrderStatus, Principal, RecordId, Role,
    envelope,
    orders::{PaymentDraft, ownership},
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde_json::json;
use testresult::TestResult;

fn ayesha() -> Principal {
    Principal {
        id: Some(RecordId::from(7_i64)),
        email: "a@x.com".to_owned(),
        name: "Ayesha".to_owned(),
        role: Role::User,
    }
}

#[test]
fn wrapped_mixed_batch_reduces_to_this_principals_pending_orders() {
    // The order service wraps its list and pads it with foreign records.
    let body = json!({
        "orders": [
            {"orderId": 1, "user_id": 7, "status": "PENDING", "totalAmount": 1000.0},
            {"orderId": 2, "userId": 8, "customerEmail": "b@x.com", "status": "PENDING"},
            {"orderId": 3, "customerEmail": "A@X.com", "status": "Payment Pending"},
            {"orderId": 4, "userId": "7", "status": "COMPLETED"},
        ]
    });

    let records: Vec<OrderRecord> = envelope::records(body)
        .iter()
        .map(OrderRecord::from_wire)
        .collect();
    let mine = ownership::filter_owned(records, &ayesha());

    assert_eq!(mine.len(), 3, "foreign record excluded");

    let pending: Vec<_> = mine.iter().filter(|order| order.is_pending()).collect();
    let pending_ids: Vec<&str> = pending
        .iter()
        .filter_map(|order| order.order_id.as_ref())
        .map(RecordId::as_str)
        .collect();

    assert_eq!(pending_ids, vec!["1", "3"], "completed order stays out of the pending view");
}

#[test]
fn single_object_response_still_reconciles() {
    let body = json!({"orderId": 9, "userId": 7, "status": "pending"});

    let records: Vec<OrderRecord> = envelope::records(body)
        .iter()
        .map(OrderRecord::from_wire)
        .collect();
    let mine = ownership::filter_owned(records, &ayesha());

    assert_eq!(mine.len(), 1);
    assert!(mine.iter().all(OrderRecord::is_pending));
}

#[test]
fn checkout_flow_settles_a_pending_order() -> TestResult {
    // The scenario a user walks through: a submitted cart add shows up as a
    // pending order, gets settled, and leaves the pending view.
    let body = json!([{
        "orderId": 9001,
        "user_id": 7,
        "customerName": "Ayesha",
        "customerEmail": "a@x.com",
        "status": "PENDING",
        "totalAmount": 1000.0,
        "items": "[{\"id\":101,\"name\":\"Cheeseburger\",\"price\":500.0,\"qty\":2}]",
    }]);

    let me = ayesha();
    let mine = ownership::filter_owned(
        envelope::records(body).iter().map(OrderRecord::from_wire).collect(),
        &me,
    );
    let order = mine.first().expect("order survives the filters");

    assert!(order.is_pending());
    assert_eq!(order.total(), Decimal::from(1000));

    let paid_at: Timestamp = "2025-03-01T10:20:00Z".parse()?;
    let draft = PaymentDraft::from_order(order, RecordId::new("pay-1").expect("id"), paid_at);

    assert_eq!(draft.total_amount, order.total(), "ledger entry carries the same total");
    assert_eq!(draft.status, OrderStatus::Completed);

    // After the status PUT lands, the refetched record reads completed.
    let settled = OrderRecord::from_wire(&json!({
        "orderId": 9001, "user_id": 7, "status": "COMPLETED", "totalAmount": 1000.0,
    }));

    assert!(!settled.is_pending());

    Ok(())
}

#[test]
fn envelope_shapes_are_interchangeable() {
    let bare = json!([{"orderId": 1, "userId": 7}]);
    let orders = json!({"orders": [{"orderId": 1, "userId": 7}]});
    let data = json!({"data": [{"orderId": 1, "userId": 7}]});

    for body in [bare, orders, data] {
        let records = envelope::records(body);
        assert_eq!(records.len(), 1);

        let order = OrderRecord::from_wire(records.first().expect("record"));
        assert!(ownership::owned_by(&order, &ayesha()));
    }
}
