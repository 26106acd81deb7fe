//! Background order submission queue.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use foodiehub::orders::OrderDraft;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::clients::OrdersApi;

/// Delivery state of one queued submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Pending,
    Sent,
    Failed(String),
}

/// One queued order submission and its current status.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub seq: u64,
    pub draft: OrderDraft,
    pub status: SubmissionStatus,
}

/// Fire-and-forget order submissions with observable outcomes.
///
/// Cart mutations enqueue here and return immediately; a background worker
/// POSTs each draft in arrival order. A failed submission never rolls the
/// cart back; it is recorded on the ledger and logged, nothing more.
#[derive(Debug, Clone)]
pub struct OrderSubmitter {
    tx: mpsc::UnboundedSender<(u64, OrderDraft)>,
    ledger: Arc<Mutex<Vec<SubmissionRecord>>>,
    next_seq: Arc<AtomicU64>,
    in_flight: Arc<watch::Sender<usize>>,
}

impl OrderSubmitter {
    /// Start the submission worker on the current runtime.
    #[must_use]
    pub fn spawn(api: Arc<dyn OrdersApi>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<(u64, OrderDraft)>();
        let ledger: Arc<Mutex<Vec<SubmissionRecord>>> = Arc::new(Mutex::new(Vec::new()));
        let (in_flight, _) = watch::channel(0_usize);
        let in_flight = Arc::new(in_flight);

        let worker_ledger = Arc::clone(&ledger);
        let worker_count = Arc::clone(&in_flight);

        tokio::spawn(async move {
            while let Some((seq, draft)) = rx.recv().await {
                let status = match api.submit_order(&draft).await {
                    Ok(()) => {
                        info!(seq, "order submission delivered");
                        SubmissionStatus::Sent
                    }
                    Err(error) => {
                        warn!(seq, %error, "order submission failed");
                        SubmissionStatus::Failed(error.to_string())
                    }
                };

                set_status(&worker_ledger, seq, status);
                worker_count.send_modify(|count| *count -= 1);
            }
        });

        Self {
            tx,
            ledger,
            next_seq: Arc::new(AtomicU64::new(1)),
            in_flight,
        }
    }

    /// Queue a draft for delivery. Returns the submission's ledger sequence.
    pub fn enqueue(&self, draft: OrderDraft) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);

        self.in_flight.send_modify(|count| *count += 1);
        self.ledger
            .lock()
            .expect("submission ledger poisoned")
            .push(SubmissionRecord {
                seq,
                draft: draft.clone(),
                status: SubmissionStatus::Pending,
            });

        if self.tx.send((seq, draft)).is_err() {
            warn!(seq, "submission worker stopped, marking failed");
            set_status(
                &self.ledger,
                seq,
                SubmissionStatus::Failed("submission worker stopped".to_owned()),
            );
            self.in_flight.send_modify(|count| *count -= 1);
        }

        seq
    }

    /// Snapshot of every submission seen this session, oldest first.
    pub fn submissions(&self) -> Vec<SubmissionRecord> {
        self.ledger
            .lock()
            .expect("submission ledger poisoned")
            .clone()
    }

    /// Wait until nothing is queued or in flight, then return the ledger.
    pub async fn drain(&self) -> Vec<SubmissionRecord> {
        let mut in_flight = self.in_flight.subscribe();
        let _ = in_flight.wait_for(|count| *count == 0).await;

        self.submissions()
    }
}

fn set_status(ledger: &Mutex<Vec<SubmissionRecord>>, seq: u64, status: SubmissionStatus) {
    let mut ledger = ledger.lock().expect("submission ledger poisoned");

    if let Some(record) = ledger.iter_mut().find(|record| record.seq == seq) {
        record.status = status;
    }
}
