#![cfg(feature = "gate")]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use factuur::core::*;
use factuur::engine::Engine;
use factuur::gate::{AdmissionGate, DEFAULT_IN_FLIGHT_LIMIT};
use factuur::retry::{RetryPolicy, extract_with_retries};
use rust_decimal_macros::dec;
use tokio::sync::oneshot;

const DOC: &str = "Subtotaal 89,55\nBTW 9% 8,05\nTotaal €  97,55";

#[derive(Debug, thiserror::Error)]
#[error("unreachable")]
struct Never;

fn candidate() -> InvoiceRecord {
    InvoiceRecordBuilder::new("F-1", "2024-06-15", dec!(97.55))
        .citation("Totaal €  97,55")
        .add_supplier(SupplierLedgerBuilder::new().low(dec!(89.55), dec!(8.05)).build())
        .build()
}

#[test]
fn limit_is_clamped() {
    assert_eq!(AdmissionGate::new(0).limit(), 1);
    assert_eq!(AdmissionGate::new(3).limit(), 3);
    assert_eq!(AdmissionGate::default().limit(), DEFAULT_IN_FLIGHT_LIMIT);
}

#[tokio::test]
async fn slot_held_only_while_running() {
    let gate = AdmissionGate::new(2);
    let (tx, rx) = oneshot::channel::<()>();

    let running = tokio::spawn({
        let gate = gate.clone();
        async move { gate.admit(async { rx.await.ok() }).await }
    });
    while gate.in_flight() == 0 {
        tokio::task::yield_now().await;
    }
    assert_eq!(gate.available(), 1);

    tx.send(()).unwrap();
    assert_eq!(running.await.unwrap().unwrap(), Some(()));
    assert_eq!(gate.in_flight(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn never_exceeds_limit() {
    let gate = AdmissionGate::new(3);
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let gate = gate.clone();
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            tokio::spawn(async move {
                gate.admit(async {
                    let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    current.fetch_sub(1, Ordering::SeqCst);
                })
                .await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }
    assert!(peak.load(Ordering::SeqCst) <= 3);
    assert_eq!(gate.available(), 3);
}

#[tokio::test]
async fn closed_gate_refuses() {
    let gate = AdmissionGate::new(1);
    gate.close();
    assert!(gate.is_closed());
    assert!(gate.admit(async { 1 }).await.is_err());
}

#[tokio::test]
async fn gated_extraction() {
    let gate = AdmissionGate::new(1);
    let engine = Engine::default();
    let accepted = gate
        .admit(async {
            let mut source =
                |_: &str, _: Option<&str>| -> Result<InvoiceRecord, Never> { Ok(candidate()) };
            extract_with_retries(&engine, &mut source, DOC, RetryPolicy::default())
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(accepted.reconciliation.sum, dec!(97.60));
}
