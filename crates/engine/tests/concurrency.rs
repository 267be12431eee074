//! Racing clock-ins for the same employee must leave exactly one active
//! entry behind.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use common::{harness, hire, hq};
use workforce_core::error::CoreError;
use workforce_core::roles::Role;
use workforce_engine::EngineError;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_clock_ins_admit_one() {
    let h = harness();
    let emp = hire(&h, "jane@company.com", Role::Employee).await;
    let employee_id = emp.id;
    let workforce = Arc::new(h.workforce);

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let workforce = Arc::clone(&workforce);
            tokio::spawn(async move {
                workforce.ledger().clock_in(employee_id, hq(), None).await
            })
        })
        .collect();

    let mut ok = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(err) => {
                assert_matches!(err, EngineError::Core(CoreError::AlreadyActive { .. }));
                rejected += 1;
            }
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(rejected, 1);
    let entries = workforce.ledger().list_for(Some(employee_id)).await.unwrap();
    assert_eq!(entries.iter().filter(|e| e.is_active()).count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_clock_outs_complete_once() {
    let h = harness();
    let emp = hire(&h, "jane@company.com", Role::Employee).await;
    h.workforce.ledger().clock_in(emp.id, hq(), None).await.unwrap();
    let employee_id = emp.id;
    let workforce = Arc::new(h.workforce);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let workforce = Arc::clone(&workforce);
            tokio::spawn(async move { workforce.ledger().clock_out(employee_id).await })
        })
        .collect();

    let mut completed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => completed += 1,
            Err(err) => {
                assert_matches!(err, EngineError::Core(CoreError::NoActiveEntry { .. }))
            }
        }
    }
    assert_eq!(completed, 1);
}
