mod common;

use std::sync::Arc;

use uuid::Uuid;

use campus_events::models::CapacityMode;
use campus_events::services::{CapacityLedger, EventDirectory};
use campus_events::AppError;
use common::{campus, draft};

const CACHE_CAPACITY: usize = 16;

#[tokio::test]
async fn fills_to_capacity_then_rejects() {
    let campus = campus().await;
    let directory = EventDirectory::new(campus.store.clone(), CACHE_CAPACITY);
    let ledger = CapacityLedger::new(campus.store.clone());

    let event = directory
        .create(draft(&campus, CapacityMode::Limited(2)))
        .await
        .unwrap();

    let (alice, bob, carol) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    ledger.reserve(alice, event.id).await.unwrap();
    ledger.reserve(bob, event.id).await.unwrap();

    let stored = directory.get_event(event.id).await.unwrap();
    assert_eq!(stored.current_reservations, 2);

    match ledger.reserve(carol, event.id).await {
        Err(AppError::AtCapacity) => {}
        other => panic!("expected AtCapacity, got {:?}", other.map(|r| r.id)),
    }

    // The counter never moved past the ceiling and matches the rows.
    let stored = directory.get_event(event.id).await.unwrap();
    assert_eq!(stored.current_reservations, 2);
    let confirmed = campus
        .store
        .confirmed_reservations_for_event(event.id)
        .await
        .unwrap();
    assert_eq!(confirmed.len(), 2);
}

#[tokio::test]
async fn reserve_is_idempotent_per_user() {
    let campus = campus().await;
    let directory = EventDirectory::new(campus.store.clone(), CACHE_CAPACITY);
    let ledger = CapacityLedger::new(campus.store.clone());

    let event = directory
        .create(draft(&campus, CapacityMode::Limited(5)))
        .await
        .unwrap();

    let alice = Uuid::new_v4();
    let first = ledger.reserve(alice, event.id).await.unwrap();
    let second = ledger.reserve(alice, event.id).await.unwrap();

    // Same reservation handed back, not a second seat.
    assert_eq!(first.id, second.id);
    let stored = directory.get_event(event.id).await.unwrap();
    assert_eq!(stored.current_reservations, 1);
}

#[tokio::test]
async fn cancel_returns_seat_and_repeats_as_noop() {
    let campus = campus().await;
    let directory = EventDirectory::new(campus.store.clone(), CACHE_CAPACITY);
    let ledger = CapacityLedger::new(campus.store.clone());

    let event = directory
        .create(draft(&campus, CapacityMode::Limited(3)))
        .await
        .unwrap();

    let alice = Uuid::new_v4();
    ledger.reserve(alice, event.id).await.unwrap();
    assert_eq!(
        directory.get_event(event.id).await.unwrap().current_reservations,
        1
    );

    assert!(ledger.cancel(alice, event.id).await.unwrap());
    assert_eq!(
        directory.get_event(event.id).await.unwrap().current_reservations,
        0
    );

    // Second cancel finds nothing to do and the counter stays at zero.
    assert!(!ledger.cancel(alice, event.id).await.unwrap());
    assert_eq!(
        directory.get_event(event.id).await.unwrap().current_reservations,
        0
    );

    // History survives as a cancelled row.
    let all = campus.store.reservations_for_user(alice).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn cancel_then_reserve_again() {
    let campus = campus().await;
    let directory = EventDirectory::new(campus.store.clone(), CACHE_CAPACITY);
    let ledger = CapacityLedger::new(campus.store.clone());

    let event = directory
        .create(draft(&campus, CapacityMode::Limited(1)))
        .await
        .unwrap();

    let alice = Uuid::new_v4();
    let first = ledger.reserve(alice, event.id).await.unwrap();
    ledger.cancel(alice, event.id).await.unwrap();
    let second = ledger.reserve(alice, event.id).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(
        directory.get_event(event.id).await.unwrap().current_reservations,
        1
    );
}

#[tokio::test]
async fn open_events_are_not_reservable() {
    let campus = campus().await;
    let directory = EventDirectory::new(campus.store.clone(), CACHE_CAPACITY);
    let ledger = CapacityLedger::new(campus.store.clone());

    let event = directory
        .create(draft(&campus, CapacityMode::Unlimited))
        .await
        .unwrap();

    match ledger.reserve(Uuid::new_v4(), event.id).await {
        Err(AppError::NotReservable) => {}
        other => panic!("expected NotReservable, got {:?}", other.map(|r| r.id)),
    }

    // No reservation row was created.
    let confirmed = campus
        .store
        .confirmed_reservations_for_event(event.id)
        .await
        .unwrap();
    assert!(confirmed.is_empty());
}

#[tokio::test]
async fn cancelled_events_reject_reserves() {
    let campus = campus().await;
    let directory = EventDirectory::new(campus.store.clone(), CACHE_CAPACITY);
    let ledger = CapacityLedger::new(campus.store.clone());

    let event = directory
        .create(draft(&campus, CapacityMode::Limited(10)))
        .await
        .unwrap();
    directory.cancel_event(event.id).await.unwrap();

    match ledger.reserve(Uuid::new_v4(), event.id).await {
        Err(AppError::EventCancelled(_)) => {}
        other => panic!("expected EventCancelled, got {:?}", other.map(|r| r.id)),
    }
}

#[tokio::test]
async fn missing_event_is_not_found() {
    let campus = campus().await;
    let ledger = CapacityLedger::new(Arc::clone(&campus.store));

    match ledger.reserve(Uuid::new_v4(), Uuid::new_v4()).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {:?}", other.map(|r| r.id)),
    }
}

#[tokio::test]
async fn seat_transaction_refuses_overshoot_at_store_level() {
    // Drive the store primitive directly: with one seat left, only one of
    // two inserts can apply regardless of interleaving.
    use campus_events::models::Reservation;
    use campus_events::storage::SeatTxn;
    use chrono::Utc;

    let campus = campus().await;
    let directory = EventDirectory::new(campus.store.clone(), CACHE_CAPACITY);
    let event = directory
        .create(draft(&campus, CapacityMode::Limited(1)))
        .await
        .unwrap();

    let first = Reservation::confirmed(Uuid::new_v4(), event.id, Utc::now());
    let second = Reservation::confirmed(Uuid::new_v4(), event.id, Utc::now());

    assert_eq!(
        campus.store.reserve_seat(&first).await.unwrap(),
        SeatTxn::Applied
    );
    assert_eq!(
        campus.store.reserve_seat(&second).await.unwrap(),
        SeatTxn::Full
    );

    let stored = directory.get_event(event.id).await.unwrap();
    assert_eq!(stored.current_reservations, 1);
}
