mod common;

use uuid::Uuid;

use campus_events::models::CapacityMode;
use campus_events::services::{CapacityLedger, EngagementService, EventDirectory, ToggleReserve};
use campus_events::AppError;
use common::{campus, draft};

const CACHE_CAPACITY: usize = 16;

fn services(campus: &common::Campus) -> (EventDirectory, EngagementService) {
    let directory = EventDirectory::new(campus.store.clone(), CACHE_CAPACITY);
    let ledger = CapacityLedger::new(campus.store.clone());
    let engagement = EngagementService::new(campus.store.clone(), ledger);
    (directory, engagement)
}

#[tokio::test]
async fn toggle_save_is_an_involution() {
    let campus = campus().await;
    let (directory, engagement) = services(&campus);

    let event = directory
        .create(draft(&campus, CapacityMode::Unlimited))
        .await
        .unwrap();
    let alice = Uuid::new_v4();

    let state = engagement.toggle_save(alice, event.id).await.unwrap();
    assert!(state.saved);
    assert_eq!(engagement.saves_for(alice).await.unwrap().len(), 1);

    let state = engagement.toggle_save(alice, event.id).await.unwrap();
    assert!(!state.saved);
    assert!(engagement.saves_for(alice).await.unwrap().is_empty());

    // Back to saved; two toggles returned to the original state in between.
    let state = engagement.toggle_save(alice, event.id).await.unwrap();
    assert!(state.saved);
}

#[tokio::test]
async fn saves_are_unique_per_user_event_pair() {
    let campus = campus().await;
    let (directory, engagement) = services(&campus);

    let event = directory
        .create(draft(&campus, CapacityMode::Unlimited))
        .await
        .unwrap();
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    engagement.toggle_save(alice, event.id).await.unwrap();
    engagement.toggle_save(bob, event.id).await.unwrap();

    assert_eq!(campus.store.saves_for_event(event.id).await.unwrap().len(), 2);
    assert_eq!(engagement.saves_for(alice).await.unwrap().len(), 1);
}

#[tokio::test]
async fn toggle_save_on_missing_event_is_not_found() {
    let campus = campus().await;
    let (_, engagement) = services(&campus);

    match engagement.toggle_save(Uuid::new_v4(), Uuid::new_v4()).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {:?}", other.map(|s| s.saved)),
    }
}

#[tokio::test]
async fn toggle_reserve_cycles_between_reserved_and_cancelled() {
    let campus = campus().await;
    let (directory, engagement) = services(&campus);

    let event = directory
        .create(draft(&campus, CapacityMode::Limited(5)))
        .await
        .unwrap();
    let alice = Uuid::new_v4();

    match engagement.toggle_reserve(alice, event.id).await.unwrap() {
        ToggleReserve::Reserved { reservation } => {
            assert_eq!(reservation.user_id, alice);
            assert_eq!(reservation.event_id, event.id);
        }
        other => panic!("expected Reserved, got {:?}", other),
    }
    assert_eq!(
        directory.get_event(event.id).await.unwrap().current_reservations,
        1
    );

    match engagement.toggle_reserve(alice, event.id).await.unwrap() {
        ToggleReserve::Cancelled => {}
        other => panic!("expected Cancelled, got {:?}", other),
    }
    assert_eq!(
        directory.get_event(event.id).await.unwrap().current_reservations,
        0
    );

    // A third toggle reserves again with a fresh row.
    match engagement.toggle_reserve(alice, event.id).await.unwrap() {
        ToggleReserve::Reserved { .. } => {}
        other => panic!("expected Reserved, got {:?}", other),
    }
}

#[tokio::test]
async fn toggle_reserve_reports_full_as_data() {
    let campus = campus().await;
    let (directory, engagement) = services(&campus);

    let event = directory
        .create(draft(&campus, CapacityMode::Limited(2)))
        .await
        .unwrap();

    for _ in 0..2 {
        match engagement.toggle_reserve(Uuid::new_v4(), event.id).await.unwrap() {
            ToggleReserve::Reserved { .. } => {}
            other => panic!("expected Reserved, got {:?}", other),
        }
    }

    match engagement.toggle_reserve(Uuid::new_v4(), event.id).await.unwrap() {
        ToggleReserve::Full => {}
        other => panic!("expected Full, got {:?}", other),
    }
}

#[tokio::test]
async fn toggle_reserve_on_open_event_reports_not_reservable() {
    let campus = campus().await;
    let (directory, engagement) = services(&campus);

    let event = directory
        .create(draft(&campus, CapacityMode::Unlimited))
        .await
        .unwrap();

    match engagement.toggle_reserve(Uuid::new_v4(), event.id).await.unwrap() {
        ToggleReserve::NotReservable => {}
        other => panic!("expected NotReservable, got {:?}", other),
    }
}

#[tokio::test]
async fn reservations_for_lists_confirmed_only() {
    let campus = campus().await;
    let (directory, engagement) = services(&campus);

    let first = directory
        .create(draft(&campus, CapacityMode::Limited(5)))
        .await
        .unwrap();
    let second = directory
        .create(draft(&campus, CapacityMode::Limited(5)))
        .await
        .unwrap();
    let alice = Uuid::new_v4();

    engagement.toggle_reserve(alice, first.id).await.unwrap();
    engagement.toggle_reserve(alice, second.id).await.unwrap();
    // Cancel the first; its row flips but stays in storage.
    engagement.toggle_reserve(alice, first.id).await.unwrap();

    let mine = engagement.reservations_for(alice).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].event_id, second.id);

    assert_eq!(campus.store.reservations_for_user(alice).await.unwrap().len(), 2);
}
