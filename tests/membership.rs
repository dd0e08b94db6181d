mod common;

use uuid::Uuid;

use campus_events::models::MemberRole;
use campus_events::services::MembershipRegistry;
use campus_events::AppError;
use common::{campus, seed_member};

#[tokio::test]
async fn join_twice_counts_once() {
    let campus = campus().await;
    let registry = MembershipRegistry::new(campus.store.clone());

    let alice = Uuid::new_v4();
    let first = registry.join(alice, campus.club.id).await.unwrap();
    let second = registry.join(alice, campus.club.id).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.role, MemberRole::Member);

    let club = campus.store.get_club(campus.club.id).await.unwrap().unwrap();
    assert_eq!(club.member_count, 1);
}

#[tokio::test]
async fn leave_decrements_and_absent_leave_is_noop() {
    let campus = campus().await;
    let registry = MembershipRegistry::new(campus.store.clone());

    let alice = Uuid::new_v4();
    registry.join(alice, campus.club.id).await.unwrap();
    assert!(registry.leave(alice, campus.club.id).await.unwrap());

    let club = campus.store.get_club(campus.club.id).await.unwrap().unwrap();
    assert_eq!(club.member_count, 0);

    // Leaving again changes nothing; the count never goes negative.
    assert!(!registry.leave(alice, campus.club.id).await.unwrap());
    let club = campus.store.get_club(campus.club.id).await.unwrap().unwrap();
    assert_eq!(club.member_count, 0);
}

#[tokio::test]
async fn member_count_tracks_roster_through_churn() {
    let campus = campus().await;
    let registry = MembershipRegistry::new(campus.store.clone());

    let users: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
    for user in &users {
        registry.join(*user, campus.club.id).await.unwrap();
    }
    registry.leave(users[0], campus.club.id).await.unwrap();
    registry.leave(users[1], campus.club.id).await.unwrap();
    registry.join(users[0], campus.club.id).await.unwrap();

    let roster = registry.members_of(campus.club.id).await.unwrap();
    let club = campus.store.get_club(campus.club.id).await.unwrap().unwrap();
    assert_eq!(club.member_count as usize, roster.len());
    assert_eq!(club.member_count, 4);
}

#[tokio::test]
async fn role_lookup_and_officer_predicate() {
    let campus = campus().await;
    let registry = MembershipRegistry::new(campus.store.clone());

    let (alice, bob, eve) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    registry.join(alice, campus.club.id).await.unwrap();
    seed_member(&campus, bob, MemberRole::President).await;

    assert_eq!(
        registry.role_of(alice, campus.club.id).await.unwrap(),
        Some(MemberRole::Member)
    );
    assert_eq!(
        registry.role_of(bob, campus.club.id).await.unwrap(),
        Some(MemberRole::President)
    );
    assert_eq!(registry.role_of(eve, campus.club.id).await.unwrap(), None);

    assert!(!registry.is_officer(alice, campus.club.id).await.unwrap());
    assert!(registry.is_officer(bob, campus.club.id).await.unwrap());
    assert!(!registry.is_officer(eve, campus.club.id).await.unwrap());
}

#[tokio::test]
async fn joining_missing_club_is_not_found() {
    let campus = campus().await;
    let registry = MembershipRegistry::new(campus.store.clone());

    match registry.join(Uuid::new_v4(), Uuid::new_v4()).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {:?}", other.map(|m| m.id)),
    }
}

#[tokio::test]
async fn join_emits_membership_notification() {
    let campus = campus().await;
    let registry = MembershipRegistry::new(campus.store.clone());

    let alice = Uuid::new_v4();
    registry.join(alice, campus.club.id).await.unwrap();
    // Idempotent re-join does not notify again.
    registry.join(alice, campus.club.id).await.unwrap();

    let notes = campus.store.notifications_for_user(alice).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(
        notes[0].kind,
        campus_events::models::NotificationKind::Membership
    );
}
