// Persistence port. The services depend on this trait only; the two
// implementations (Postgres for deployment, SQLite for tests and local
// runs) keep identical semantics, including the conditional seat update.

mod postgres;
mod sqlite;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

use crate::error::AppResult;
use crate::models::{
    Announcement, Building, BuildingId, Category, CategoryId, Club, ClubId, ClubMembership, Event,
    EventId, EventSave, Notification, NotificationId, Reservation, ReservationId, UserId,
};
use async_trait::async_trait;

/// Result of the transactional seat reservation: either the counter
/// increment and the reservation insert both committed, or the capacity
/// guard refused the increment and nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatTxn {
    Applied,
    Full,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Create the schema if it does not exist yet.
    async fn init(&self) -> AppResult<()>;

    // Events. Rows are never deleted; cancellation is a flag flip so
    // reservation and save history stays intact.
    async fn insert_event(&self, event: &Event) -> AppResult<()>;
    async fn get_event(&self, id: EventId) -> AppResult<Option<Event>>;
    async fn list_events(&self) -> AppResult<Vec<Event>>;
    /// Returns false when no such event exists.
    async fn set_event_cancelled(&self, id: EventId) -> AppResult<bool>;
    async fn set_event_cover_image(&self, id: EventId, uri: &str) -> AppResult<bool>;

    // Reservations. `reserve_seat` must be an atomically-applied unit:
    // the counter increment is guarded by
    // `current_reservations < max_capacity` and commits together with the
    // row insert, so concurrent calls can never overshoot the ceiling.
    async fn reserve_seat(&self, reservation: &Reservation) -> AppResult<SeatTxn>;
    /// Flips the reservation to cancelled and applies a floored decrement
    /// to the event counter, in one transaction.
    async fn release_seat(&self, reservation_id: ReservationId, event_id: EventId)
        -> AppResult<()>;
    async fn find_confirmed_reservation(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Option<Reservation>>;
    async fn reservations_for_user(&self, user_id: UserId) -> AppResult<Vec<Reservation>>;
    async fn confirmed_reservations_for_event(
        &self,
        event_id: EventId,
    ) -> AppResult<Vec<Reservation>>;

    // Saves.
    async fn insert_save(&self, save: &EventSave) -> AppResult<()>;
    /// Returns false when there was nothing to delete.
    async fn delete_save(&self, user_id: UserId, event_id: EventId) -> AppResult<bool>;
    async fn find_save(&self, user_id: UserId, event_id: EventId)
        -> AppResult<Option<EventSave>>;
    async fn saves_for_user(&self, user_id: UserId) -> AppResult<Vec<EventSave>>;
    async fn saves_for_event(&self, event_id: EventId) -> AppResult<Vec<EventSave>>;

    // Clubs and memberships. The insert/delete of a membership row and the
    // member_count adjustment commit in the same transaction.
    async fn insert_club(&self, club: &Club) -> AppResult<()>;
    async fn get_club(&self, id: ClubId) -> AppResult<Option<Club>>;
    async fn list_clubs(&self) -> AppResult<Vec<Club>>;
    async fn set_club_cover_image(&self, id: ClubId, uri: &str) -> AppResult<bool>;
    /// Insert-if-absent; returns false when the (user, club) row already
    /// existed and nothing was written.
    async fn insert_membership(&self, membership: &ClubMembership) -> AppResult<bool>;
    /// Delete-if-present; returns false when no row matched.
    async fn delete_membership(&self, user_id: UserId, club_id: ClubId) -> AppResult<bool>;
    async fn find_membership(
        &self,
        user_id: UserId,
        club_id: ClubId,
    ) -> AppResult<Option<ClubMembership>>;
    async fn memberships_for_user(&self, user_id: UserId) -> AppResult<Vec<ClubMembership>>;
    async fn memberships_for_club(&self, club_id: ClubId) -> AppResult<Vec<ClubMembership>>;

    // Reference data.
    async fn insert_building(&self, building: &Building) -> AppResult<()>;
    async fn get_building(&self, id: BuildingId) -> AppResult<Option<Building>>;
    async fn list_buildings(&self) -> AppResult<Vec<Building>>;
    async fn insert_category(&self, category: &Category) -> AppResult<()>;
    async fn get_category(&self, id: CategoryId) -> AppResult<Option<Category>>;
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    // Announcements.
    async fn insert_announcement(&self, announcement: &Announcement) -> AppResult<()>;
    async fn announcements_for_club(&self, club_id: ClubId) -> AppResult<Vec<Announcement>>;
    async fn list_announcements(&self) -> AppResult<Vec<Announcement>>;

    // Notifications.
    async fn insert_notification(&self, notification: &Notification) -> AppResult<()>;
    async fn notifications_for_user(&self, user_id: UserId) -> AppResult<Vec<Notification>>;
    /// Returns false when no such notification exists.
    async fn mark_notification_read(&self, id: NotificationId) -> AppResult<bool>;
}
