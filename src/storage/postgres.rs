// PostgreSQL implementation of the storage port. This is the deployment
// backend; the conditional seat update relies on row-level locking of the
// single UPDATE, so two racing reserves serialize on the event row.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    Announcement, Building, BuildingId, CapacityMode, Category, CategoryId, Club, ClubId,
    ClubMembership, Event, EventId, EventSave, MemberRole, Notification, NotificationId,
    NotificationKind, Reservation, ReservationId, ReservationStatus, UserId,
};
use crate::storage::{SeatTxn, Store};

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(PostgresStore { pool })
    }

    pub async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn event_from_row(row: &PgRow) -> AppResult<Event> {
    let capacity = if row.get::<bool, _>("has_limited_capacity") {
        let max: Option<i32> = row.get("max_capacity");
        CapacityMode::Limited(max.ok_or_else(|| {
            AppError::DatabaseError("Limited-capacity event without max_capacity".to_string())
        })?)
    } else {
        CapacityMode::Unlimited
    };

    Ok(Event {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        club_id: row.get("club_id"),
        building_id: row.get("building_id"),
        category_id: row.get("category_id"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        room: row.get("room"),
        capacity,
        current_reservations: row.get("current_reservations"),
        has_food: row.get("has_food"),
        food_description: row.get("food_description"),
        tags: row.get("tags"),
        cancelled: row.get("cancelled"),
        cover_image: row.get("cover_image"),
    })
}

fn reservation_from_row(row: &PgRow) -> AppResult<Reservation> {
    let status: String = row.get("status");
    Ok(Reservation {
        id: row.get("id"),
        user_id: row.get("user_id"),
        event_id: row.get("event_id"),
        reserved_at: row.get("reserved_at"),
        status: ReservationStatus::parse(&status)
            .ok_or_else(|| AppError::DatabaseError(format!("Unknown status {}", status)))?,
    })
}

fn save_from_row(row: &PgRow) -> EventSave {
    EventSave {
        id: row.get("id"),
        user_id: row.get("user_id"),
        event_id: row.get("event_id"),
        saved_at: row.get("saved_at"),
    }
}

fn membership_from_row(row: &PgRow) -> AppResult<ClubMembership> {
    let role: String = row.get("role");
    Ok(ClubMembership {
        id: row.get("id"),
        user_id: row.get("user_id"),
        club_id: row.get("club_id"),
        role: MemberRole::parse(&role)
            .ok_or_else(|| AppError::DatabaseError(format!("Unknown role {}", role)))?,
        joined_at: row.get("joined_at"),
    })
}

fn club_from_row(row: &PgRow) -> Club {
    Club {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        category_id: row.get("category_id"),
        member_count: row.get("member_count"),
        image_color: row.get("image_color"),
        contact_email: row.get("contact_email"),
        website: row.get("website"),
        instagram: row.get("instagram"),
        cover_image: row.get("cover_image"),
    }
}

fn building_from_row(row: &PgRow) -> Building {
    Building {
        id: row.get("id"),
        name: row.get("name"),
        abbreviation: row.get("abbreviation"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        address: row.get("address"),
    }
}

fn category_from_row(row: &PgRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        icon: row.get("icon"),
    }
}

fn announcement_from_row(row: &PgRow) -> Announcement {
    Announcement {
        id: row.get("id"),
        club_id: row.get("club_id"),
        title: row.get("title"),
        body: row.get("body"),
        created_at: row.get("created_at"),
    }
}

fn notification_from_row(row: &PgRow) -> AppResult<Notification> {
    let kind: String = row.get("kind");
    Ok(Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: NotificationKind::parse(&kind)
            .ok_or_else(|| AppError::DatabaseError(format!("Unknown kind {}", kind)))?,
        title: row.get("title"),
        body: row.get("body"),
        read: row.get("read"),
        created_at: row.get("created_at"),
        related_id: row.get::<Option<Uuid>, _>("related_id"),
    })
}

#[async_trait]
impl Store for PostgresStore {
    async fn init(&self) -> AppResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS events (
                id UUID PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                club_id UUID NOT NULL,
                building_id UUID NOT NULL,
                category_id UUID NOT NULL,
                start_time TIMESTAMPTZ NOT NULL,
                end_time TIMESTAMPTZ NOT NULL,
                room TEXT NOT NULL,
                has_limited_capacity BOOLEAN NOT NULL DEFAULT FALSE,
                max_capacity INTEGER,
                current_reservations INTEGER NOT NULL DEFAULT 0,
                has_food BOOLEAN NOT NULL DEFAULT FALSE,
                food_description TEXT,
                tags TEXT[] NOT NULL DEFAULT '{}',
                cancelled BOOLEAN NOT NULL DEFAULT FALSE,
                cover_image TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS reservations (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL,
                event_id UUID NOT NULL,
                reserved_at TIMESTAMPTZ NOT NULL,
                status VARCHAR(20) NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_reservations_confirmed
             ON reservations(user_id, event_id) WHERE status = 'confirmed'",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS event_saves (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL,
                event_id UUID NOT NULL,
                saved_at TIMESTAMPTZ NOT NULL,
                UNIQUE(user_id, event_id)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS clubs (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                category_id UUID NOT NULL,
                member_count INTEGER NOT NULL DEFAULT 0,
                image_color VARCHAR(32) NOT NULL,
                contact_email TEXT NOT NULL,
                website TEXT NOT NULL DEFAULT '',
                instagram TEXT NOT NULL DEFAULT '',
                cover_image TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS club_memberships (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL,
                club_id UUID NOT NULL,
                role VARCHAR(20) NOT NULL,
                joined_at TIMESTAMPTZ NOT NULL,
                UNIQUE(user_id, club_id)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS buildings (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                abbreviation VARCHAR(16) NOT NULL,
                latitude DOUBLE PRECISION NOT NULL,
                longitude DOUBLE PRECISION NOT NULL,
                address TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS categories (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                icon VARCHAR(64) NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS announcements (
                id UUID PRIMARY KEY,
                club_id UUID NOT NULL,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS notifications (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL,
                kind VARCHAR(50) NOT NULL,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                read BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL,
                related_id UUID
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_club ON events(club_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reservations_event ON reservations(event_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_saves_event ON event_saves(event_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn insert_event(&self, event: &Event) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO events (id, title, description, club_id, building_id, category_id,
                start_time, end_time, room, has_limited_capacity, max_capacity,
                current_reservations, has_food, food_description, tags, cancelled, cover_image)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.club_id)
        .bind(event.building_id)
        .bind(event.category_id)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.room)
        .bind(event.capacity.is_limited())
        .bind(event.capacity.limit())
        .bind(event.current_reservations)
        .bind(event.has_food)
        .bind(&event.food_description)
        .bind(&event.tags)
        .bind(event.cancelled)
        .bind(&event.cover_image)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_event(&self, id: EventId) -> AppResult<Option<Event>> {
        let row = sqlx::query("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(event_from_row).transpose()
    }

    async fn list_events(&self) -> AppResult<Vec<Event>> {
        let rows = sqlx::query("SELECT * FROM events ORDER BY start_time")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(event_from_row).collect()
    }

    async fn set_event_cancelled(&self, id: EventId) -> AppResult<bool> {
        let result = sqlx::query("UPDATE events SET cancelled = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_event_cover_image(&self, id: EventId, uri: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE events SET cover_image = $1 WHERE id = $2")
            .bind(uri)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reserve_seat(&self, reservation: &Reservation) -> AppResult<SeatTxn> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE events
             SET current_reservations = current_reservations + 1
             WHERE id = $1 AND cancelled = FALSE AND has_limited_capacity = TRUE
               AND current_reservations < max_capacity",
        )
        .bind(reservation.event_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(SeatTxn::Full);
        }

        sqlx::query(
            "INSERT INTO reservations (id, user_id, event_id, reserved_at, status)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(reservation.id)
        .bind(reservation.user_id)
        .bind(reservation.event_id)
        .bind(reservation.reserved_at)
        .bind(reservation.status.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(SeatTxn::Applied)
    }

    async fn release_seat(
        &self,
        reservation_id: ReservationId,
        event_id: EventId,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE reservations SET status = 'cancelled' WHERE id = $1")
            .bind(reservation_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE events SET current_reservations = current_reservations - 1
             WHERE id = $1 AND current_reservations > 0",
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_confirmed_reservation(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Option<Reservation>> {
        let row = sqlx::query(
            "SELECT * FROM reservations
             WHERE user_id = $1 AND event_id = $2 AND status = 'confirmed'",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(reservation_from_row).transpose()
    }

    async fn reservations_for_user(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query(
            "SELECT * FROM reservations WHERE user_id = $1 ORDER BY reserved_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(reservation_from_row).collect()
    }

    async fn confirmed_reservations_for_event(
        &self,
        event_id: EventId,
    ) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query(
            "SELECT * FROM reservations WHERE event_id = $1 AND status = 'confirmed'",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(reservation_from_row).collect()
    }

    async fn insert_save(&self, save: &EventSave) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO event_saves (id, user_id, event_id, saved_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(save.id)
        .bind(save.user_id)
        .bind(save.event_id)
        .bind(save.saved_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_save(&self, user_id: UserId, event_id: EventId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM event_saves WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_save(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Option<EventSave>> {
        let row = sqlx::query("SELECT * FROM event_saves WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(save_from_row))
    }

    async fn saves_for_user(&self, user_id: UserId) -> AppResult<Vec<EventSave>> {
        let rows = sqlx::query(
            "SELECT * FROM event_saves WHERE user_id = $1 ORDER BY saved_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(save_from_row).collect())
    }

    async fn saves_for_event(&self, event_id: EventId) -> AppResult<Vec<EventSave>> {
        let rows = sqlx::query("SELECT * FROM event_saves WHERE event_id = $1")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(save_from_row).collect())
    }

    async fn insert_club(&self, club: &Club) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO clubs (id, name, description, category_id, member_count, image_color,
                contact_email, website, instagram, cover_image)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(club.id)
        .bind(&club.name)
        .bind(&club.description)
        .bind(club.category_id)
        .bind(club.member_count)
        .bind(&club.image_color)
        .bind(&club.contact_email)
        .bind(&club.website)
        .bind(&club.instagram)
        .bind(&club.cover_image)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_club(&self, id: ClubId) -> AppResult<Option<Club>> {
        let row = sqlx::query("SELECT * FROM clubs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(club_from_row))
    }

    async fn list_clubs(&self) -> AppResult<Vec<Club>> {
        let rows = sqlx::query("SELECT * FROM clubs ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(club_from_row).collect())
    }

    async fn set_club_cover_image(&self, id: ClubId, uri: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE clubs SET cover_image = $1 WHERE id = $2")
            .bind(uri)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_membership(&self, membership: &ClubMembership) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO club_memberships (id, user_id, club_id, role, joined_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id, club_id) DO NOTHING",
        )
        .bind(membership.id)
        .bind(membership.user_id)
        .bind(membership.club_id)
        .bind(membership.role.as_str())
        .bind(membership.joined_at)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE clubs SET member_count = member_count + 1 WHERE id = $1")
            .bind(membership.club_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete_membership(&self, user_id: UserId, club_id: ClubId) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            "DELETE FROM club_memberships WHERE user_id = $1 AND club_id = $2",
        )
        .bind(user_id)
        .bind(club_id)
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "UPDATE clubs SET member_count = member_count - 1
             WHERE id = $1 AND member_count > 0",
        )
        .bind(club_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn find_membership(
        &self,
        user_id: UserId,
        club_id: ClubId,
    ) -> AppResult<Option<ClubMembership>> {
        let row = sqlx::query(
            "SELECT * FROM club_memberships WHERE user_id = $1 AND club_id = $2",
        )
        .bind(user_id)
        .bind(club_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(membership_from_row).transpose()
    }

    async fn memberships_for_user(&self, user_id: UserId) -> AppResult<Vec<ClubMembership>> {
        let rows = sqlx::query(
            "SELECT * FROM club_memberships WHERE user_id = $1 ORDER BY joined_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(membership_from_row).collect()
    }

    async fn memberships_for_club(&self, club_id: ClubId) -> AppResult<Vec<ClubMembership>> {
        let rows = sqlx::query(
            "SELECT * FROM club_memberships WHERE club_id = $1 ORDER BY joined_at",
        )
        .bind(club_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(membership_from_row).collect()
    }

    async fn insert_building(&self, building: &Building) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO buildings (id, name, abbreviation, latitude, longitude, address)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(building.id)
        .bind(&building.name)
        .bind(&building.abbreviation)
        .bind(building.latitude)
        .bind(building.longitude)
        .bind(&building.address)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_building(&self, id: BuildingId) -> AppResult<Option<Building>> {
        let row = sqlx::query("SELECT * FROM buildings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(building_from_row))
    }

    async fn list_buildings(&self) -> AppResult<Vec<Building>> {
        let rows = sqlx::query("SELECT * FROM buildings ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(building_from_row).collect())
    }

    async fn insert_category(&self, category: &Category) -> AppResult<()> {
        sqlx::query("INSERT INTO categories (id, name, icon) VALUES ($1, $2, $3)")
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.icon)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_category(&self, id: CategoryId) -> AppResult<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(category_from_row))
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn insert_announcement(&self, announcement: &Announcement) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO announcements (id, club_id, title, body, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(announcement.id)
        .bind(announcement.club_id)
        .bind(&announcement.title)
        .bind(&announcement.body)
        .bind(announcement.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn announcements_for_club(&self, club_id: ClubId) -> AppResult<Vec<Announcement>> {
        let rows = sqlx::query(
            "SELECT * FROM announcements WHERE club_id = $1 ORDER BY created_at DESC",
        )
        .bind(club_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(announcement_from_row).collect())
    }

    async fn list_announcements(&self) -> AppResult<Vec<Announcement>> {
        let rows = sqlx::query("SELECT * FROM announcements ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(announcement_from_row).collect())
    }

    async fn insert_notification(&self, notification: &Notification) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO notifications (id, user_id, kind, title, body, read, created_at, related_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(notification.read)
        .bind(notification.created_at)
        .bind(notification.related_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn notifications_for_user(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(notification_from_row).collect()
    }

    async fn mark_notification_read(&self, id: NotificationId) -> AppResult<bool> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
