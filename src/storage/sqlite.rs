// SQLite implementation of the storage port. Used by the test suite
// (`sqlite::memory:`) and for single-node local runs. Ids are stored as
// hyphenated TEXT and tags as a JSON array string.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    Announcement, Building, BuildingId, CapacityMode, Category, CategoryId, Club, ClubId,
    ClubMembership, Event, EventId, EventSave, MemberRole, Notification, NotificationId,
    NotificationKind, Reservation, ReservationId, ReservationStatus, UserId,
};
use crate::storage::{SeatTxn, Store};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        // An in-memory database exists per connection; cap the pool at one
        // connection so every query sees the same database.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect(database_url)
                .await?
        } else {
            SqlitePool::connect(database_url).await?
        };
        Ok(SqliteStore { pool })
    }
}

fn parse_id(value: String) -> AppResult<Uuid> {
    Uuid::parse_str(&value)
        .map_err(|e| AppError::DatabaseError(format!("Malformed id {}: {}", value, e)))
}

fn decode_tags(raw: String) -> AppResult<Vec<String>> {
    serde_json::from_str(&raw)
        .map_err(|e| AppError::DatabaseError(format!("Malformed tag array: {}", e)))
}

fn event_from_row(row: &SqliteRow) -> AppResult<Event> {
    let capacity = if row.get::<bool, _>("has_limited_capacity") {
        let max: Option<i32> = row.get("max_capacity");
        CapacityMode::Limited(max.ok_or_else(|| {
            AppError::DatabaseError("Limited-capacity event without max_capacity".to_string())
        })?)
    } else {
        CapacityMode::Unlimited
    };

    Ok(Event {
        id: parse_id(row.get("id"))?,
        title: row.get("title"),
        description: row.get("description"),
        club_id: parse_id(row.get("club_id"))?,
        building_id: parse_id(row.get("building_id"))?,
        category_id: parse_id(row.get("category_id"))?,
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        room: row.get("room"),
        capacity,
        current_reservations: row.get("current_reservations"),
        has_food: row.get("has_food"),
        food_description: row.get("food_description"),
        tags: decode_tags(row.get("tags"))?,
        cancelled: row.get("cancelled"),
        cover_image: row.get("cover_image"),
    })
}

fn reservation_from_row(row: &SqliteRow) -> AppResult<Reservation> {
    let status: String = row.get("status");
    Ok(Reservation {
        id: parse_id(row.get("id"))?,
        user_id: parse_id(row.get("user_id"))?,
        event_id: parse_id(row.get("event_id"))?,
        reserved_at: row.get("reserved_at"),
        status: ReservationStatus::parse(&status)
            .ok_or_else(|| AppError::DatabaseError(format!("Unknown status {}", status)))?,
    })
}

fn save_from_row(row: &SqliteRow) -> AppResult<EventSave> {
    Ok(EventSave {
        id: parse_id(row.get("id"))?,
        user_id: parse_id(row.get("user_id"))?,
        event_id: parse_id(row.get("event_id"))?,
        saved_at: row.get("saved_at"),
    })
}

fn membership_from_row(row: &SqliteRow) -> AppResult<ClubMembership> {
    let role: String = row.get("role");
    Ok(ClubMembership {
        id: parse_id(row.get("id"))?,
        user_id: parse_id(row.get("user_id"))?,
        club_id: parse_id(row.get("club_id"))?,
        role: MemberRole::parse(&role)
            .ok_or_else(|| AppError::DatabaseError(format!("Unknown role {}", role)))?,
        joined_at: row.get("joined_at"),
    })
}

fn club_from_row(row: &SqliteRow) -> AppResult<Club> {
    Ok(Club {
        id: parse_id(row.get("id"))?,
        name: row.get("name"),
        description: row.get("description"),
        category_id: parse_id(row.get("category_id"))?,
        member_count: row.get("member_count"),
        image_color: row.get("image_color"),
        contact_email: row.get("contact_email"),
        website: row.get("website"),
        instagram: row.get("instagram"),
        cover_image: row.get("cover_image"),
    })
}

fn building_from_row(row: &SqliteRow) -> AppResult<Building> {
    Ok(Building {
        id: parse_id(row.get("id"))?,
        name: row.get("name"),
        abbreviation: row.get("abbreviation"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        address: row.get("address"),
    })
}

fn category_from_row(row: &SqliteRow) -> AppResult<Category> {
    Ok(Category {
        id: parse_id(row.get("id"))?,
        name: row.get("name"),
        icon: row.get("icon"),
    })
}

fn announcement_from_row(row: &SqliteRow) -> AppResult<Announcement> {
    Ok(Announcement {
        id: parse_id(row.get("id"))?,
        club_id: parse_id(row.get("club_id"))?,
        title: row.get("title"),
        body: row.get("body"),
        created_at: row.get("created_at"),
    })
}

fn notification_from_row(row: &SqliteRow) -> AppResult<Notification> {
    let kind: String = row.get("kind");
    let related: Option<String> = row.get("related_id");
    Ok(Notification {
        id: parse_id(row.get("id"))?,
        user_id: parse_id(row.get("user_id"))?,
        kind: NotificationKind::parse(&kind)
            .ok_or_else(|| AppError::DatabaseError(format!("Unknown kind {}", kind)))?,
        title: row.get("title"),
        body: row.get("body"),
        read: row.get("read"),
        created_at: row.get("created_at"),
        related_id: related.map(parse_id).transpose()?,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn init(&self) -> AppResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                club_id TEXT NOT NULL,
                building_id TEXT NOT NULL,
                category_id TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                room TEXT NOT NULL,
                has_limited_capacity INTEGER NOT NULL DEFAULT 0,
                max_capacity INTEGER,
                current_reservations INTEGER NOT NULL DEFAULT 0,
                has_food INTEGER NOT NULL DEFAULT 0,
                food_description TEXT,
                tags TEXT NOT NULL DEFAULT '[]',
                cancelled INTEGER NOT NULL DEFAULT 0,
                cover_image TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS reservations (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                event_id TEXT NOT NULL,
                reserved_at TEXT NOT NULL,
                status TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        // One confirmed reservation per (user, event); cancelled history rows
        // stay out of the index.
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_reservations_confirmed
             ON reservations(user_id, event_id) WHERE status = 'confirmed'",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS event_saves (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                event_id TEXT NOT NULL,
                saved_at TEXT NOT NULL,
                UNIQUE(user_id, event_id)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS clubs (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                category_id TEXT NOT NULL,
                member_count INTEGER NOT NULL DEFAULT 0,
                image_color TEXT NOT NULL,
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
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                club_id TEXT NOT NULL,
                role TEXT NOT NULL,
                joined_at TEXT NOT NULL,
                UNIQUE(user_id, club_id)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS buildings (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                abbreviation TEXT NOT NULL,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                address TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                icon TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS announcements (
                id TEXT PRIMARY KEY,
                club_id TEXT NOT NULL,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS notifications (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                read INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                related_id TEXT
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
        let tags = serde_json::to_string(&event.tags)
            .map_err(|e| AppError::Internal(format!("Tag encoding failed: {}", e)))?;
        sqlx::query(
            "INSERT INTO events (id, title, description, club_id, building_id, category_id,
                start_time, end_time, room, has_limited_capacity, max_capacity,
                current_reservations, has_food, food_description, tags, cancelled, cover_image)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(event.id.to_string())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.club_id.to_string())
        .bind(event.building_id.to_string())
        .bind(event.category_id.to_string())
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.room)
        .bind(event.capacity.is_limited())
        .bind(event.capacity.limit())
        .bind(event.current_reservations)
        .bind(event.has_food)
        .bind(&event.food_description)
        .bind(tags)
        .bind(event.cancelled)
        .bind(&event.cover_image)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_event(&self, id: EventId) -> AppResult<Option<Event>> {
        let row = sqlx::query("SELECT * FROM events WHERE id = ?")
            .bind(id.to_string())
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
        let result = sqlx::query("UPDATE events SET cancelled = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_event_cover_image(&self, id: EventId, uri: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE events SET cover_image = ? WHERE id = ?")
            .bind(uri)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reserve_seat(&self, reservation: &Reservation) -> AppResult<SeatTxn> {
        let mut tx = self.pool.begin().await?;

        // The guard and the increment are one statement; a concurrent
        // reserve that would overshoot the ceiling matches zero rows.
        let updated = sqlx::query(
            "UPDATE events
             SET current_reservations = current_reservations + 1
             WHERE id = ? AND cancelled = 0 AND has_limited_capacity = 1
               AND current_reservations < max_capacity",
        )
        .bind(reservation.event_id.to_string())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(SeatTxn::Full);
        }

        sqlx::query(
            "INSERT INTO reservations (id, user_id, event_id, reserved_at, status)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(reservation.id.to_string())
        .bind(reservation.user_id.to_string())
        .bind(reservation.event_id.to_string())
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

        sqlx::query("UPDATE reservations SET status = 'cancelled' WHERE id = ?")
            .bind(reservation_id.to_string())
            .execute(&mut *tx)
            .await?;

        // Floored at zero even if the counter has drifted.
        sqlx::query(
            "UPDATE events SET current_reservations = current_reservations - 1
             WHERE id = ? AND current_reservations > 0",
        )
        .bind(event_id.to_string())
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
             WHERE user_id = ? AND event_id = ? AND status = 'confirmed'",
        )
        .bind(user_id.to_string())
        .bind(event_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(reservation_from_row).transpose()
    }

    async fn reservations_for_user(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query(
            "SELECT * FROM reservations WHERE user_id = ? ORDER BY reserved_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(reservation_from_row).collect()
    }

    async fn confirmed_reservations_for_event(
        &self,
        event_id: EventId,
    ) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query(
            "SELECT * FROM reservations WHERE event_id = ? AND status = 'confirmed'",
        )
        .bind(event_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(reservation_from_row).collect()
    }

    async fn insert_save(&self, save: &EventSave) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO event_saves (id, user_id, event_id, saved_at) VALUES (?, ?, ?, ?)",
        )
        .bind(save.id.to_string())
        .bind(save.user_id.to_string())
        .bind(save.event_id.to_string())
        .bind(save.saved_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_save(&self, user_id: UserId, event_id: EventId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM event_saves WHERE user_id = ? AND event_id = ?")
            .bind(user_id.to_string())
            .bind(event_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_save(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<Option<EventSave>> {
        let row = sqlx::query("SELECT * FROM event_saves WHERE user_id = ? AND event_id = ?")
            .bind(user_id.to_string())
            .bind(event_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(save_from_row).transpose()
    }

    async fn saves_for_user(&self, user_id: UserId) -> AppResult<Vec<EventSave>> {
        let rows = sqlx::query("SELECT * FROM event_saves WHERE user_id = ? ORDER BY saved_at DESC")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(save_from_row).collect()
    }

    async fn saves_for_event(&self, event_id: EventId) -> AppResult<Vec<EventSave>> {
        let rows = sqlx::query("SELECT * FROM event_saves WHERE event_id = ?")
            .bind(event_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(save_from_row).collect()
    }

    async fn insert_club(&self, club: &Club) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO clubs (id, name, description, category_id, member_count, image_color,
                contact_email, website, instagram, cover_image)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(club.id.to_string())
        .bind(&club.name)
        .bind(&club.description)
        .bind(club.category_id.to_string())
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
        let row = sqlx::query("SELECT * FROM clubs WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(club_from_row).transpose()
    }

    async fn list_clubs(&self) -> AppResult<Vec<Club>> {
        let rows = sqlx::query("SELECT * FROM clubs ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(club_from_row).collect()
    }

    async fn set_club_cover_image(&self, id: ClubId, uri: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE clubs SET cover_image = ? WHERE id = ?")
            .bind(uri)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_membership(&self, membership: &ClubMembership) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO club_memberships (id, user_id, club_id, role, joined_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(membership.id.to_string())
        .bind(membership.user_id.to_string())
        .bind(membership.club_id.to_string())
        .bind(membership.role.as_str())
        .bind(membership.joined_at)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE clubs SET member_count = member_count + 1 WHERE id = ?")
            .bind(membership.club_id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete_membership(&self, user_id: UserId, club_id: ClubId) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            "DELETE FROM club_memberships WHERE user_id = ? AND club_id = ?",
        )
        .bind(user_id.to_string())
        .bind(club_id.to_string())
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "UPDATE clubs SET member_count = member_count - 1
             WHERE id = ? AND member_count > 0",
        )
        .bind(club_id.to_string())
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
        let row = sqlx::query("SELECT * FROM club_memberships WHERE user_id = ? AND club_id = ?")
            .bind(user_id.to_string())
            .bind(club_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(membership_from_row).transpose()
    }

    async fn memberships_for_user(&self, user_id: UserId) -> AppResult<Vec<ClubMembership>> {
        let rows = sqlx::query(
            "SELECT * FROM club_memberships WHERE user_id = ? ORDER BY joined_at",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(membership_from_row).collect()
    }

    async fn memberships_for_club(&self, club_id: ClubId) -> AppResult<Vec<ClubMembership>> {
        let rows = sqlx::query(
            "SELECT * FROM club_memberships WHERE club_id = ? ORDER BY joined_at",
        )
        .bind(club_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(membership_from_row).collect()
    }

    async fn insert_building(&self, building: &Building) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO buildings (id, name, abbreviation, latitude, longitude, address)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(building.id.to_string())
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
        let row = sqlx::query("SELECT * FROM buildings WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(building_from_row).transpose()
    }

    async fn list_buildings(&self) -> AppResult<Vec<Building>> {
        let rows = sqlx::query("SELECT * FROM buildings ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(building_from_row).collect()
    }

    async fn insert_category(&self, category: &Category) -> AppResult<()> {
        sqlx::query("INSERT INTO categories (id, name, icon) VALUES (?, ?, ?)")
            .bind(category.id.to_string())
            .bind(&category.name)
            .bind(&category.icon)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_category(&self, id: CategoryId) -> AppResult<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(category_from_row).transpose()
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(category_from_row).collect()
    }

    async fn insert_announcement(&self, announcement: &Announcement) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO announcements (id, club_id, title, body, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(announcement.id.to_string())
        .bind(announcement.club_id.to_string())
        .bind(&announcement.title)
        .bind(&announcement.body)
        .bind(announcement.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn announcements_for_club(&self, club_id: ClubId) -> AppResult<Vec<Announcement>> {
        let rows = sqlx::query(
            "SELECT * FROM announcements WHERE club_id = ? ORDER BY created_at DESC",
        )
        .bind(club_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(announcement_from_row).collect()
    }

    async fn list_announcements(&self) -> AppResult<Vec<Announcement>> {
        let rows = sqlx::query("SELECT * FROM announcements ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(announcement_from_row).collect()
    }

    async fn insert_notification(&self, notification: &Notification) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO notifications (id, user_id, kind, title, body, read, created_at, related_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(notification.id.to_string())
        .bind(notification.user_id.to_string())
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(notification.read)
        .bind(notification.created_at)
        .bind(notification.related_id.map(|id| id.to_string()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn notifications_for_user(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT * FROM notifications WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(notification_from_row).collect()
    }

    async fn mark_notification_read(&self, id: NotificationId) -> AppResult<bool> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
