// Domain model - campus events, clubs, and the engagement rows that tie
// users to them. Everything here is plain data; the services own the rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// All entities are keyed by UUID. The aliases keep signatures readable;
// nothing enforces cross-type separation beyond the field names.
pub type UserId = Uuid;
pub type EventId = Uuid;
pub type ClubId = Uuid;
pub type BuildingId = Uuid;
pub type CategoryId = Uuid;
pub type ReservationId = Uuid;
pub type SaveId = Uuid;
pub type MembershipId = Uuid;
pub type AnnouncementId = Uuid;
pub type NotificationId = Uuid;

/// Capacity mode of an event. `Limited` carries the seat ceiling; open
/// events never track reservations at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "capacity_mode", content = "max_capacity", rename_all = "snake_case")]
pub enum CapacityMode {
    Unlimited,
    Limited(i32),
}

impl CapacityMode {
    pub fn is_limited(&self) -> bool {
        matches!(self, CapacityMode::Limited(_))
    }

    /// Seat ceiling, if any.
    pub fn limit(&self) -> Option<i32> {
        match self {
            CapacityMode::Unlimited => None,
            CapacityMode::Limited(max) => Some(*max),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub club_id: ClubId,
    pub building_id: BuildingId,
    pub category_id: CategoryId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub room: String,
    #[serde(flatten)]
    pub capacity: CapacityMode,
    pub current_reservations: i32,
    pub has_food: bool,
    pub food_description: Option<String>,
    pub tags: Vec<String>,
    pub cancelled: bool,
    pub cover_image: Option<String>,
}

impl Event {
    /// Whether the event is running at `now` (inclusive on both ends).
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now && now <= self.end_time
    }

    /// Active events are the ones every "upcoming" listing shows:
    /// not cancelled and not yet ended.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.cancelled && self.end_time > now
    }
}

/// Input for event creation. The directory validates structure before any
/// row is written; ids, the reservation counter, and the cancelled flag are
/// assigned at persist time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub club_id: ClubId,
    pub building_id: BuildingId,
    pub category_id: CategoryId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub room: String,
    #[serde(flatten)]
    pub capacity: CapacityMode,
    #[serde(default)]
    pub has_food: bool,
    #[serde(default)]
    pub food_description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(ReservationStatus::Confirmed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }
}

/// A user's claim on one seat of a capacity-limited event. Cancelling flips
/// the status; rows are never deleted, preserving history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub reserved_at: DateTime<Utc>,
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn confirmed(user_id: UserId, event_id: EventId, now: DateTime<Utc>) -> Self {
        Reservation {
            id: Uuid::new_v4(),
            user_id,
            event_id,
            reserved_at: now,
            status: ReservationStatus::Confirmed,
        }
    }
}

/// A bookmark on an event, independent of any reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSave {
    pub id: SaveId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Member,
    Admin,
    President,
}

impl MemberRole {
    /// Officers get the admin badge and may create/cancel events and post
    /// announcements for their club.
    pub fn is_officer(&self) -> bool {
        matches!(self, MemberRole::Admin | MemberRole::President)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Member => "member",
            MemberRole::Admin => "admin",
            MemberRole::President => "president",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "member" => Some(MemberRole::Member),
            "admin" => Some(MemberRole::Admin),
            "president" => Some(MemberRole::President),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubMembership {
    pub id: MembershipId,
    pub user_id: UserId,
    pub club_id: ClubId,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub description: String,
    pub category_id: CategoryId,
    // Maintained by the membership registry, never recomputed on read.
    pub member_count: i32,
    pub image_color: String,
    pub contact_email: String,
    pub website: String,
    pub instagram: String,
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub name: String,
    pub abbreviation: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    // Opaque icon identifier; the UI layer decides how to render it.
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub club_id: ClubId,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    EventChange,
    Reservation,
    Announcement,
    Membership,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::EventChange => "event_change",
            NotificationKind::Reservation => "reservation",
            NotificationKind::Announcement => "announcement",
            NotificationKind::Membership => "membership",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "event_change" => Some(NotificationKind::EventChange),
            "reservation" => Some(NotificationKind::Reservation),
            "announcement" => Some(NotificationKind::Announcement),
            "membership" => Some(NotificationKind::Membership),
            _ => None,
        }
    }
}

/// In-app notification row. The core only produces these; delivery is the
/// caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub related_id: Option<Uuid>,
}

impl Notification {
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        related_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Self {
        Notification {
            id: Uuid::new_v4(),
            user_id,
            kind,
            title: title.into(),
            body: body.into(),
            read: false,
            created_at: now,
            related_id,
        }
    }
}
