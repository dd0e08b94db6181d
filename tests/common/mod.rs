// Shared fixtures: an in-memory store seeded with one category, building,
// and club, plus a default event draft builder.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use campus_events::models::{
    Building, CapacityMode, Category, Club, ClubMembership, EventDraft, MemberRole, UserId,
};
use campus_events::storage::{SqliteStore, Store};

pub struct Campus {
    pub store: Arc<dyn Store>,
    pub category: Category,
    pub building: Building,
    pub club: Club,
}

pub async fn campus() -> Campus {
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
    store.init().await.unwrap();
    let store: Arc<dyn Store> = Arc::new(store);

    let category = Category {
        id: Uuid::new_v4(),
        name: "Academic".to_string(),
        icon: "book".to_string(),
    };
    store.insert_category(&category).await.unwrap();

    let building = Building {
        id: Uuid::new_v4(),
        name: "Talmage Building".to_string(),
        abbreviation: "TMCB".to_string(),
        latitude: 40.2498,
        longitude: -111.6508,
        address: "1234 Campus Dr".to_string(),
    };
    store.insert_building(&building).await.unwrap();

    let club = Club {
        id: Uuid::new_v4(),
        name: "Robotics Club".to_string(),
        description: "We build robots".to_string(),
        category_id: category.id,
        member_count: 0,
        image_color: "#FF6B6B".to_string(),
        contact_email: "robotics@campus.edu".to_string(),
        website: String::new(),
        instagram: String::new(),
        cover_image: None,
    };
    store.insert_club(&club).await.unwrap();

    Campus {
        store,
        category,
        building,
        club,
    }
}

/// Draft for an event starting tomorrow, two hours long.
pub fn draft(campus: &Campus, capacity: CapacityMode) -> EventDraft {
    let start = Utc::now() + Duration::days(1);
    draft_at(campus, capacity, start, start + Duration::hours(2))
}

pub fn draft_at(
    campus: &Campus,
    capacity: CapacityMode,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> EventDraft {
    EventDraft {
        title: "Robot Demo Night".to_string(),
        description: "Line followers and sumo bots".to_string(),
        club_id: campus.club.id,
        building_id: campus.building.id,
        category_id: campus.category.id,
        start_time: start,
        end_time: end,
        room: "1170".to_string(),
        capacity,
        has_food: false,
        food_description: None,
        tags: vec!["robotics".to_string(), "demo".to_string()],
        cover_image: None,
    }
}

/// Seed a membership row directly with the given role, bypassing the
/// registry's member-role default.
pub async fn seed_member(campus: &Campus, user_id: UserId, role: MemberRole) {
    let membership = ClubMembership {
        id: Uuid::new_v4(),
        user_id,
        club_id: campus.club.id,
        role,
        joined_at: Utc::now(),
    };
    assert!(campus.store.insert_membership(&membership).await.unwrap());
}
