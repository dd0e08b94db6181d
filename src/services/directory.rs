// Event directory: read-side queries every screen uses, plus event
// creation and cancellation. Buildings and categories are immutable
// reference data and served through a small LRU cache.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::cache::Cache;
use crate::error::{AppError, AppResult};
use crate::models::{
    Building, BuildingId, Category, CategoryId, Club, ClubId, Event, EventDraft, EventId,
    Notification, NotificationKind, UserId,
};
use crate::storage::Store;

/// Display cap for event and club search results. Building results are
/// left uncapped; a campus has few buildings.
pub const SEARCH_RESULT_CAP: usize = 20;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub events: Vec<Event>,
    pub clubs: Vec<Club>,
    pub buildings: Vec<Building>,
}

#[derive(Clone)]
pub struct EventDirectory {
    store: Arc<dyn Store>,
    building_cache: Arc<Mutex<Cache<BuildingId, Building>>>,
    category_cache: Arc<Mutex<Cache<CategoryId, Category>>>,
}

impl EventDirectory {
    pub fn new(store: Arc<dyn Store>, cache_capacity: usize) -> Self {
        EventDirectory {
            store,
            building_cache: Arc::new(Mutex::new(Cache::new(cache_capacity))),
            category_cache: Arc::new(Mutex::new(Cache::new(cache_capacity))),
        }
    }

    /// Events that are not cancelled and have not ended, sorted in two
    /// tiers: running-now events first, then ascending start time.
    pub async fn active_events(&self, now: DateTime<Utc>) -> AppResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .store
            .list_events()
            .await?
            .into_iter()
            .filter(|e| e.is_active(now))
            .collect();
        events.sort_by(|a, b| {
            b.is_live(now)
                .cmp(&a.is_live(now))
                .then_with(|| a.start_time.cmp(&b.start_time))
        });
        Ok(events)
    }

    pub async fn by_club(&self, club_id: ClubId, now: DateTime<Utc>) -> AppResult<Vec<Event>> {
        Ok(self
            .active_events(now)
            .await?
            .into_iter()
            .filter(|e| e.club_id == club_id)
            .collect())
    }

    pub async fn by_building(
        &self,
        building_id: BuildingId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Event>> {
        Ok(self
            .active_events(now)
            .await?
            .into_iter()
            .filter(|e| e.building_id == building_id)
            .collect())
    }

    pub async fn by_category(
        &self,
        category_id: CategoryId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Event>> {
        Ok(self
            .active_events(now)
            .await?
            .into_iter()
            .filter(|e| e.category_id == category_id)
            .collect())
    }

    /// Case-insensitive substring search across events (title, description,
    /// tags, owning club name, building name and abbreviation), clubs, and
    /// buildings. A blank query matches nothing.
    pub async fn search(&self, query: &str, now: DateTime<Utc>) -> AppResult<SearchResults> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Ok(SearchResults::default());
        }
        let matches = |text: &str| text.to_lowercase().contains(&q);

        let clubs = self.store.list_clubs().await?;
        let buildings = self.store.list_buildings().await?;

        let events: Vec<Event> = self
            .active_events(now)
            .await?
            .into_iter()
            .filter(|e| {
                let club = clubs.iter().find(|c| c.id == e.club_id);
                let building = buildings.iter().find(|b| b.id == e.building_id);
                matches(&e.title)
                    || matches(&e.description)
                    || e.tags.iter().any(|t| matches(t))
                    || club.map_or(false, |c| matches(&c.name))
                    || building.map_or(false, |b| matches(&b.name) || matches(&b.abbreviation))
            })
            .take(SEARCH_RESULT_CAP)
            .collect();

        let clubs: Vec<Club> = clubs
            .into_iter()
            .filter(|c| matches(&c.name) || matches(&c.description))
            .take(SEARCH_RESULT_CAP)
            .collect();

        let buildings: Vec<Building> = buildings
            .into_iter()
            .filter(|b| matches(&b.name) || matches(&b.abbreviation))
            .collect();

        Ok(SearchResults {
            events,
            clubs,
            buildings,
        })
    }

    pub async fn get_event(&self, id: EventId) -> AppResult<Event> {
        self.store
            .get_event(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    /// Validate and persist a new event. New events always start with a
    /// zero reservation counter and `cancelled = false`; tags are trimmed
    /// and deduplicated.
    pub async fn create(&self, draft: EventDraft) -> AppResult<Event> {
        if draft.title.trim().is_empty() {
            return Err(AppError::InvalidEvent("Title is required".to_string()));
        }
        if draft.description.trim().is_empty() {
            return Err(AppError::InvalidEvent("Description is required".to_string()));
        }
        if draft.room.trim().is_empty() {
            return Err(AppError::InvalidEvent("Room is required".to_string()));
        }
        if draft.start_time >= draft.end_time {
            return Err(AppError::InvalidEvent(
                "Event must start before it ends".to_string(),
            ));
        }
        if let Some(max) = draft.capacity.limit() {
            if max <= 0 {
                return Err(AppError::InvalidEvent(
                    "Limited capacity requires a positive maximum".to_string(),
                ));
            }
        }

        if self.store.get_club(draft.club_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Club {} not found", draft.club_id)));
        }
        self.building(draft.building_id).await?;
        self.category(draft.category_id).await?;

        let mut seen = HashSet::new();
        let tags: Vec<String> = draft
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
            .collect();

        let event = Event {
            id: Uuid::new_v4(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            club_id: draft.club_id,
            building_id: draft.building_id,
            category_id: draft.category_id,
            start_time: draft.start_time,
            end_time: draft.end_time,
            room: draft.room.trim().to_string(),
            capacity: draft.capacity,
            current_reservations: 0,
            has_food: draft.has_food,
            food_description: draft.food_description,
            tags,
            cancelled: false,
            cover_image: draft.cover_image,
        };

        self.store.insert_event(&event).await?;
        tracing::info!(event = %event.id, club = %event.club_id, "event created");
        Ok(event)
    }

    /// Cancel an event. Reservation and save rows are left untouched for
    /// history; every user holding a confirmed reservation or a save gets
    /// an event-change notification. Idempotent on already-cancelled
    /// events.
    pub async fn cancel_event(&self, event_id: EventId) -> AppResult<Event> {
        let mut event = self.get_event(event_id).await?;
        if event.cancelled {
            return Ok(event);
        }

        self.store.set_event_cancelled(event_id).await?;
        event.cancelled = true;

        let mut recipients: HashSet<UserId> = HashSet::new();
        for reservation in self
            .store
            .confirmed_reservations_for_event(event_id)
            .await?
        {
            recipients.insert(reservation.user_id);
        }
        for save in self.store.saves_for_event(event_id).await? {
            recipients.insert(save.user_id);
        }

        for user_id in &recipients {
            let note = Notification::new(
                *user_id,
                NotificationKind::EventChange,
                "Event cancelled",
                format!("{} has been cancelled.", event.title),
                Some(event_id),
                Utc::now(),
            );
            self.store.insert_notification(&note).await?;
        }

        tracing::info!(
            event = %event_id,
            notified = recipients.len(),
            "event cancelled"
        );
        Ok(event)
    }

    pub async fn update_cover_image(&self, event_id: EventId, uri: &str) -> AppResult<()> {
        if !self.store.set_event_cover_image(event_id, uri).await? {
            return Err(AppError::NotFound(format!("Event {} not found", event_id)));
        }
        Ok(())
    }

    pub async fn update_club_cover(&self, club_id: ClubId, uri: &str) -> AppResult<()> {
        if !self.store.set_club_cover_image(club_id, uri).await? {
            return Err(AppError::NotFound(format!("Club {} not found", club_id)));
        }
        Ok(())
    }

    /// Every event row, including cancelled and ended ones. Historical
    /// views only; listings go through `active_events`.
    pub async fn all_events(&self) -> AppResult<Vec<Event>> {
        self.store.list_events().await
    }

    pub async fn building(&self, id: BuildingId) -> AppResult<Building> {
        {
            let mut cache = self.building_cache.lock().await;
            if let Some(building) = cache.get(&id) {
                return Ok(building.clone());
            }
        }
        let building = self
            .store
            .get_building(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Building {} not found", id)))?;
        self.building_cache
            .lock()
            .await
            .insert(id, building.clone());
        Ok(building)
    }

    pub async fn category(&self, id: CategoryId) -> AppResult<Category> {
        {
            let mut cache = self.category_cache.lock().await;
            if let Some(category) = cache.get(&id) {
                return Ok(category.clone());
            }
        }
        let category = self
            .store
            .get_category(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;
        self.category_cache
            .lock()
            .await
            .insert(id, category.clone());
        Ok(category)
    }

    pub async fn buildings(&self) -> AppResult<Vec<Building>> {
        self.store.list_buildings().await
    }

    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        self.store.list_categories().await
    }

    pub async fn clubs(&self) -> AppResult<Vec<Club>> {
        self.store.list_clubs().await
    }

    pub async fn get_club(&self, id: ClubId) -> AppResult<Club> {
        self.store
            .get_club(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Club {} not found", id)))
    }
}
