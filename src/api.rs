// HTTP facade over the core services. Handlers stay thin: resolve the
// caller, enforce club-officer gates, delegate, serialize. Identity comes
// from the upstream auth collaborator as an X-User-Id header; this layer
// never authenticates.

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::request::Parts,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{
    Announcement, Building, Category, Club, ClubMembership, Event, EventDraft, EventSave,
    Reservation, UserId,
};
use crate::services::timeline::{classify, TimeLabel};
use crate::services::{SaveState, SearchResults, ToggleReserve};

/// Already-validated identity, injected by the auth layer in front of this
/// service. Absence means the caller must log in first.
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthenticated)?;
        let id = Uuid::parse_str(value).map_err(|_| AppError::Unauthenticated)?;
        Ok(CurrentUser(id))
    }
}

/// Event plus its computed urgency label, as listed on every screen.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub time_label: TimeLabel,
}

impl EventView {
    fn at(event: Event, now: chrono::DateTime<Utc>) -> Self {
        let time_label = classify(event.start_time, event.end_time, now);
        EventView { event, time_label }
    }
}

#[derive(Deserialize)]
struct ListEventsQuery {
    active_only: Option<bool>,
    club_id: Option<Uuid>,
    building_id: Option<Uuid>,
    category_id: Option<Uuid>,
}

async fn list_events_handler(
    State(state): State<AppState>,
    Query(params): Query<ListEventsQuery>,
) -> AppResult<Json<Value>> {
    let now = Utc::now();
    let mut events = if params.active_only.unwrap_or(true) {
        state.directory.active_events(now).await?
    } else {
        state.directory.all_events().await?
    };

    if let Some(club_id) = params.club_id {
        events.retain(|e| e.club_id == club_id);
    }
    if let Some(building_id) = params.building_id {
        events.retain(|e| e.building_id == building_id);
    }
    if let Some(category_id) = params.category_id {
        events.retain(|e| e.category_id == category_id);
    }

    let views: Vec<EventView> = events.into_iter().map(|e| EventView::at(e, now)).collect();
    Ok(Json(json!({ "events": views })))
}

async fn get_event_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventView>> {
    let event = state.directory.get_event(id).await?;
    Ok(Json(EventView::at(event, Utc::now())))
}

async fn create_event_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(draft): Json<EventDraft>,
) -> AppResult<Json<Event>> {
    if !state.registry.is_officer(user_id, draft.club_id).await? {
        return Err(AppError::Forbidden(
            "Only club officers can create events".to_string(),
        ));
    }
    let event = state.directory.create(draft).await?;
    Ok(Json(event))
}

async fn cancel_event_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Event>> {
    let event = state.directory.get_event(id).await?;
    if !state.registry.is_officer(user_id, event.club_id).await? {
        return Err(AppError::Forbidden(
            "Only club officers can cancel events".to_string(),
        ));
    }
    let event = state.directory.cancel_event(id).await?;
    Ok(Json(event))
}

#[derive(Deserialize)]
struct CoverImageRequest {
    cover_image: String,
}

async fn event_cover_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CoverImageRequest>,
) -> AppResult<Json<Value>> {
    let event = state.directory.get_event(id).await?;
    if !state.registry.is_officer(user_id, event.club_id).await? {
        return Err(AppError::Forbidden(
            "Only club officers can update the cover image".to_string(),
        ));
    }
    state.directory.update_cover_image(id, &req.cover_image).await?;
    Ok(Json(json!({ "id": id, "updated": true })))
}

async fn club_cover_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CoverImageRequest>,
) -> AppResult<Json<Value>> {
    if !state.registry.is_officer(user_id, id).await? {
        return Err(AppError::Forbidden(
            "Only club officers can update the cover image".to_string(),
        ));
    }
    state.directory.update_club_cover(id, &req.cover_image).await?;
    Ok(Json(json!({ "id": id, "updated": true })))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResults>> {
    let results = state
        .directory
        .search(params.q.as_deref().unwrap_or(""), Utc::now())
        .await?;
    Ok(Json(results))
}

async fn toggle_save_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SaveState>> {
    let saved = state.engagement.toggle_save(user_id, id).await?;
    Ok(Json(saved))
}

async fn toggle_reserve_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ToggleReserve>> {
    let outcome = state.engagement.toggle_reserve(user_id, id).await?;
    Ok(Json(outcome))
}

async fn my_saves_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<EventSave>>> {
    Ok(Json(state.engagement.saves_for(user_id).await?))
}

async fn my_reservations_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<Reservation>>> {
    Ok(Json(state.engagement.reservations_for(user_id).await?))
}

async fn join_club_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ClubMembership>> {
    let membership = state.registry.join(user_id, id).await?;
    Ok(Json(membership))
}

async fn leave_club_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let removed = state.registry.leave(user_id, id).await?;
    Ok(Json(json!({ "club_id": id, "member": false, "removed": removed })))
}

async fn my_memberships_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<ClubMembership>>> {
    Ok(Json(state.registry.memberships_for(user_id).await?))
}

async fn list_clubs_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Club>>> {
    Ok(Json(state.directory.clubs().await?))
}

async fn get_club_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Club>> {
    Ok(Json(state.directory.get_club(id).await?))
}

async fn list_buildings_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Building>>> {
    Ok(Json(state.directory.buildings().await?))
}

async fn get_building_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Building>> {
    Ok(Json(state.directory.building(id).await?))
}

async fn list_categories_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.directory.categories().await?))
}

async fn get_category_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.directory.category(id).await?))
}

async fn club_announcements_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Announcement>>> {
    Ok(Json(state.bulletin.announcements(Some(id)).await?))
}

#[derive(Deserialize)]
struct AnnouncementRequest {
    title: String,
    body: String,
}

async fn publish_announcement_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AnnouncementRequest>,
) -> AppResult<Json<Announcement>> {
    if !state.registry.is_officer(user_id, id).await? {
        return Err(AppError::Forbidden(
            "Only club officers can post announcements".to_string(),
        ));
    }
    let announcement = state.bulletin.publish(id, &req.title, &req.body).await?;
    Ok(Json(announcement))
}

async fn my_notifications_handler(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Value>> {
    let notifications = state.bulletin.notifications_for(user_id).await?;
    Ok(Json(json!({ "notifications": notifications })))
}

async fn mark_notification_read_handler(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let updated = state.bulletin.mark_read(id).await?;
    Ok(Json(json!({ "id": id, "read": updated })))
}

async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "ok": true, "database": state.config.database.url.split(':').next() }))
}

pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Events
        .route("/events", get(list_events_handler).post(create_event_handler))
        .route("/events/{id}", get(get_event_handler))
        .route("/events/{id}/cancel", post(cancel_event_handler))
        .route("/events/{id}/cover", put(event_cover_handler))
        .route("/events/{id}/save", post(toggle_save_handler))
        .route("/events/{id}/reserve", post(toggle_reserve_handler))
        // Search
        .route("/search", get(search_handler))
        // Clubs
        .route("/clubs", get(list_clubs_handler))
        .route("/clubs/{id}", get(get_club_handler))
        .route("/clubs/{id}/cover", put(club_cover_handler))
        .route("/clubs/{id}/join", post(join_club_handler))
        .route("/clubs/{id}/leave", post(leave_club_handler))
        .route(
            "/clubs/{id}/announcements",
            get(club_announcements_handler).post(publish_announcement_handler),
        )
        // Reference data
        .route("/buildings", get(list_buildings_handler))
        .route("/buildings/{id}", get(get_building_handler))
        .route("/categories", get(list_categories_handler))
        .route("/categories/{id}", get(get_category_handler))
        // Current user
        .route("/me/saves", get(my_saves_handler))
        .route("/me/reservations", get(my_reservations_handler))
        .route("/me/memberships", get(my_memberships_handler))
        .route("/me/notifications", get(my_notifications_handler))
        .route("/notifications/{id}/read", post(mark_notification_read_handler))
        .with_state(state)
}
