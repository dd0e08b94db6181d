// Club announcements and the in-app notification feed. Announcement
// publication fans out one notification per club member; delivery beyond
// the row insert is out of scope.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    Announcement, ClubId, Notification, NotificationId, NotificationKind, UserId,
};
use crate::storage::Store;

#[derive(Clone)]
pub struct BulletinBoard {
    store: Arc<dyn Store>,
}

impl BulletinBoard {
    pub fn new(store: Arc<dyn Store>) -> Self {
        BulletinBoard { store }
    }

    pub async fn publish(
        &self,
        club_id: ClubId,
        title: &str,
        body: &str,
    ) -> AppResult<Announcement> {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Announcement title is required".to_string()));
        }
        if body.trim().is_empty() {
            return Err(AppError::Validation("Announcement body is required".to_string()));
        }
        let club = self
            .store
            .get_club(club_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Club {} not found", club_id)))?;

        let announcement = Announcement {
            id: Uuid::new_v4(),
            club_id,
            title: title.trim().to_string(),
            body: body.trim().to_string(),
            created_at: Utc::now(),
        };
        self.store.insert_announcement(&announcement).await?;

        let members = self.store.memberships_for_club(club_id).await?;
        for membership in &members {
            let note = Notification::new(
                membership.user_id,
                NotificationKind::Announcement,
                format!("{}: {}", club.name, announcement.title),
                announcement.body.clone(),
                Some(announcement.id),
                Utc::now(),
            );
            self.store.insert_notification(&note).await?;
        }

        tracing::info!(
            club = %club_id,
            announcement = %announcement.id,
            notified = members.len(),
            "announcement published"
        );
        Ok(announcement)
    }

    /// Newest first; scoped to one club when an id is given.
    pub async fn announcements(&self, club_id: Option<ClubId>) -> AppResult<Vec<Announcement>> {
        match club_id {
            Some(id) => self.store.announcements_for_club(id).await,
            None => self.store.list_announcements().await,
        }
    }

    /// Newest first.
    pub async fn notifications_for(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
        self.store.notifications_for_user(user_id).await
    }

    /// Marking an unknown notification read is a silent no-op; returns
    /// whether a row was updated.
    pub async fn mark_read(&self, id: NotificationId) -> AppResult<bool> {
        self.store.mark_notification_read(id).await
    }
}
