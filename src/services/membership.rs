// Membership registry: sole owner of club rosters, roles, and the
// denormalized member_count.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    ClubId, ClubMembership, MemberRole, Notification, NotificationKind, UserId,
};
use crate::storage::Store;

#[derive(Clone)]
pub struct MembershipRegistry {
    store: Arc<dyn Store>,
}

impl MembershipRegistry {
    pub fn new(store: Arc<dyn Store>) -> Self {
        MembershipRegistry { store }
    }

    /// Join a club. Idempotent: an existing membership is returned
    /// unchanged and the member count is untouched. New members start with
    /// the `member` role.
    pub async fn join(&self, user_id: UserId, club_id: ClubId) -> AppResult<ClubMembership> {
        let club = self
            .store
            .get_club(club_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Club {} not found", club_id)))?;

        if let Some(existing) = self.store.find_membership(user_id, club_id).await? {
            return Ok(existing);
        }

        let membership = ClubMembership {
            id: Uuid::new_v4(),
            user_id,
            club_id,
            role: MemberRole::Member,
            joined_at: Utc::now(),
        };

        if self.store.insert_membership(&membership).await? {
            tracing::info!(user = %user_id, club = %club_id, "membership created");
            let note = Notification::new(
                user_id,
                NotificationKind::Membership,
                format!("Welcome to {}", club.name),
                format!("You are now a member of {}.", club.name),
                Some(club_id),
                Utc::now(),
            );
            self.store.insert_notification(&note).await?;
            return Ok(membership);
        }

        // Lost an insert race; the row that won is authoritative.
        self.store
            .find_membership(user_id, club_id)
            .await?
            .ok_or_else(|| AppError::Conflict("Membership changed concurrently".to_string()))
    }

    /// Leave a club. No-op (returns false) when the user is not a member;
    /// the member count never goes below zero.
    pub async fn leave(&self, user_id: UserId, club_id: ClubId) -> AppResult<bool> {
        let removed = self.store.delete_membership(user_id, club_id).await?;
        if removed {
            tracing::info!(user = %user_id, club = %club_id, "membership removed");
        }
        Ok(removed)
    }

    pub async fn role_of(
        &self,
        user_id: UserId,
        club_id: ClubId,
    ) -> AppResult<Option<MemberRole>> {
        Ok(self
            .store
            .find_membership(user_id, club_id)
            .await?
            .map(|m| m.role))
    }

    /// Officers (admin or president) may create events, cancel them, and
    /// post announcements for their club.
    pub async fn is_officer(&self, user_id: UserId, club_id: ClubId) -> AppResult<bool> {
        Ok(self
            .role_of(user_id, club_id)
            .await?
            .is_some_and(|role| role.is_officer()))
    }

    pub async fn memberships_for(&self, user_id: UserId) -> AppResult<Vec<ClubMembership>> {
        self.store.memberships_for_user(user_id).await
    }

    pub async fn members_of(&self, club_id: ClubId) -> AppResult<Vec<ClubMembership>> {
        self.store.memberships_for_club(club_id).await
    }
}
