// Save & reservation facade: the entry point screens and handlers call.
// Both toggles are synchronous request/response and return the
// authoritative new state; the caller never keeps optimistic counters.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{EventId, EventSave, Reservation, ReservationStatus, UserId};
use crate::services::capacity::CapacityLedger;
use crate::storage::Store;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SaveState {
    pub saved: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToggleReserve {
    Reserved { reservation: Reservation },
    Cancelled,
    Full,
    NotReservable,
}

#[derive(Clone)]
pub struct EngagementService {
    store: Arc<dyn Store>,
    ledger: CapacityLedger,
}

impl EngagementService {
    pub fn new(store: Arc<dyn Store>, ledger: CapacityLedger) -> Self {
        EngagementService { store, ledger }
    }

    /// Toggle a save. Two consecutive calls restore the original state;
    /// unsaving an unsaved event is a silent no-op reporting `saved: false`.
    pub async fn toggle_save(&self, user_id: UserId, event_id: EventId) -> AppResult<SaveState> {
        if self.store.get_event(event_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Event {} not found", event_id)));
        }

        if self.store.delete_save(user_id, event_id).await? {
            return Ok(SaveState { saved: false });
        }

        let save = EventSave {
            id: Uuid::new_v4(),
            user_id,
            event_id,
            saved_at: Utc::now(),
        };
        match self.store.insert_save(&save).await {
            Ok(()) => Ok(SaveState { saved: true }),
            // Lost a race to a concurrent save of the same event; either
            // way the event is saved now.
            Err(AppError::Conflict(_)) => Ok(SaveState { saved: true }),
            Err(e) => Err(e),
        }
    }

    /// Toggle a reservation: cancel when one is held, otherwise attempt to
    /// reserve. Full and open events are reported as data, not errors; the
    /// UI renders them as a disabled action.
    pub async fn toggle_reserve(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> AppResult<ToggleReserve> {
        if self
            .store
            .find_confirmed_reservation(user_id, event_id)
            .await?
            .is_some()
        {
            self.ledger.cancel(user_id, event_id).await?;
            return Ok(ToggleReserve::Cancelled);
        }

        match self.ledger.reserve(user_id, event_id).await {
            Ok(reservation) => Ok(ToggleReserve::Reserved { reservation }),
            Err(AppError::AtCapacity) => Ok(ToggleReserve::Full),
            Err(AppError::NotReservable) => Ok(ToggleReserve::NotReservable),
            Err(e) => Err(e),
        }
    }

    pub async fn saves_for(&self, user_id: UserId) -> AppResult<Vec<EventSave>> {
        self.store.saves_for_user(user_id).await
    }

    /// Confirmed reservations only; cancelled history stays internal.
    pub async fn reservations_for(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        Ok(self
            .store
            .reservations_for_user(user_id)
            .await?
            .into_iter()
            .filter(|r| r.status == ReservationStatus::Confirmed)
            .collect())
    }
}
