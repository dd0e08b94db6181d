// Capacity ledger: the only component allowed to touch an event's
// reservation counter, and always in the same transaction as the
// reservation row change.

use std::sync::Arc;

use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::models::{EventId, Notification, NotificationKind, Reservation, UserId};
use crate::storage::{SeatTxn, Store};

#[derive(Clone)]
pub struct CapacityLedger {
    store: Arc<dyn Store>,
}

impl CapacityLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        CapacityLedger { store }
    }

    /// Reserve a seat. Idempotent: an existing confirmed reservation for
    /// this (user, event) pair is returned as-is. Open (unlimited) events
    /// never create reservation rows and reject with `NotReservable`.
    pub async fn reserve(&self, user_id: UserId, event_id: EventId) -> AppResult<Reservation> {
        let event = self
            .store
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

        if event.cancelled {
            return Err(AppError::EventCancelled(format!(
                "{} has been cancelled",
                event.title
            )));
        }
        if !event.capacity.is_limited() {
            return Err(AppError::NotReservable);
        }

        // A reserve that loses a write race retries once (normally landing
        // on the idempotent path below); a second lost race surfaces as
        // AtCapacity after the loop.
        for _ in 0..2 {
            if let Some(existing) = self
                .store
                .find_confirmed_reservation(user_id, event_id)
                .await?
            {
                return Ok(existing);
            }

            let reservation = Reservation::confirmed(user_id, event_id, Utc::now());
            match self.store.reserve_seat(&reservation).await {
                Ok(SeatTxn::Applied) => {
                    tracing::info!(user = %user_id, event = %event_id, "reservation confirmed");
                    let note = Notification::new(
                        user_id,
                        NotificationKind::Reservation,
                        "Reservation confirmed",
                        format!("You have a seat at {}.", event.title),
                        Some(event_id),
                        Utc::now(),
                    );
                    self.store.insert_notification(&note).await?;
                    return Ok(reservation);
                }
                Ok(SeatTxn::Full) => return Err(AppError::AtCapacity),
                Err(AppError::Conflict(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::AtCapacity)
    }

    /// Cancel a confirmed reservation. No-op (returns false) when the user
    /// holds none; the reservation row is flipped, never deleted.
    pub async fn cancel(&self, user_id: UserId, event_id: EventId) -> AppResult<bool> {
        match self
            .store
            .find_confirmed_reservation(user_id, event_id)
            .await?
        {
            None => Ok(false),
            Some(reservation) => {
                self.store.release_seat(reservation.id, event_id).await?;
                tracing::info!(user = %user_id, event = %event_id, "reservation cancelled");
                Ok(true)
            }
        }
    }
}
