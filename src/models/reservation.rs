//! Reservation model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Room reservation entity, owned by the user who created it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: i64,
    pub user_id: Uuid,
    pub room_number: i32,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A proposed reservation under validation. Fields are optional so that
/// missing-field reasons can be accumulated instead of failing at
/// deserialization time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReservationCandidate {
    pub room_number: Option<i32>,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
}

impl ReservationCandidate {
    /// Fill any unset field from an existing reservation (merge-patch
    /// semantics for partial updates).
    pub fn merged_with(self, existing: &Reservation) -> Self {
        Self {
            room_number: self.room_number.or(Some(existing.room_number)),
            check_in_date: self.check_in_date.or(Some(existing.check_in_date)),
            check_out_date: self.check_out_date.or(Some(existing.check_out_date)),
        }
    }
}
