//! Reservation repository for database operations
//!
//! Every read, update, and delete is filtered by the owning user: a
//! reservation belonging to someone else looks exactly like one that does
//! not exist. Creates and updates run the duplicate/overlap validation
//! inside a transaction; the schema's unique and exclusion constraints are
//! the backstop against concurrent check-then-insert races.

use serde_json::{Map, Value};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Reservation, ReservationCandidate};
use crate::pagination::PageQuery;
use crate::validation::{
    DUPLICATE_RESERVATION, OVERLAPPING_RESERVATION, RESERVATION_FIELDS, conflict_reasons,
    ordering_reason, reservation_candidate, unknown_fields,
};

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Reservation with id {id} not found."))
}

/// Reservation repository
#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Create a new reservation repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a reservation owned by `user_id`, validating field presence,
    /// chronological ordering, and duplicate/overlap conflicts.
    pub async fn create(
        &self,
        user_id: Uuid,
        payload: &Map<String, Value>,
    ) -> ApiResult<Reservation> {
        if let Some(reason) = unknown_fields(payload, RESERVATION_FIELDS) {
            return Err(ApiError::Validation(vec![reason]));
        }

        let mut reasons = Vec::new();
        let candidate = reservation_candidate(payload, true, &mut reasons);
        self.validate_and_save(user_id, None, candidate, reasons).await
    }

    /// Fetch one page of the user's reservations together with the total count
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        query: &PageQuery,
    ) -> ApiResult<(Vec<Reservation>, i64)> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, user_id, room_number, check_in_date, check_out_date, created_at, updated_at
            FROM reservations
            WHERE user_id = $1
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((reservations, total))
    }

    /// Find a reservation by id, scoped to its owner
    pub async fn find_by_id(&self, id: i64, user_id: Uuid) -> ApiResult<Reservation> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, user_id, room_number, check_in_date, check_out_date, created_at, updated_at
            FROM reservations
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        reservation.ok_or_else(|| not_found(id))
    }

    /// Partially update an owned reservation. Supplied fields are merged
    /// over the stored row and the merged candidate is re-validated with
    /// the reservation excluded from its own conflict checks.
    pub async fn update(
        &self,
        id: i64,
        user_id: Uuid,
        payload: &Map<String, Value>,
    ) -> ApiResult<Reservation> {
        if let Some(reason) = unknown_fields(payload, RESERVATION_FIELDS) {
            return Err(ApiError::Validation(vec![reason]));
        }

        let existing = self.find_by_id(id, user_id).await?;

        let mut reasons = Vec::new();
        let candidate = reservation_candidate(payload, false, &mut reasons).merged_with(&existing);
        self.validate_and_save(user_id, Some(id), candidate, reasons)
            .await
    }

    /// Delete an owned reservation
    pub async fn delete(&self, id: i64, user_id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        info!("Deleted reservation {} for user {}", id, user_id);
        Ok(())
    }

    /// Shared create/update tail: accumulate the remaining reasons, run the
    /// conflict checks against the room's current reservations inside a
    /// transaction, and persist if nothing was reported.
    async fn validate_and_save(
        &self,
        user_id: Uuid,
        excluding: Option<i64>,
        candidate: ReservationCandidate,
        mut reasons: Vec<String>,
    ) -> ApiResult<Reservation> {
        if let Some(reason) = ordering_reason(&candidate) {
            reasons.push(reason);
        }

        let (Some(room_number), Some(check_in), Some(check_out)) = (
            candidate.room_number,
            candidate.check_in_date,
            candidate.check_out_date,
        ) else {
            return Err(ApiError::Validation(reasons));
        };

        let mut tx = self.pool.begin().await?;

        let existing = find_for_room(&mut tx, room_number).await?;
        reasons.extend(conflict_reasons(check_in, check_out, &existing, excluding));

        if !reasons.is_empty() {
            return Err(ApiError::Validation(reasons));
        }

        let reservation = match excluding {
            None => {
                sqlx::query_as::<_, Reservation>(
                    r#"
                    INSERT INTO reservations (user_id, room_number, check_in_date, check_out_date)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, user_id, room_number, check_in_date, check_out_date,
                              created_at, updated_at
                    "#,
                )
                .bind(user_id)
                .bind(room_number)
                .bind(check_in)
                .bind(check_out)
                .fetch_one(&mut *tx)
                .await
            }
            Some(id) => {
                sqlx::query_as::<_, Reservation>(
                    r#"
                    UPDATE reservations
                    SET room_number = $1, check_in_date = $2, check_out_date = $3,
                        updated_at = now()
                    WHERE id = $4 AND user_id = $5
                    RETURNING id, user_id, room_number, check_in_date, check_out_date,
                              created_at, updated_at
                    "#,
                )
                .bind(room_number)
                .bind(check_in)
                .bind(check_out)
                .bind(id)
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await
            }
        }
        .map_err(map_constraint_violation)?;

        tx.commit().await?;

        info!(
            "Saved reservation {} (room {}, {} to {})",
            reservation.id, reservation.room_number, check_in, check_out
        );
        Ok(reservation)
    }
}

async fn find_for_room(
    tx: &mut Transaction<'_, Postgres>,
    room_number: i32,
) -> Result<Vec<Reservation>, sqlx::Error> {
    sqlx::query_as::<_, Reservation>(
        r#"
        SELECT id, user_id, room_number, check_in_date, check_out_date, created_at, updated_at
        FROM reservations
        WHERE room_number = $1
        "#,
    )
    .bind(room_number)
    .fetch_all(&mut **tx)
    .await
}

/// A concurrent writer can commit between our conflict query and the
/// insert; the unique and exclusion constraints then fire and are mapped
/// back to the same validation reasons the query path produces.
fn map_constraint_violation(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return ApiError::Validation(vec![DUPLICATE_RESERVATION.to_string()]);
        }
        // 23P01: exclusion constraint violation
        if db.code().as_deref() == Some("23P01") {
            return ApiError::Validation(vec![OVERLAPPING_RESERVATION.to_string()]);
        }
    }
    ApiError::Database(e)
}
