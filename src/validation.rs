//! Input validation
//!
//! All validators accumulate every violation into a list of reasons rather
//! than stopping at the first one. The only exception is the unrecognized
//! field check, which rejects immediately and on its own: payloads are
//! checked structurally against a per-endpoint allow-list of field names.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::models::{MenuDraft, Reservation, ReservationCandidate};

/// Fields accepted by the registration payload.
pub const USER_FIELDS: &[&str] = &["username", "phone_number", "password"];

/// Fields accepted by menu create/update payloads.
pub const MENU_FIELDS: &[&str] = &["name", "description", "price"];

/// Fields accepted by reservation create/update payloads.
pub const RESERVATION_FIELDS: &[&str] = &["room_number", "check_in_date", "check_out_date"];

pub const DUPLICATE_RESERVATION: &str =
    "An identical reservation already exists for the selected room and dates.";
pub const OVERLAPPING_RESERVATION: &str =
    "This reservation overlaps with an existing reservation for the selected room.";

/// Check the payload's key set against an allow-list. Returns a single
/// reason naming every unrecognized field, or `None` if the payload is
/// clean.
pub fn unknown_fields(payload: &Map<String, Value>, allowed: &[&str]) -> Option<String> {
    let extras: Vec<&str> = payload
        .keys()
        .map(String::as_str)
        .filter(|key| !allowed.contains(key))
        .collect();

    if extras.is_empty() {
        None
    } else {
        Some(format!(
            "Additional fields not allowed: {}",
            extras.join(", ")
        ))
    }
}

/// Extract a non-empty string field. Absent, null, non-string, and empty
/// values all count as missing, mirroring the presence checks applied to
/// registration payloads.
pub fn string_field(payload: &Map<String, Value>, name: &str) -> Option<String> {
    payload
        .get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Extract a reservation candidate from a JSON payload, accumulating one
/// reason per missing or malformed field. With `require_all` false (partial
/// update), absent fields are skipped instead of reported.
pub fn reservation_candidate(
    payload: &Map<String, Value>,
    require_all: bool,
    reasons: &mut Vec<String>,
) -> ReservationCandidate {
    let room_number = match payload.get("room_number") {
        None | Some(Value::Null) => {
            if require_all {
                reasons.push("room_number is required.".to_string());
            }
            None
        }
        Some(value) => match value.as_i64().and_then(|n| i32::try_from(n).ok()) {
            Some(n) => Some(n),
            None => {
                reasons.push("room_number must be an integer.".to_string());
                None
            }
        },
    };

    let check_in_date = date_field(payload, "check_in_date", require_all, reasons);
    let check_out_date = date_field(payload, "check_out_date", require_all, reasons);

    ReservationCandidate {
        room_number,
        check_in_date,
        check_out_date,
    }
}

fn date_field(
    payload: &Map<String, Value>,
    name: &str,
    required: bool,
    reasons: &mut Vec<String>,
) -> Option<NaiveDate> {
    match payload.get(name) {
        None | Some(Value::Null) => {
            if required {
                reasons.push(format!("{name} is required."));
            }
            None
        }
        Some(value) => match value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        {
            Some(date) => Some(date),
            None => {
                reasons.push(format!("{name} must be a date in YYYY-MM-DD format."));
                None
            }
        },
    }
}

/// Chronological ordering check: check-out must be strictly after check-in.
pub fn ordering_reason(candidate: &ReservationCandidate) -> Option<String> {
    match (candidate.check_in_date, candidate.check_out_date) {
        (Some(check_in), Some(check_out)) if check_out <= check_in => {
            Some("check_out_date must be after the check_in_date.".to_string())
        }
        _ => None,
    }
}

/// Duplicate and overlap checks against the existing reservations for the
/// candidate's room. `excluding` names the reservation being updated so it
/// never conflicts with itself. Overlap uses half-open interval semantics:
/// a check-out on day X does not conflict with a check-in on day X.
pub fn conflict_reasons(
    check_in: NaiveDate,
    check_out: NaiveDate,
    existing: &[Reservation],
    excluding: Option<i64>,
) -> Vec<String> {
    let others = || {
        existing
            .iter()
            .filter(|r| excluding != Some(r.id))
    };

    let mut reasons = Vec::new();

    if others().any(|r| r.check_in_date == check_in && r.check_out_date == check_out) {
        reasons.push(DUPLICATE_RESERVATION.to_string());
    }

    if others().any(|r| r.check_in_date < check_out && r.check_out_date > check_in) {
        reasons.push(OVERLAPPING_RESERVATION.to_string());
    }

    reasons
}

/// Validate a menu payload and extract its fields. With `require_all` false
/// (partial update), only the supplied fields are checked. Prices are kept
/// to two fraction digits.
pub fn menu_draft(
    payload: &Map<String, Value>,
    require_all: bool,
) -> Result<MenuDraft, Vec<String>> {
    if let Some(reason) = unknown_fields(payload, MENU_FIELDS) {
        return Err(vec![reason]);
    }

    let mut reasons = Vec::new();
    let mut draft = MenuDraft::default();

    match payload.get("name") {
        None | Some(Value::Null) => {
            if require_all {
                reasons.push("name is required.".to_string());
            }
        }
        Some(Value::String(s)) if s.is_empty() => reasons.push("name is required.".to_string()),
        Some(Value::String(s)) => draft.name = Some(s.clone()),
        Some(_) => reasons.push("name should be a string.".to_string()),
    }

    match payload.get("description") {
        None | Some(Value::Null) => {
            if require_all {
                reasons.push("description is required.".to_string());
            }
        }
        Some(Value::String(s)) if s.is_empty() => {
            reasons.push("description is required.".to_string())
        }
        Some(Value::String(s)) => draft.description = Some(s.clone()),
        Some(_) => reasons.push("description should be a string.".to_string()),
    }

    match payload.get("price") {
        None | Some(Value::Null) => {
            if require_all {
                reasons.push("price is required.".to_string());
            }
        }
        Some(value) => match value.as_f64() {
            Some(price) if price >= 0.0 => draft.price = Some((price * 100.0).round() / 100.0),
            Some(_) => reasons.push("price must be non-negative.".to_string()),
            None => reasons.push("price should be a number.".to_string()),
        },
    }

    if reasons.is_empty() {
        Ok(draft)
    } else {
        Err(reasons)
    }
}
