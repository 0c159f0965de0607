//! Menu item model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Menu item entity. Menu items have no owner: any authenticated user
/// may create, update, or delete them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

/// Validated fields extracted from a menu create or update payload.
/// On a partial update, absent fields stay `None` and the stored values
/// are kept.
#[derive(Debug, Clone, Default)]
pub struct MenuDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}
