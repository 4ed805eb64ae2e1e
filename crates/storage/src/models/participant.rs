use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A competitor in the battle.
///
/// `start_weight` is the reference for the first weigh-in and for every
/// "total change" figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Participant {
    pub participant_id: Uuid,
    pub name: String,
    pub start_weight: f64,
    pub created_at: NaiveDateTime,
}
