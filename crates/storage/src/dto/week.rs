use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Participant;

/// Weigh-in joined with the participant's name
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeekWeighIn {
    pub participant_id: Uuid,
    pub name: String,
    pub weight: f64,
    pub recorded_at: NaiveDateTime,
}

/// Stored weekly result with names resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeeklyResultDetail {
    pub week_start: NaiveDate,
    pub winner_id: Option<Uuid>,
    pub winner_name: Option<String>,
    pub loser_id: Option<Uuid>,
    pub loser_name: Option<String>,
    pub pot_change: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentWeek {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub weigh_ins: Vec<WeekWeighIn>,
    pub result: Option<WeeklyResultDetail>,
    pub missing_participants: Vec<Participant>,
    pub all_weighed_in: bool,
}

/// One row of a side-by-side week comparison
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComparisonEntry {
    pub participant_id: Uuid,
    pub name: String,
    pub weight: Option<f64>,
    pub percent_change: Option<f64>,
    pub weighed_in: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeekView {
    pub week_start: NaiveDate,
    pub weigh_ins: Vec<WeekWeighIn>,
    pub result: Option<WeeklyResultDetail>,
    pub comparison: Vec<ComparisonEntry>,
}
