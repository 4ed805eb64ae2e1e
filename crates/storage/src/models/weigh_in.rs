use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One weekly measurement. There is at most one per participant and week;
/// resubmitting replaces `weight` and `recorded_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeighIn {
    pub participant_id: Uuid,
    /// Monday of the week this measurement counts for
    pub week_start: NaiveDate,
    pub weight: f64,
    pub recorded_at: NaiveDateTime,
}
