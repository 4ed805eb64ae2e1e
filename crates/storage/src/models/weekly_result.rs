use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Outcome of a fully weighed-in week.
///
/// Derived data: rewritten every time the week's weigh-ins change and
/// removed when the week is no longer complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WeeklyResult {
    pub week_start: NaiveDate,
    pub winner_id: Option<Uuid>,
    pub loser_id: Option<Uuid>,
    /// Amount added to the pot, non-zero only when there is a loser
    pub pot_change: i32,
}
