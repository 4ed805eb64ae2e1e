use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub participant_id: Uuid,
    pub name: String,
    pub wins: i64,
    pub start_weight: f64,
    pub current_weight: f64,
    /// Change since the start weight, positive means lost
    pub total_percent_change: f64,
}

/// What one participant has paid into the pot so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Contribution {
    pub participant_id: Uuid,
    pub name: String,
    pub times_lost: i64,
    pub total_contributed: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecentContribution {
    pub week_start: NaiveDate,
    pub loser_name: String,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PotInfo {
    pub total: i64,
    pub total_amount: i64,
    /// What is still missing to reach `total_amount`
    pub remaining_amount: i64,
    pub contributions: Vec<Contribution>,
    pub recent_contributions: Vec<RecentContribution>,
    /// Participants with the most losses, who would cover the remainder
    pub potential_final_payers: Vec<Contribution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Losing,
    Gaining,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Projection {
    pub participant_id: Uuid,
    pub name: String,
    pub current_weight: f64,
    pub projected_weight: Option<f64>,
    pub projected_total_change: Option<f64>,
    /// Fitted kg per week
    pub weekly_trend: Option<f64>,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Prognosis {
    pub battle_end_date: NaiveDate,
    pub weeks_remaining: i64,
    pub projections: Vec<Projection>,
}

/// A participant's position in the running week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeekStanding {
    pub participant_id: Uuid,
    pub name: String,
    pub weight: f64,
    pub percent_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Overview {
    pub current_week: NaiveDate,
    pub battle_end_date: NaiveDate,
    pub days_remaining: i64,
    pub total_participants: usize,
    pub pot_total: i64,
    pub leader: Option<LeaderboardEntry>,
    pub current_week_standings: Vec<WeekStanding>,
    pub missing_weigh_ins: Vec<String>,
    /// The top two of this week are close, display only
    pub head_to_head: bool,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeeklyDataPoint {
    pub week_start: NaiveDate,
    pub weight: f64,
    pub percent_change: f64,
    /// Weight as a percentage of the start weight
    pub relative_to_start: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ParticipantStats {
    pub participant_id: Uuid,
    pub name: String,
    pub start_weight: f64,
    pub current_weight: f64,
    pub total_percent_change: f64,
    pub wins: i64,
    pub losses: i64,
    pub weeks_participated: usize,
    pub weekly_data: Vec<WeeklyDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProgressPoint {
    /// `start` for the baseline point, otherwise the ISO week start
    pub week: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProgressSeries {
    pub participant_id: Uuid,
    pub name: String,
    pub data: Vec<ProgressPoint>,
}
