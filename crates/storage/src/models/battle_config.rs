use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Competition settings chosen at setup time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BattleConfig {
    /// Amount the weekly loser pays into the pot
    pub pot_contribution: i32,
    /// Final amount the pot is meant to cover (e.g. the closing dinner)
    pub total_amount: i32,
    pub battle_end_date: NaiveDate,
}
