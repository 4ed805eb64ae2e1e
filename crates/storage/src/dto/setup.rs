use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::participant::CreateParticipantRequest;
use crate::models::{BattleConfig, Participant};

/// One-shot initialisation of a battle
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetupRequest {
    #[validate(length(min = 1, message = "At least one participant is required"))]
    #[validate(nested)]
    pub participants: Vec<CreateParticipantRequest>,

    #[validate(range(min = 1, max = 100))]
    pub pot_contribution: i32,

    #[validate(range(min = 10, max = 1000))]
    pub total_amount: i32,

    pub battle_end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateConfigRequest {
    #[validate(range(min = 1, max = 100))]
    pub pot_contribution: Option<i32>,

    pub battle_end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetupStatus {
    pub setup_complete: bool,
    pub has_users: bool,
    pub has_config: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetupResponse {
    pub participants: Vec<Participant>,
    pub config: BattleConfig,
}
