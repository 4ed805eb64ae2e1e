use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::WeighIn;

/// Request payload for recording a weigh-in
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordWeighInRequest {
    pub participant_id: Uuid,

    #[validate(range(
        exclusive_min = 30.0,
        exclusive_max = 300.0,
        message = "Weight must be between 30 and 300 kg"
    ))]
    pub weight: f64,

    /// Any day of the target week; defaults to the current week
    pub week_start: Option<NaiveDate>,
}

/// A stored weigh-in together with the figure it is judged against
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordedWeighIn {
    pub weigh_in: WeighIn,
    pub previous_weight: f64,
    pub percent_change: f64,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeighInPreviewQuery {
    pub participant_id: Uuid,
    #[validate(range(exclusive_min = 30.0, exclusive_max = 300.0))]
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeighInPreview {
    pub participant_id: Uuid,
    pub weight: f64,
    pub previous_weight: f64,
    pub percent_change: f64,
}
