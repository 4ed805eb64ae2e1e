use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Names are stored trimmed, so whitespace alone is not a name.
fn not_blank(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Name must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Request payload for adding a participant
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateParticipantRequest {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Name must be between 1 and 50 characters"
    ))]
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[validate(range(
        exclusive_min = 30.0,
        exclusive_max = 300.0,
        message = "Start weight must be between 30 and 300 kg"
    ))]
    pub start_weight: f64,
}

/// Request payload for editing a participant
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateParticipantRequest {
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub name: Option<String>,

    #[validate(range(exclusive_min = 30.0, exclusive_max = 300.0))]
    pub start_weight: Option<f64>,
}
