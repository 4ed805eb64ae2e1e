use storage::{
    Database, WeighInStore,
    dto::participant::{CreateParticipantRequest, UpdateParticipantRequest},
    error::Result,
    models::Participant,
};
use uuid::Uuid;

use crate::features::engine;

pub async fn list_participants(db: &Database) -> Result<Vec<Participant>> {
    let mut session = db.snapshot().await?;
    let participants = session.list_participants().await?;
    Ok(participants)
}

pub async fn get_participant(db: &Database, participant_id: Uuid) -> Result<Participant> {
    let mut session = db.snapshot().await?;
    let participant = session.find_participant(participant_id).await?;
    Ok(participant)
}

/// Adding someone changes which weeks are complete, so past results are
/// recomputed with the current settings.
pub async fn create_participant(
    db: &Database,
    request: &CreateParticipantRequest,
) -> Result<Participant> {
    engine(db).await?.add_participant(request).await
}

pub async fn update_participant(
    db: &Database,
    participant_id: Uuid,
    request: &UpdateParticipantRequest,
) -> Result<Participant> {
    engine(db).await?.update_participant(participant_id, request).await
}
