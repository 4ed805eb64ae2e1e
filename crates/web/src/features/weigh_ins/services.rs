use storage::{
    Database,
    dto::weigh_in::{RecordWeighInRequest, RecordedWeighIn, WeighInPreview},
    error::Result,
    models::WeighIn,
};
use uuid::Uuid;

use crate::features::engine;

pub async fn record_weigh_in(db: &Database, request: &RecordWeighInRequest) -> Result<RecordedWeighIn> {
    engine(db)
        .await?
        .record_weigh_in(request.participant_id, request.weight, request.week_start)
        .await
}

pub async fn preview_weigh_in(db: &Database, participant_id: Uuid, weight: f64) -> Result<WeighInPreview> {
    engine(db).await?.preview_weigh_in(participant_id, weight).await
}

pub async fn participant_weigh_ins(db: &Database, participant_id: Uuid) -> Result<Vec<WeighIn>> {
    engine(db).await?.participant_weigh_ins(participant_id).await
}
