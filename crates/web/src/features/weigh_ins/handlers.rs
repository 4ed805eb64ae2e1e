use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::weigh_in::{RecordWeighInRequest, RecordedWeighIn, WeighInPreview, WeighInPreviewQuery},
    models::WeighIn,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/weigh-ins",
    request_body = RecordWeighInRequest,
    responses(
        (status = 201, description = "Weigh-in recorded and weekly results updated", body = RecordedWeighIn),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Participant not found"),
        (status = 409, description = "Setup not completed")
    ),
    tag = "weigh-ins"
)]
pub async fn record_weigh_in(
    State(db): State<Database>,
    Json(req): Json<RecordWeighInRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let recorded = services::record_weigh_in(&db, &req).await?;

    Ok((StatusCode::CREATED, Json(recorded)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/weigh-ins/preview",
    params(WeighInPreviewQuery),
    responses(
        (status = 200, description = "Change the weight would mean this week, nothing stored", body = WeighInPreview),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Participant not found")
    ),
    tag = "weigh-ins"
)]
pub async fn preview_weigh_in(
    State(db): State<Database>,
    Query(query): Query<WeighInPreviewQuery>,
) -> Result<Response, WebError> {
    query.validate()?;

    let preview = services::preview_weigh_in(&db, query.participant_id, query.weight).await?;

    Ok(Json(preview).into_response())
}

#[utoipa::path(
    get,
    path = "/api/weigh-ins/participant/{participant_id}",
    params(
        ("participant_id" = Uuid, Path, description = "Participant ID")
    ),
    responses(
        (status = 200, description = "Weigh-ins ordered by week", body = Vec<WeighIn>),
        (status = 404, description = "Participant not found")
    ),
    tag = "weigh-ins"
)]
pub async fn get_participant_weigh_ins(
    State(db): State<Database>,
    Path(participant_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let history = services::participant_weigh_ins(&db, participant_id).await?;

    Ok(Json(history).into_response())
}
