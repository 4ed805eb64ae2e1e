use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::participant::{CreateParticipantRequest, UpdateParticipantRequest},
    models::Participant,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/participants",
    responses(
        (status = 200, description = "All participants ordered by name", body = Vec<Participant>)
    ),
    tag = "participants"
)]
pub async fn list_participants(State(db): State<Database>) -> Result<Response, WebError> {
    let participants = services::list_participants(&db).await?;

    Ok(Json(participants).into_response())
}

#[utoipa::path(
    get,
    path = "/api/participants/{participant_id}",
    params(
        ("participant_id" = Uuid, Path, description = "Participant ID")
    ),
    responses(
        (status = 200, description = "Participant found", body = Participant),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants"
)]
pub async fn get_participant(
    State(db): State<Database>,
    Path(participant_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let participant = services::get_participant(&db, participant_id).await?;

    Ok(Json(participant).into_response())
}

#[utoipa::path(
    post,
    path = "/api/participants",
    request_body = CreateParticipantRequest,
    responses(
        (status = 201, description = "Participant created", body = Participant),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Name already taken or setup not completed")
    ),
    tag = "participants"
)]
pub async fn create_participant(
    State(db): State<Database>,
    Json(req): Json<CreateParticipantRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let participant = services::create_participant(&db, &req).await?;

    Ok((StatusCode::CREATED, Json(participant)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/participants/{participant_id}",
    params(
        ("participant_id" = Uuid, Path, description = "Participant ID")
    ),
    request_body = UpdateParticipantRequest,
    responses(
        (status = 200, description = "Participant updated", body = Participant),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Participant not found"),
        (status = 409, description = "Name already taken")
    ),
    tag = "participants"
)]
pub async fn update_participant(
    State(db): State<Database>,
    Path(participant_id): Path<Uuid>,
    Json(update_req): Json<UpdateParticipantRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    if update_req.name.is_none() && update_req.start_weight.is_none() {
        return Err(WebError::BadRequest("Nothing to update".to_string()));
    }

    let updated = services::update_participant(&db, participant_id, &update_req).await?;

    Ok(Json(updated).into_response())
}
