use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::setup::{SetupRequest, SetupResponse, SetupStatus, UpdateConfigRequest},
    models::BattleConfig,
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/setup/status",
    responses(
        (status = 200, description = "Whether participants and settings exist", body = SetupStatus)
    ),
    tag = "setup"
)]
pub async fn get_setup_status(State(db): State<Database>) -> Result<Response, WebError> {
    let status = services::setup_status(&db).await?;

    Ok(Json(status).into_response())
}

#[utoipa::path(
    post,
    path = "/api/setup",
    request_body = SetupRequest,
    responses(
        (status = 201, description = "Battle set up", body = SetupResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Setup already completed or duplicate participant name")
    ),
    tag = "setup"
)]
pub async fn complete_setup(
    State(db): State<Database>,
    Json(req): Json<SetupRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::complete_setup(&db, &req).await?;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/config",
    responses(
        (status = 200, description = "Current battle settings", body = BattleConfig),
        (status = 409, description = "Setup not completed")
    ),
    tag = "setup"
)]
pub async fn get_config(State(db): State<Database>) -> Result<Response, WebError> {
    let config = services::get_config(&db).await?;

    Ok(Json(config).into_response())
}

#[utoipa::path(
    put,
    path = "/api/config",
    request_body = UpdateConfigRequest,
    responses(
        (status = 200, description = "Settings updated", body = BattleConfig),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Setup not completed")
    ),
    tag = "setup"
)]
pub async fn update_config(
    State(db): State<Database>,
    Json(req): Json<UpdateConfigRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    if req.pot_contribution.is_none() && req.battle_end_date.is_none() {
        return Err(WebError::BadRequest("Nothing to update".to_string()));
    }

    let config = services::update_config(&db, &req).await?;

    Ok(Json(config).into_response())
}
