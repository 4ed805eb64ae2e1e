use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use storage::{
    Database,
    dto::week::{CurrentWeek, WeekView},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/weeks/current",
    responses(
        (status = 200, description = "Running week with its weigh-ins and missing participants", body = CurrentWeek),
        (status = 409, description = "Setup not completed")
    ),
    tag = "weeks"
)]
pub async fn get_current_week(State(db): State<Database>) -> Result<Response, WebError> {
    let week = services::current_week(&db).await?;

    Ok(Json(week).into_response())
}

#[utoipa::path(
    get,
    path = "/api/weeks/{week_start}",
    params(
        ("week_start" = NaiveDate, Path, description = "Any day of the week, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Weigh-ins, result and comparison for the week", body = WeekView),
        (status = 409, description = "Setup not completed")
    ),
    tag = "weeks"
)]
pub async fn get_week(
    State(db): State<Database>,
    Path(week_start): Path<NaiveDate>,
) -> Result<Response, WebError> {
    let view = services::week_view(&db, week_start).await?;

    Ok(Json(view).into_response())
}
