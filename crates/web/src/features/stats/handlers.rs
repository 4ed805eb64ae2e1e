use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::stats::{
        LeaderboardEntry, Overview, ParticipantStats, PotInfo, Prognosis, ProgressSeries,
    },
};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/stats/overview",
    responses(
        (status = 200, description = "Dashboard summary of the battle", body = Overview),
        (status = 409, description = "Setup not completed")
    ),
    tag = "stats"
)]
pub async fn get_overview(State(db): State<Database>) -> Result<Response, WebError> {
    let overview = services::overview(&db).await?;

    Ok(Json(overview).into_response())
}

#[utoipa::path(
    get,
    path = "/api/stats/leaderboard",
    responses(
        (status = 200, description = "Participants ranked by wins, then total change", body = Vec<LeaderboardEntry>),
        (status = 409, description = "Setup not completed")
    ),
    tag = "stats"
)]
pub async fn get_leaderboard(State(db): State<Database>) -> Result<Response, WebError> {
    let leaderboard = services::leaderboard(&db).await?;

    Ok(Json(leaderboard).into_response())
}

#[utoipa::path(
    get,
    path = "/api/stats/pot",
    responses(
        (status = 200, description = "Pot total and contributions", body = PotInfo),
        (status = 409, description = "Setup not completed")
    ),
    tag = "stats"
)]
pub async fn get_pot(State(db): State<Database>) -> Result<Response, WebError> {
    let pot = services::pot_info(&db).await?;

    Ok(Json(pot).into_response())
}

#[utoipa::path(
    get,
    path = "/api/stats/prognosis",
    responses(
        (status = 200, description = "Projected weights at the end of the battle", body = Prognosis),
        (status = 409, description = "Setup not completed")
    ),
    tag = "stats"
)]
pub async fn get_prognosis(State(db): State<Database>) -> Result<Response, WebError> {
    let prognosis = services::prognosis(&db).await?;

    Ok(Json(prognosis).into_response())
}

#[utoipa::path(
    get,
    path = "/api/stats/progress",
    responses(
        (status = 200, description = "Weight relative to start weight per week", body = Vec<ProgressSeries>),
        (status = 409, description = "Setup not completed")
    ),
    tag = "stats"
)]
pub async fn get_progress(State(db): State<Database>) -> Result<Response, WebError> {
    let progress = services::relative_progress(&db).await?;

    Ok(Json(progress).into_response())
}

#[utoipa::path(
    get,
    path = "/api/stats/participant/{participant_id}",
    params(
        ("participant_id" = Uuid, Path, description = "Participant ID")
    ),
    responses(
        (status = 200, description = "Statistics for one participant", body = ParticipantStats),
        (status = 404, description = "Participant not found")
    ),
    tag = "stats"
)]
pub async fn get_participant_stats(
    State(db): State<Database>,
    Path(participant_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let stats = services::participant_stats(&db, participant_id).await?;

    Ok(Json(stats).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/recompute-all",
    responses(
        (status = 200, description = "Weekly results recomputed"),
        (status = 409, description = "Setup not completed")
    ),
    tag = "stats"
)]
pub async fn recompute_all(State(db): State<Database>) -> Result<Response, WebError> {
    let count = services::recompute_all(&db).await?;

    Ok(Json(serde_json::json!({
        "stored_results": count,
        "message": format!("Recomputed all weeks, {} results stored", count)
    }))
    .into_response())
}
