use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use storage::{Database, dto::audit::AuditQuery, models::AuditEntry};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/audit",
    params(AuditQuery),
    responses(
        (status = 200, description = "Changes to participants and weigh-ins, newest first", body = Vec<AuditEntry>),
        (status = 400, description = "Validation error")
    ),
    tag = "audit"
)]
pub async fn list_audit_log(
    State(db): State<Database>,
    Query(query): Query<AuditQuery>,
) -> Result<Response, WebError> {
    query.validate()?;

    let entries = services::audit_log(&db, &query).await?;

    Ok(Json(entries).into_response())
}
