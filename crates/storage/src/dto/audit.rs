use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::models::AuditEntity;

pub const DEFAULT_AUDIT_LIMIT: i64 = 100;

/// Filters for listing the audit log, newest entries first
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditQuery {
    pub entity: Option<AuditEntity>,
    pub entity_id: Option<Uuid>,
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<i64>,
}

impl AuditQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_AUDIT_LIMIT)
    }
}
