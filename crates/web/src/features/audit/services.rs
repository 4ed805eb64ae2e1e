use storage::{
    Database, dto::audit::AuditQuery, error::Result, models::AuditEntry, services::audit,
};

pub async fn audit_log(db: &Database, query: &AuditQuery) -> Result<Vec<AuditEntry>> {
    audit::audit_log(db, query).await
}
