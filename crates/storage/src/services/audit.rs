//! Change history of participants and weigh-ins.
//!
//! Entries are appended by the writes themselves, inside the session that
//! makes the change. This module only reads them back.

use crate::dto::audit::AuditQuery;
use crate::error::Result;
use crate::models::AuditEntry;
use crate::store::WeighInStore;

pub async fn audit_log(store: &dyn WeighInStore, query: &AuditQuery) -> Result<Vec<AuditEntry>> {
    let mut session = store.snapshot().await?;
    session.audit_log(query).await
}
