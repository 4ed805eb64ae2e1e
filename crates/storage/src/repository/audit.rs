use chrono::NaiveDateTime;
use serde_json::Value;
use sqlx::{FromRow, PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::audit::AuditQuery;
use crate::error::Result;
use crate::models::{AuditChange, AuditEntry};

#[derive(FromRow)]
struct AuditRow {
    audit_id: i64,
    entity: String,
    entity_id: Uuid,
    old_value: Option<Value>,
    new_value: Option<Value>,
    changed_by: String,
    changed_at: NaiveDateTime,
}

impl From<AuditRow> for AuditEntry {
    fn from(row: AuditRow) -> Self {
        Self {
            audit_id: row.audit_id,
            entity: row.entity,
            entity_id: row.entity_id,
            old_value: row.old_value,
            new_value: row.new_value,
            changed_by: row.changed_by,
            changed_at: row.changed_at,
        }
    }
}

pub struct AuditRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> AuditRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&mut self, change: &AuditChange) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (entity, entity_id, old_value, new_value, changed_by)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(change.entity.as_str())
        .bind(change.entity_id)
        .bind(&change.old_value)
        .bind(&change.new_value)
        .bind(&change.changed_by)
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }

    /// Newest first, optionally narrowed to one entity kind and id
    pub async fn list(&mut self, filter: &AuditQuery) -> Result<Vec<AuditEntry>> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT audit_id, entity, entity_id, old_value, new_value, changed_by, changed_at
            FROM audit_log
            WHERE 1=1
            "#,
        );

        if let Some(entity) = filter.entity {
            query.push(" AND entity = ");
            query.push_bind(entity.as_str());
        }

        if let Some(entity_id) = filter.entity_id {
            query.push(" AND entity_id = ");
            query.push_bind(entity_id);
        }

        query.push(" ORDER BY changed_at DESC, audit_id DESC LIMIT ");
        query.push_bind(filter.limit());

        let rows: Vec<AuditRow> = query
            .build_query_as()
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(rows.into_iter().map(AuditEntry::from).collect())
    }
}
