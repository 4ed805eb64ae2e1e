use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use super::{decimal_to_f64, weight_to_decimal};
use crate::error::{Result, StorageError};
use crate::models::Participant;
use crate::store::LockMode;

/// Advisory key of the roster lock. Week locks use positive day numbers.
const ROSTER_LOCK_KEY: i64 = -1;

#[derive(FromRow)]
struct ParticipantRow {
    participant_id: Uuid,
    name: String,
    start_weight: Decimal,
    created_at: chrono::NaiveDateTime,
}

impl From<ParticipantRow> for Participant {
    fn from(row: ParticipantRow) -> Self {
        Self {
            participant_id: row.participant_id,
            name: row.name,
            start_weight: decimal_to_f64(row.start_weight),
            created_at: row.created_at,
        }
    }
}

/// Repository for participant rows, bound to one connection or transaction
pub struct ParticipantRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> ParticipantRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// List all participants
    pub async fn list(&mut self) -> Result<Vec<Participant>> {
        let rows: Vec<ParticipantRow> = sqlx::query_as(
            r#"
            SELECT participant_id, name, start_weight, created_at
            FROM participants
            ORDER BY name
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Participant::from).collect())
    }

    /// Find participant by ID
    pub async fn find_by_id(&mut self, id: Uuid) -> Result<Participant> {
        let row: ParticipantRow = sqlx::query_as(
            r#"
            SELECT participant_id, name, start_weight, created_at
            FROM participants
            WHERE participant_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    /// Create a new participant
    pub async fn create(&mut self, name: &str, start_weight: f64) -> Result<Participant> {
        let row: ParticipantRow = sqlx::query_as(
            r#"
            INSERT INTO participants (name, start_weight)
            VALUES ($1, $2)
            RETURNING participant_id, name, start_weight, created_at
            "#,
        )
        .bind(name)
        .bind(weight_to_decimal(start_weight))
        .fetch_one(&mut *self.conn)
        .await
        .map_err(duplicate_name)?;

        Ok(row.into())
    }

    /// Update name and start weight of an existing participant
    pub async fn update(&mut self, id: Uuid, name: &str, start_weight: f64) -> Result<Participant> {
        let row: ParticipantRow = sqlx::query_as(
            r#"
            UPDATE participants
            SET name = $2,
                start_weight = $3
            WHERE participant_id = $1
            RETURNING participant_id, name, start_weight, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(weight_to_decimal(start_weight))
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(duplicate_name)?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    /// Transaction-scoped advisory lock over the participant set
    pub async fn lock_roster(&mut self, mode: LockMode) -> Result<()> {
        let statement = match mode {
            LockMode::Shared => "SELECT pg_advisory_xact_lock_shared($1)",
            LockMode::Exclusive => "SELECT pg_advisory_xact_lock($1)",
        };

        sqlx::query(statement)
            .bind(ROSTER_LOCK_KEY)
            .execute(&mut *self.conn)
            .await?;

        Ok(())
    }
}

fn duplicate_name(error: sqlx::Error) -> StorageError {
    let error = StorageError::from(error);
    if error.is_unique_violation() {
        return StorageError::ConstraintViolation("Participant name already exists".to_string());
    }
    error
}
