use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use super::{decimal_to_f64, weight_to_decimal};
use crate::error::{Result, StorageError};
use crate::models::WeighIn;

#[derive(FromRow)]
struct WeighInRow {
    participant_id: Uuid,
    week_start: NaiveDate,
    weight: Decimal,
    recorded_at: NaiveDateTime,
}

impl From<WeighInRow> for WeighIn {
    fn from(row: WeighInRow) -> Self {
        Self {
            participant_id: row.participant_id,
            week_start: row.week_start,
            weight: decimal_to_f64(row.weight),
            recorded_at: row.recorded_at,
        }
    }
}

pub struct WeighInRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> WeighInRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, participant_id: Uuid, week_start: NaiveDate) -> Result<Option<WeighIn>> {
        let row: Option<WeighInRow> = sqlx::query_as(
            r#"
            SELECT participant_id, week_start, weight, recorded_at
            FROM weigh_ins
            WHERE participant_id = $1 AND week_start = $2
            "#,
        )
        .bind(participant_id)
        .bind(week_start)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(WeighIn::from))
    }

    /// Insert a weigh-in, replacing the weight if the week was already filed
    pub async fn upsert(
        &mut self,
        participant_id: Uuid,
        week_start: NaiveDate,
        weight: f64,
    ) -> Result<WeighIn> {
        let row: WeighInRow = sqlx::query_as(
            r#"
            INSERT INTO weigh_ins (participant_id, week_start, weight)
            VALUES ($1, $2, $3)
            ON CONFLICT (participant_id, week_start)
            DO UPDATE SET
                weight = EXCLUDED.weight,
                recorded_at = CURRENT_TIMESTAMP
            RETURNING participant_id, week_start, weight, recorded_at
            "#,
        )
        .bind(participant_id)
        .bind(week_start)
        .bind(weight_to_decimal(weight))
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            let error = StorageError::from(e);
            if error.is_foreign_key_violation() {
                return StorageError::NotFound;
            }
            error
        })?;

        Ok(row.into())
    }

    pub async fn list_for_week(&mut self, week_start: NaiveDate) -> Result<Vec<WeighIn>> {
        let rows: Vec<WeighInRow> = sqlx::query_as(
            r#"
            SELECT participant_id, week_start, weight, recorded_at
            FROM weigh_ins
            WHERE week_start = $1
            ORDER BY participant_id
            "#,
        )
        .bind(week_start)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(WeighIn::from).collect())
    }

    pub async fn list_for_participant(&mut self, participant_id: Uuid) -> Result<Vec<WeighIn>> {
        let rows: Vec<WeighInRow> = sqlx::query_as(
            r#"
            SELECT participant_id, week_start, weight, recorded_at
            FROM weigh_ins
            WHERE participant_id = $1
            ORDER BY week_start
            "#,
        )
        .bind(participant_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(WeighIn::from).collect())
    }

    pub async fn list_weeks(&mut self) -> Result<Vec<NaiveDate>> {
        let weeks: Vec<NaiveDate> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT week_start
            FROM weigh_ins
            ORDER BY week_start
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(weeks)
    }
}
