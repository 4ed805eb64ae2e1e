use chrono::NaiveDate;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use crate::error::Result;
use crate::models::WeeklyResult;

#[derive(FromRow)]
struct WeeklyResultRow {
    week_start: NaiveDate,
    winner_id: Option<Uuid>,
    loser_id: Option<Uuid>,
    pot_change: i32,
}

impl From<WeeklyResultRow> for WeeklyResult {
    fn from(row: WeeklyResultRow) -> Self {
        Self {
            week_start: row.week_start,
            winner_id: row.winner_id,
            loser_id: row.loser_id,
            pot_change: row.pot_change,
        }
    }
}

pub struct WeeklyResultRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> WeeklyResultRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, week_start: NaiveDate) -> Result<Option<WeeklyResult>> {
        let row: Option<WeeklyResultRow> = sqlx::query_as(
            r#"
            SELECT week_start, winner_id, loser_id, pot_change
            FROM weekly_results
            WHERE week_start = $1
            "#,
        )
        .bind(week_start)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(WeeklyResult::from))
    }

    /// Most recent week first
    pub async fn list(&mut self) -> Result<Vec<WeeklyResult>> {
        let rows: Vec<WeeklyResultRow> = sqlx::query_as(
            r#"
            SELECT week_start, winner_id, loser_id, pot_change
            FROM weekly_results
            ORDER BY week_start DESC
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(WeeklyResult::from).collect())
    }

    pub async fn upsert(&mut self, result: &WeeklyResult) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO weekly_results (week_start, winner_id, loser_id, pot_change)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (week_start)
            DO UPDATE SET
                winner_id = EXCLUDED.winner_id,
                loser_id = EXCLUDED.loser_id,
                pot_change = EXCLUDED.pot_change
            "#,
        )
        .bind(result.week_start)
        .bind(result.winner_id)
        .bind(result.loser_id)
        .bind(result.pot_change)
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }

    pub async fn delete(&mut self, week_start: NaiveDate) -> Result<()> {
        sqlx::query("DELETE FROM weekly_results WHERE week_start = $1")
            .bind(week_start)
            .execute(&mut *self.conn)
            .await?;

        Ok(())
    }

    /// Transaction-scoped advisory lock keyed by the week's day number
    pub async fn lock_week(&mut self, week_start: NaiveDate) -> Result<()> {
        use chrono::Datelike;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(i64::from(week_start.num_days_from_ce()))
            .execute(&mut *self.conn)
            .await?;

        Ok(())
    }
}
