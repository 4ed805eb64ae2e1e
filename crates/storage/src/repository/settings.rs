use chrono::NaiveDate;
use sqlx::{FromRow, PgConnection};

use crate::error::Result;
use crate::models::BattleConfig;

#[derive(FromRow)]
struct SettingsRow {
    pot_contribution: i32,
    total_amount: i32,
    battle_end_date: NaiveDate,
}

/// The single-row `battle_settings` table
pub struct SettingsRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> SettingsRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&mut self) -> Result<Option<BattleConfig>> {
        let row: Option<SettingsRow> = sqlx::query_as(
            r#"
            SELECT pot_contribution, total_amount, battle_end_date
            FROM battle_settings
            "#,
        )
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(|row| BattleConfig {
            pot_contribution: row.pot_contribution,
            total_amount: row.total_amount,
            battle_end_date: row.battle_end_date,
        }))
    }

    pub async fn save(&mut self, config: &BattleConfig) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO battle_settings (settings_id, pot_contribution, total_amount, battle_end_date)
            VALUES (TRUE, $1, $2, $3)
            ON CONFLICT (settings_id)
            DO UPDATE SET
                pot_contribution = EXCLUDED.pot_contribution,
                total_amount = EXCLUDED.total_amount,
                battle_end_date = EXCLUDED.battle_end_date
            "#,
        )
        .bind(config.pot_contribution)
        .bind(config.total_amount)
        .bind(config.battle_end_date)
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }
}
