use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::{LockMode, StoreSession, WeighInStore};
use crate::Database;
use crate::dto::audit::AuditQuery;
use crate::error::Result;
use crate::models::{AuditChange, AuditEntry, BattleConfig, Participant, WeeklyResult, WeighIn};
use crate::repository::audit::AuditRepository;
use crate::repository::participant::ParticipantRepository;
use crate::repository::settings::SettingsRepository;
use crate::repository::weekly_result::WeeklyResultRepository;
use crate::repository::weigh_in::WeighInRepository;

#[async_trait]
impl WeighInStore for Database {
    async fn begin(&self) -> Result<Box<dyn StoreSession + '_>> {
        let tx = self.pool().begin().await?;
        Ok(Box::new(PgSession { tx }))
    }

    async fn snapshot(&self) -> Result<Box<dyn StoreSession + '_>> {
        let mut tx = self.pool().begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(Box::new(PgSession { tx }))
    }
}

/// A session is one PostgreSQL transaction; dropping it rolls back.
pub struct PgSession {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreSession for PgSession {
    async fn list_participants(&mut self) -> Result<Vec<Participant>> {
        ParticipantRepository::new(&mut self.tx).list().await
    }

    async fn find_participant(&mut self, participant_id: Uuid) -> Result<Participant> {
        ParticipantRepository::new(&mut self.tx)
            .find_by_id(participant_id)
            .await
    }

    async fn create_participant(&mut self, name: &str, start_weight: f64) -> Result<Participant> {
        ParticipantRepository::new(&mut self.tx)
            .create(name, start_weight)
            .await
    }

    async fn update_participant(
        &mut self,
        participant_id: Uuid,
        name: &str,
        start_weight: f64,
    ) -> Result<Participant> {
        ParticipantRepository::new(&mut self.tx)
            .update(participant_id, name, start_weight)
            .await
    }

    async fn find_weigh_in(
        &mut self,
        participant_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Option<WeighIn>> {
        WeighInRepository::new(&mut self.tx)
            .find(participant_id, week_start)
            .await
    }

    async fn upsert_weigh_in(
        &mut self,
        participant_id: Uuid,
        week_start: NaiveDate,
        weight: f64,
    ) -> Result<WeighIn> {
        WeighInRepository::new(&mut self.tx)
            .upsert(participant_id, week_start, weight)
            .await
    }

    async fn week_weigh_ins(&mut self, week_start: NaiveDate) -> Result<Vec<WeighIn>> {
        WeighInRepository::new(&mut self.tx)
            .list_for_week(week_start)
            .await
    }

    async fn participant_weigh_ins(&mut self, participant_id: Uuid) -> Result<Vec<WeighIn>> {
        WeighInRepository::new(&mut self.tx)
            .list_for_participant(participant_id)
            .await
    }

    async fn weigh_in_weeks(&mut self) -> Result<Vec<NaiveDate>> {
        WeighInRepository::new(&mut self.tx).list_weeks().await
    }

    async fn weekly_result(&mut self, week_start: NaiveDate) -> Result<Option<WeeklyResult>> {
        WeeklyResultRepository::new(&mut self.tx)
            .find(week_start)
            .await
    }

    async fn save_weekly_result(&mut self, result: &WeeklyResult) -> Result<()> {
        WeeklyResultRepository::new(&mut self.tx).upsert(result).await
    }

    async fn delete_weekly_result(&mut self, week_start: NaiveDate) -> Result<()> {
        WeeklyResultRepository::new(&mut self.tx)
            .delete(week_start)
            .await
    }

    async fn list_weekly_results(&mut self) -> Result<Vec<WeeklyResult>> {
        WeeklyResultRepository::new(&mut self.tx).list().await
    }

    async fn battle_config(&mut self) -> Result<Option<BattleConfig>> {
        SettingsRepository::new(&mut self.tx).get().await
    }

    async fn save_battle_config(&mut self, config: &BattleConfig) -> Result<()> {
        SettingsRepository::new(&mut self.tx).save(config).await
    }

    async fn lock_roster(&mut self, mode: LockMode) -> Result<()> {
        ParticipantRepository::new(&mut self.tx)
            .lock_roster(mode)
            .await
    }

    async fn lock_week(&mut self, week_start: NaiveDate) -> Result<()> {
        WeeklyResultRepository::new(&mut self.tx)
            .lock_week(week_start)
            .await
    }

    async fn log_change(&mut self, change: &AuditChange) -> Result<()> {
        AuditRepository::new(&mut self.tx).insert(change).await
    }

    async fn audit_log(&mut self, query: &AuditQuery) -> Result<Vec<AuditEntry>> {
        AuditRepository::new(&mut self.tx).list(query).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let PgSession { tx } = *self;
        tx.commit().await?;
        Ok(())
    }
}
