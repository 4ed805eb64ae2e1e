//! Store abstraction used by the scoring engine.
//!
//! A [`WeighInStore`] hands out sessions. A session opened with
//! [`WeighInStore::begin`] is a unit of work: nothing it writes is visible
//! until [`StoreSession::commit`], and dropping it rolls everything back.
//! A session opened with [`WeighInStore::snapshot`] is read-only and sees
//! one consistent state for its whole lifetime.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::dto::audit::AuditQuery;
use crate::error::Result;
use crate::models::{AuditChange, AuditEntry, BattleConfig, Participant, WeeklyResult, WeighIn};

pub mod memory;
pub mod postgres;
#[cfg(test)]
pub(crate) mod recording;

/// How a session holds the roster lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Work that reads the participant set, such as computing a week
    Shared,
    /// Work that changes the participant set or start weights
    Exclusive,
}

#[async_trait]
pub trait WeighInStore: Send + Sync {
    /// Open a read-write unit of work.
    async fn begin(&self) -> Result<Box<dyn StoreSession + '_>>;

    /// Open a read-only, self-consistent view.
    async fn snapshot(&self) -> Result<Box<dyn StoreSession + '_>>;
}

#[async_trait]
pub trait StoreSession: Send {
    /// All participants ordered by name.
    async fn list_participants(&mut self) -> Result<Vec<Participant>>;

    async fn find_participant(&mut self, participant_id: Uuid) -> Result<Participant>;

    async fn create_participant(&mut self, name: &str, start_weight: f64) -> Result<Participant>;

    async fn update_participant(
        &mut self,
        participant_id: Uuid,
        name: &str,
        start_weight: f64,
    ) -> Result<Participant>;

    async fn find_weigh_in(
        &mut self,
        participant_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Option<WeighIn>>;

    /// Insert the weigh-in or replace the one already filed for that week.
    async fn upsert_weigh_in(
        &mut self,
        participant_id: Uuid,
        week_start: NaiveDate,
        weight: f64,
    ) -> Result<WeighIn>;

    async fn week_weigh_ins(&mut self, week_start: NaiveDate) -> Result<Vec<WeighIn>>;

    /// A participant's weigh-ins ordered by week.
    async fn participant_weigh_ins(&mut self, participant_id: Uuid) -> Result<Vec<WeighIn>>;

    /// Distinct weeks having at least one weigh-in, ascending.
    async fn weigh_in_weeks(&mut self) -> Result<Vec<NaiveDate>>;

    async fn weekly_result(&mut self, week_start: NaiveDate) -> Result<Option<WeeklyResult>>;

    async fn save_weekly_result(&mut self, result: &WeeklyResult) -> Result<()>;

    async fn delete_weekly_result(&mut self, week_start: NaiveDate) -> Result<()>;

    /// All weekly results, most recent week first.
    async fn list_weekly_results(&mut self) -> Result<Vec<WeeklyResult>>;

    async fn battle_config(&mut self) -> Result<Option<BattleConfig>>;

    async fn save_battle_config(&mut self, config: &BattleConfig) -> Result<()>;

    /// Hold the roster lock until the session ends. Taken before any week
    /// lock.
    async fn lock_roster(&mut self, mode: LockMode) -> Result<()>;

    /// Serialize result recomputation for `week_start` until the session ends.
    async fn lock_week(&mut self, week_start: NaiveDate) -> Result<()>;

    /// Append to the audit log. The entry shares the fate of the session.
    async fn log_change(&mut self, change: &AuditChange) -> Result<()>;

    /// Audit entries matching `query`, newest first.
    async fn audit_log(&mut self, query: &AuditQuery) -> Result<Vec<AuditEntry>>;

    async fn commit(self: Box<Self>) -> Result<()>;
}
