//! Test double that records the locking calls sessions make.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::memory::MemoryStore;
use super::{LockMode, StoreSession, WeighInStore};
use crate::dto::audit::AuditQuery;
use crate::error::Result;
use crate::models::{AuditChange, AuditEntry, BattleConfig, Participant, WeeklyResult, WeighIn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Roster(LockMode),
    Week(NaiveDate),
    ListWeeks,
    CreateParticipant,
    Commit,
}

#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingStore {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

#[async_trait]
impl WeighInStore for RecordingStore {
    async fn begin(&self) -> Result<Box<dyn StoreSession + '_>> {
        Ok(Box::new(RecordingSession {
            inner: self.inner.begin().await?,
            events: self.events.clone(),
        }))
    }

    async fn snapshot(&self) -> Result<Box<dyn StoreSession + '_>> {
        self.inner.snapshot().await
    }
}

struct RecordingSession<'a> {
    inner: Box<dyn StoreSession + 'a>,
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingSession<'_> {
    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl StoreSession for RecordingSession<'_> {
    async fn list_participants(&mut self) -> Result<Vec<Participant>> {
        self.inner.list_participants().await
    }

    async fn find_participant(&mut self, participant_id: Uuid) -> Result<Participant> {
        self.inner.find_participant(participant_id).await
    }

    async fn create_participant(&mut self, name: &str, start_weight: f64) -> Result<Participant> {
        self.record(Event::CreateParticipant);
        self.inner.create_participant(name, start_weight).await
    }

    async fn update_participant(
        &mut self,
        participant_id: Uuid,
        name: &str,
        start_weight: f64,
    ) -> Result<Participant> {
        self.inner
            .update_participant(participant_id, name, start_weight)
            .await
    }

    async fn find_weigh_in(
        &mut self,
        participant_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Option<WeighIn>> {
        self.inner.find_weigh_in(participant_id, week_start).await
    }

    async fn upsert_weigh_in(
        &mut self,
        participant_id: Uuid,
        week_start: NaiveDate,
        weight: f64,
    ) -> Result<WeighIn> {
        self.inner
            .upsert_weigh_in(participant_id, week_start, weight)
            .await
    }

    async fn week_weigh_ins(&mut self, week_start: NaiveDate) -> Result<Vec<WeighIn>> {
        self.inner.week_weigh_ins(week_start).await
    }

    async fn participant_weigh_ins(&mut self, participant_id: Uuid) -> Result<Vec<WeighIn>> {
        self.inner.participant_weigh_ins(participant_id).await
    }

    async fn weigh_in_weeks(&mut self) -> Result<Vec<NaiveDate>> {
        self.record(Event::ListWeeks);
        self.inner.weigh_in_weeks().await
    }

    async fn weekly_result(&mut self, week_start: NaiveDate) -> Result<Option<WeeklyResult>> {
        self.inner.weekly_result(week_start).await
    }

    async fn save_weekly_result(&mut self, result: &WeeklyResult) -> Result<()> {
        self.inner.save_weekly_result(result).await
    }

    async fn delete_weekly_result(&mut self, week_start: NaiveDate) -> Result<()> {
        self.inner.delete_weekly_result(week_start).await
    }

    async fn list_weekly_results(&mut self) -> Result<Vec<WeeklyResult>> {
        self.inner.list_weekly_results().await
    }

    async fn battle_config(&mut self) -> Result<Option<BattleConfig>> {
        self.inner.battle_config().await
    }

    async fn save_battle_config(&mut self, config: &BattleConfig) -> Result<()> {
        self.inner.save_battle_config(config).await
    }

    async fn lock_roster(&mut self, mode: LockMode) -> Result<()> {
        self.record(Event::Roster(mode));
        self.inner.lock_roster(mode).await
    }

    async fn lock_week(&mut self, week_start: NaiveDate) -> Result<()> {
        self.record(Event::Week(week_start));
        self.inner.lock_week(week_start).await
    }

    async fn log_change(&mut self, change: &AuditChange) -> Result<()> {
        self.inner.log_change(change).await
    }

    async fn audit_log(&mut self, query: &AuditQuery) -> Result<Vec<AuditEntry>> {
        self.inner.audit_log(query).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.record(Event::Commit);
        self.inner.commit().await
    }
}
