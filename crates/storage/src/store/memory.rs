use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use super::{LockMode, StoreSession, WeighInStore};
use crate::dto::audit::AuditQuery;
use crate::error::{Result, StorageError};
use crate::models::{AuditChange, AuditEntry, BattleConfig, Participant, WeeklyResult, WeighIn};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    participants: Vec<Participant>,
    weigh_ins: BTreeMap<(Uuid, NaiveDate), WeighIn>,
    results: BTreeMap<NaiveDate, WeeklyResult>,
    config: Option<BattleConfig>,
    audit_log: Vec<AuditEntry>,
}

type Committed = Arc<RwLock<Arc<MemoryState>>>;

/// Process-local store.
///
/// Writers are serialized behind one mutex and work on a private copy of
/// the committed state, published on commit. Snapshots share the last
/// committed state and never wait for an open writer.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    writer: Arc<Mutex<()>>,
    committed: Committed,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WeighInStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreSession + '_>> {
        let guard = self.writer.clone().lock_owned().await;
        let state = self.committed.read().await.clone();
        Ok(Box::new(MemorySession {
            writer: Some(Writer {
                _guard: guard,
                committed: self.committed.clone(),
            }),
            state,
        }))
    }

    async fn snapshot(&self) -> Result<Box<dyn StoreSession + '_>> {
        let state = self.committed.read().await.clone();
        Ok(Box::new(MemorySession {
            writer: None,
            state,
        }))
    }
}

struct Writer {
    _guard: OwnedMutexGuard<()>,
    committed: Committed,
}

pub struct MemorySession {
    writer: Option<Writer>,
    state: Arc<MemoryState>,
}

impl MemorySession {
    /// Copies the shared state on first write.
    fn state_mut(&mut self) -> &mut MemoryState {
        Arc::make_mut(&mut self.state)
    }

    fn participant_mut(&mut self, participant_id: Uuid) -> Result<&mut Participant> {
        self.state_mut()
            .participants
            .iter_mut()
            .find(|p| p.participant_id == participant_id)
            .ok_or(StorageError::NotFound)
    }

    fn ensure_unique_name(&self, name: &str, except: Option<Uuid>) -> Result<()> {
        let taken = self
            .state
            .participants
            .iter()
            .any(|p| p.name == name && Some(p.participant_id) != except);

        if taken {
            return Err(StorageError::ConstraintViolation(
                "Participant name already exists".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreSession for MemorySession {
    async fn list_participants(&mut self) -> Result<Vec<Participant>> {
        let mut participants = self.state.participants.clone();
        participants.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(participants)
    }

    async fn find_participant(&mut self, participant_id: Uuid) -> Result<Participant> {
        self.state
            .participants
            .iter()
            .find(|p| p.participant_id == participant_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn create_participant(&mut self, name: &str, start_weight: f64) -> Result<Participant> {
        self.ensure_unique_name(name, None)?;

        let participant = Participant {
            participant_id: Uuid::new_v4(),
            name: name.to_string(),
            start_weight,
            created_at: Utc::now().naive_utc(),
        };
        self.state_mut().participants.push(participant.clone());

        Ok(participant)
    }

    async fn update_participant(
        &mut self,
        participant_id: Uuid,
        name: &str,
        start_weight: f64,
    ) -> Result<Participant> {
        self.ensure_unique_name(name, Some(participant_id))?;

        let participant = self.participant_mut(participant_id)?;
        participant.name = name.to_string();
        participant.start_weight = start_weight;

        Ok(participant.clone())
    }

    async fn find_weigh_in(
        &mut self,
        participant_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Option<WeighIn>> {
        Ok(self
            .state
            .weigh_ins
            .get(&(participant_id, week_start))
            .cloned())
    }

    async fn upsert_weigh_in(
        &mut self,
        participant_id: Uuid,
        week_start: NaiveDate,
        weight: f64,
    ) -> Result<WeighIn> {
        self.find_participant(participant_id).await?;

        let weigh_in = WeighIn {
            participant_id,
            week_start,
            weight,
            recorded_at: Utc::now().naive_utc(),
        };
        self.state_mut()
            .weigh_ins
            .insert((participant_id, week_start), weigh_in.clone());

        Ok(weigh_in)
    }

    async fn week_weigh_ins(&mut self, week_start: NaiveDate) -> Result<Vec<WeighIn>> {
        Ok(self
            .state
            .weigh_ins
            .values()
            .filter(|w| w.week_start == week_start)
            .cloned()
            .collect())
    }

    async fn participant_weigh_ins(&mut self, participant_id: Uuid) -> Result<Vec<WeighIn>> {
        Ok(self
            .state
            .weigh_ins
            .range((participant_id, NaiveDate::MIN)..=(participant_id, NaiveDate::MAX))
            .map(|(_, w)| w.clone())
            .collect())
    }

    async fn weigh_in_weeks(&mut self) -> Result<Vec<NaiveDate>> {
        let mut weeks: Vec<NaiveDate> = self.state.weigh_ins.keys().map(|(_, w)| *w).collect();
        weeks.sort();
        weeks.dedup();
        Ok(weeks)
    }

    async fn weekly_result(&mut self, week_start: NaiveDate) -> Result<Option<WeeklyResult>> {
        Ok(self.state.results.get(&week_start).cloned())
    }

    async fn save_weekly_result(&mut self, result: &WeeklyResult) -> Result<()> {
        self.state_mut()
            .results
            .insert(result.week_start, result.clone());
        Ok(())
    }

    async fn delete_weekly_result(&mut self, week_start: NaiveDate) -> Result<()> {
        self.state_mut().results.remove(&week_start);
        Ok(())
    }

    async fn list_weekly_results(&mut self) -> Result<Vec<WeeklyResult>> {
        Ok(self.state.results.values().rev().cloned().collect())
    }

    async fn battle_config(&mut self) -> Result<Option<BattleConfig>> {
        Ok(self.state.config.clone())
    }

    async fn save_battle_config(&mut self, config: &BattleConfig) -> Result<()> {
        self.state_mut().config = Some(config.clone());
        Ok(())
    }

    async fn lock_roster(&mut self, _mode: LockMode) -> Result<()> {
        // Writers already hold the store-wide lock.
        Ok(())
    }

    async fn lock_week(&mut self, _week_start: NaiveDate) -> Result<()> {
        Ok(())
    }

    async fn log_change(&mut self, change: &AuditChange) -> Result<()> {
        let log = &mut self.state_mut().audit_log;
        let audit_id = log.len() as i64 + 1;
        log.push(AuditEntry {
            audit_id,
            entity: change.entity.as_str().to_string(),
            entity_id: change.entity_id,
            old_value: change.old_value.clone(),
            new_value: change.new_value.clone(),
            changed_by: change.changed_by.clone(),
            changed_at: Utc::now().naive_utc(),
        });
        Ok(())
    }

    async fn audit_log(&mut self, query: &AuditQuery) -> Result<Vec<AuditEntry>> {
        let limit = usize::try_from(query.limit()).unwrap_or(0);

        Ok(self
            .state
            .audit_log
            .iter()
            .rev()
            .filter(|e| query.entity.is_none_or(|entity| e.entity == entity.as_str()))
            .filter(|e| query.entity_id.is_none_or(|id| e.entity_id == id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemorySession { writer, state } = *self;
        if let Some(writer) = writer {
            *writer.committed.write().await = state;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::AuditEntity;

    fn week(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_uncommitted_session_rolls_back() {
        let store = MemoryStore::new();

        let mut session = store.begin().await.unwrap();
        session.create_participant("Anna", 80.0).await.unwrap();
        drop(session);

        let mut view = store.snapshot().await.unwrap();
        assert!(view.list_participants().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let store = MemoryStore::new();

        let mut session = store.begin().await.unwrap();
        let anna = session.create_participant("Anna", 80.0).await.unwrap();
        session.upsert_weigh_in(anna.participant_id, week(5), 79.5).await.unwrap();
        session.commit().await.unwrap();

        let mut view = store.snapshot().await.unwrap();
        let history = view.participant_weigh_ins(anna.participant_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].weight, 79.5);
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_week() {
        let store = MemoryStore::new();
        let mut session = store.begin().await.unwrap();
        let anna = session.create_participant("Anna", 80.0).await.unwrap();

        session.upsert_weigh_in(anna.participant_id, week(5), 79.5).await.unwrap();
        session.upsert_weigh_in(anna.participant_id, week(5), 79.1).await.unwrap();

        let weigh_ins = session.week_weigh_ins(week(5)).await.unwrap();
        assert_eq!(weigh_ins.len(), 1);
        assert_eq!(weigh_ins[0].weight, 79.1);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let store = MemoryStore::new();
        let mut session = store.begin().await.unwrap();
        session.create_participant("Anna", 80.0).await.unwrap();

        let err = session.create_participant("Anna", 70.0).await.unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_weigh_in_for_unknown_participant() {
        let store = MemoryStore::new();
        let mut session = store.begin().await.unwrap();

        let err = session
            .upsert_weigh_in(Uuid::new_v4(), week(5), 80.0)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn test_results_listed_most_recent_first() {
        let store = MemoryStore::new();
        let mut session = store.begin().await.unwrap();
        for d in [5, 19, 12] {
            session
                .save_weekly_result(&WeeklyResult {
                    week_start: week(d),
                    winner_id: None,
                    loser_id: None,
                    pot_change: 0,
                })
                .await
                .unwrap();
        }

        let weeks: Vec<NaiveDate> = session
            .list_weekly_results()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.week_start)
            .collect();
        assert_eq!(weeks, vec![week(19), week(12), week(5)]);
    }

    #[tokio::test]
    async fn test_snapshot_does_not_wait_for_open_writer() {
        let store = MemoryStore::new();
        let mut writer = store.begin().await.unwrap();
        writer.create_participant("Anna", 80.0).await.unwrap();

        let mut view = tokio::time::timeout(Duration::from_secs(1), store.snapshot())
            .await
            .unwrap()
            .unwrap();
        assert!(view.list_participants().await.unwrap().is_empty());

        writer.commit().await.unwrap();
        let mut view = store.snapshot().await.unwrap();
        assert_eq!(view.list_participants().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_audit_entries_follow_the_session() {
        let store = MemoryStore::new();

        let mut session = store.begin().await.unwrap();
        let anna = session.create_participant("Anna", 80.0).await.unwrap();
        session
            .log_change(&AuditChange::participant(None, &anna, "setup"))
            .await
            .unwrap();
        drop(session);

        let mut view = store.snapshot().await.unwrap();
        assert!(view.audit_log(&AuditQuery::default()).await.unwrap().is_empty());

        let mut session = store.begin().await.unwrap();
        let anna = session.create_participant("Anna", 80.0).await.unwrap();
        let weigh_in = session.upsert_weigh_in(anna.participant_id, week(5), 79.5).await.unwrap();
        session
            .log_change(&AuditChange::participant(None, &anna, "setup"))
            .await
            .unwrap();
        session
            .log_change(&AuditChange::weigh_in(None, &weigh_in, "Anna"))
            .await
            .unwrap();
        session.commit().await.unwrap();

        let mut view = store.snapshot().await.unwrap();
        let all = view.audit_log(&AuditQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].entity, "weigh_in");
        assert_eq!(all[1].audit_id, 1);

        let participants = view
            .audit_log(&AuditQuery {
                entity: Some(AuditEntity::Participant),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].changed_by, "setup");

        let latest = view
            .audit_log(&AuditQuery {
                entity_id: Some(anna.participant_id),
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].entity, "weigh_in");
    }
}
