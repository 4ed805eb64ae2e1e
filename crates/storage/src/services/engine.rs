//! Entry point for everything that reads or changes the battle.
//!
//! Writes run in one [`StoreSession`] opened with [`WeighInStore::begin`],
//! so a weigh-in and the weekly results it affects are committed together.
//! Reads load one snapshot into [`BattleData`] and compute from there.

use chrono::NaiveDate;
use uuid::Uuid;

use super::{BattleData, participant_name};
use super::numeric::{percentage_change, round_to};
use super::{forecast, leaderboard, overview, pot, stats, weekly_result};
use crate::dto::participant::{CreateParticipantRequest, UpdateParticipantRequest};
use crate::dto::stats::{
    LeaderboardEntry, Overview, ParticipantStats, PotInfo, Prognosis, ProgressSeries, Projection,
};
use crate::dto::week::{CurrentWeek, WeekView};
use crate::dto::weigh_in::{RecordedWeighIn, WeighInPreview};
use crate::error::{Result, StorageError};
use crate::models::week::{next_week, week_start};
use crate::models::{AuditChange, BattleConfig, Participant, SYSTEM_ACTOR, WeeklyResult, WeighIn};
use crate::store::{LockMode, StoreSession, WeighInStore};

pub struct ScoringEngine<'a> {
    store: &'a dyn WeighInStore,
    config: BattleConfig,
    today: NaiveDate,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(store: &'a dyn WeighInStore, config: BattleConfig) -> Self {
        Self::with_today(store, config, chrono::Local::now().date_naive())
    }

    /// Engine whose notion of "today" is fixed.
    pub fn with_today(store: &'a dyn WeighInStore, config: BattleConfig, today: NaiveDate) -> Self {
        Self {
            store,
            config,
            today,
        }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    async fn load(&self) -> Result<BattleData> {
        let mut session = self.store.snapshot().await?;
        BattleData::load(session.as_mut()).await
    }

    /// Recompute every week that has weigh-ins, inside `session`. The
    /// caller holds the roster lock exclusively.
    async fn recompute_weeks(&self, session: &mut dyn StoreSession) -> Result<u64> {
        let weeks = session.weigh_in_weeks().await?;

        let mut stored = 0;
        for week in weeks {
            session.lock_week(week).await?;
            let result =
                weekly_result::compute_weekly_result(session, week, self.config.pot_contribution)
                    .await?;
            if result.is_some() {
                stored += 1;
            }
        }

        Ok(stored)
    }

    /// File a weigh-in and bring the affected weekly results up to date.
    ///
    /// `week` may be any day of the target week and defaults to the current
    /// one. The following week is recomputed too when it already has
    /// weigh-ins, since this week is its reference.
    pub async fn record_weigh_in(
        &self,
        participant_id: Uuid,
        weight: f64,
        week: Option<NaiveDate>,
    ) -> Result<RecordedWeighIn> {
        let week = week_start(week.unwrap_or(self.today));
        let following = next_week(week);
        let weight = round_to(weight, 1);

        let mut session = self.store.begin().await?;
        session.lock_roster(LockMode::Shared).await?;
        session.lock_week(week).await?;
        session.lock_week(following).await?;

        let participant = session.find_participant(participant_id).await?;
        let previous_weight = weekly_result::reference_weight(
            session.as_mut(),
            participant_id,
            Some(participant.start_weight),
            week,
        )
        .await?
        .unwrap_or(participant.start_weight);

        let replaced = session.find_weigh_in(participant_id, week).await?;
        let weigh_in = session.upsert_weigh_in(participant_id, week, weight).await?;
        session
            .log_change(&AuditChange::weigh_in(
                replaced.as_ref(),
                &weigh_in,
                &participant.name,
            ))
            .await?;

        weekly_result::compute_weekly_result(session.as_mut(), week, self.config.pot_contribution)
            .await?;
        if !session.week_weigh_ins(following).await?.is_empty() {
            weekly_result::compute_weekly_result(
                session.as_mut(),
                following,
                self.config.pot_contribution,
            )
            .await?;
        }

        session.commit().await?;

        tracing::info!(
            "Recorded {} kg for {} in week {}",
            weight,
            participant.name,
            week
        );

        Ok(RecordedWeighIn {
            weigh_in,
            previous_weight,
            percent_change: round_to(percentage_change(previous_weight, weight), 2),
        })
    }

    pub async fn compute_weekly_result(&self, week: NaiveDate) -> Result<Option<WeeklyResult>> {
        let week = week_start(week);

        let mut session = self.store.begin().await?;
        session.lock_roster(LockMode::Shared).await?;
        session.lock_week(week).await?;
        let result =
            weekly_result::compute_weekly_result(session.as_mut(), week, self.config.pot_contribution)
                .await?;
        session.commit().await?;

        Ok(result)
    }

    /// Recompute every week with weigh-ins. Returns how many results are
    /// stored afterwards.
    pub async fn recompute_all(&self) -> Result<u64> {
        let mut session = self.store.begin().await?;
        session.lock_roster(LockMode::Exclusive).await?;
        let stored = self.recompute_weeks(session.as_mut()).await?;
        session.commit().await?;

        tracing::info!("Recomputed all weeks, {} results stored", stored);
        Ok(stored)
    }

    /// Add a participant. Weeks that were complete without them are no
    /// longer complete and lose their result.
    pub async fn add_participant(&self, request: &CreateParticipantRequest) -> Result<Participant> {
        let name = participant_name(&request.name)?;

        let mut session = self.store.begin().await?;
        session.lock_roster(LockMode::Exclusive).await?;
        let participant = session
            .create_participant(name, round_to(request.start_weight, 1))
            .await?;
        session
            .log_change(&AuditChange::participant(None, &participant, SYSTEM_ACTOR))
            .await?;
        self.recompute_weeks(session.as_mut()).await?;
        session.commit().await?;

        tracing::info!(
            "Added participant {} starting at {} kg",
            participant.name,
            participant.start_weight
        );
        Ok(participant)
    }

    pub async fn update_participant(
        &self,
        participant_id: Uuid,
        request: &UpdateParticipantRequest,
    ) -> Result<Participant> {
        let name = request.name.as_deref().map(participant_name).transpose()?;

        let mut session = self.store.begin().await?;
        session.lock_roster(LockMode::Exclusive).await?;
        let current = session.find_participant(participant_id).await?;

        let name = name.unwrap_or(&current.name).to_string();
        let start_weight = request
            .start_weight
            .map(|w| round_to(w, 1))
            .unwrap_or(current.start_weight);

        let updated = session
            .update_participant(participant_id, &name, start_weight)
            .await?;
        session
            .log_change(&AuditChange::participant(
                Some(&current),
                &updated,
                SYSTEM_ACTOR,
            ))
            .await?;
        if updated.start_weight != current.start_weight {
            self.recompute_weeks(session.as_mut()).await?;
        }
        session.commit().await?;

        tracing::info!("Updated participant {}", updated.name);
        Ok(updated)
    }

    pub async fn participants(&self) -> Result<Vec<Participant>> {
        let mut session = self.store.snapshot().await?;
        session.list_participants().await
    }

    pub async fn participant(&self, participant_id: Uuid) -> Result<Participant> {
        let mut session = self.store.snapshot().await?;
        session.find_participant(participant_id).await
    }

    pub async fn participant_weigh_ins(&self, participant_id: Uuid) -> Result<Vec<WeighIn>> {
        let mut session = self.store.snapshot().await?;
        session.find_participant(participant_id).await?;
        session.participant_weigh_ins(participant_id).await
    }

    /// What `weight` would mean for the participant this week. Nothing is
    /// stored.
    pub async fn preview_weigh_in(&self, participant_id: Uuid, weight: f64) -> Result<WeighInPreview> {
        let week = week_start(self.today);
        let weight = round_to(weight, 1);

        let mut session = self.store.snapshot().await?;
        let participant = session.find_participant(participant_id).await?;
        let previous_weight = weekly_result::reference_weight(
            session.as_mut(),
            participant_id,
            Some(participant.start_weight),
            week,
        )
        .await?
        .unwrap_or(participant.start_weight);

        Ok(WeighInPreview {
            participant_id,
            weight,
            previous_weight,
            percent_change: round_to(percentage_change(previous_weight, weight), 2),
        })
    }

    pub async fn pot_info(&self) -> Result<PotInfo> {
        let data = self.load().await?;
        Ok(pot::pot_info(&data, &self.config))
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let data = self.load().await?;
        Ok(leaderboard::leaderboard(&data))
    }

    pub async fn projection(&self, participant_id: Uuid) -> Result<Projection> {
        let data = self.load().await?;
        let participant = data.participant(participant_id).ok_or(StorageError::NotFound)?;
        let weeks_remaining = forecast::weeks_remaining(self.config.battle_end_date, self.today);

        Ok(forecast::project(
            participant,
            data.history(participant_id),
            weeks_remaining,
        ))
    }

    pub async fn prognosis(&self) -> Result<Prognosis> {
        let data = self.load().await?;
        Ok(forecast::prognosis(&data, &self.config, self.today))
    }

    pub async fn overview(&self) -> Result<Overview> {
        let data = self.load().await?;
        Ok(overview::overview(&data, &self.config, self.today))
    }

    pub async fn participant_stats(&self, participant_id: Uuid) -> Result<ParticipantStats> {
        let data = self.load().await?;
        let participant = data.participant(participant_id).ok_or(StorageError::NotFound)?;
        Ok(stats::participant_stats(&data, participant))
    }

    pub async fn current_week(&self) -> Result<CurrentWeek> {
        let data = self.load().await?;
        Ok(stats::current_week(&data, self.today))
    }

    pub async fn week_view(&self, week: NaiveDate) -> Result<WeekView> {
        let data = self.load().await?;
        Ok(stats::week_view(&data, week))
    }

    pub async fn relative_progress(&self) -> Result<Vec<ProgressSeries>> {
        let data = self.load().await?;
        Ok(stats::relative_progress(&data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::week;
    use crate::store::memory::MemoryStore;
    use crate::store::recording::{Event, RecordingStore};

    fn config() -> BattleConfig {
        BattleConfig {
            pot_contribution: 5,
            total_amount: 100,
            battle_end_date: week(12),
        }
    }

    async fn seed(store: &MemoryStore, people: &[(&str, f64)]) -> Vec<Participant> {
        let mut session = store.begin().await.unwrap();
        let mut created = Vec::new();
        for (name, start_weight) in people {
            created.push(session.create_participant(name, *start_weight).await.unwrap());
        }
        session.save_battle_config(&config()).await.unwrap();
        session.commit().await.unwrap();
        created
    }

    async fn stored_result(store: &MemoryStore, week: NaiveDate) -> Option<WeeklyResult> {
        let mut session = store.snapshot().await.unwrap();
        session.weekly_result(week).await.unwrap()
    }

    #[tokio::test]
    async fn test_week_with_winner_and_loser() {
        let store = MemoryStore::new();
        let people = seed(&store, &[("Anna", 100.0), ("Ben", 80.0), ("Cleo", 60.0)]).await;
        let engine = ScoringEngine::with_today(&store, config(), week(0));

        for (p, weight) in people.iter().zip([99.0, 79.0, 61.0]) {
            engine.record_weigh_in(p.participant_id, weight, None).await.unwrap();
        }

        let result = stored_result(&store, week(0)).await.unwrap();
        assert_eq!(result.winner_id, Some(people[1].participant_id));
        assert_eq!(result.loser_id, Some(people[2].participant_id));
        assert_eq!(result.pot_change, 5);
        assert_eq!(engine.pot_info().await.unwrap().total, 5);
    }

    #[tokio::test]
    async fn test_exact_tie_has_no_winner_or_loser() {
        let store = MemoryStore::new();
        let people = seed(&store, &[("Anna", 100.0), ("Ben", 50.0)]).await;
        let engine = ScoringEngine::with_today(&store, config(), week(0));

        engine.record_weigh_in(people[0].participant_id, 98.0, None).await.unwrap();
        engine.record_weigh_in(people[1].participant_id, 49.0, None).await.unwrap();

        let result = stored_result(&store, week(0)).await.unwrap();
        assert_eq!(result.winner_id, None);
        assert_eq!(result.loser_id, None);
        assert_eq!(result.pot_change, 0);
    }

    #[tokio::test]
    async fn test_incomplete_week_has_no_result() {
        let store = MemoryStore::new();
        let people = seed(&store, &[("Anna", 100.0), ("Ben", 80.0), ("Cleo", 60.0)]).await;
        let engine = ScoringEngine::with_today(&store, config(), week(0));

        engine.record_weigh_in(people[0].participant_id, 99.0, None).await.unwrap();
        engine.record_weigh_in(people[1].participant_id, 79.0, None).await.unwrap();

        assert_eq!(engine.compute_weekly_result(week(0)).await.unwrap(), None);
        assert_eq!(stored_result(&store, week(0)).await, None);

        engine.record_weigh_in(people[2].participant_id, 61.0, None).await.unwrap();
        assert!(stored_result(&store, week(0)).await.is_some());
    }

    #[tokio::test]
    async fn test_new_participant_retracts_complete_weeks() {
        let store = MemoryStore::new();
        let people = seed(&store, &[("Anna", 100.0), ("Ben", 80.0)]).await;
        let engine = ScoringEngine::with_today(&store, config(), week(0));
        engine.record_weigh_in(people[0].participant_id, 99.0, None).await.unwrap();
        engine.record_weigh_in(people[1].participant_id, 79.0, None).await.unwrap();
        assert!(stored_result(&store, week(0)).await.is_some());

        let request = CreateParticipantRequest {
            name: " Cleo ".to_string(),
            start_weight: 60.04,
        };
        let cleo = engine.add_participant(&request).await.unwrap();

        assert_eq!(cleo.name, "Cleo");
        assert_eq!(cleo.start_weight, 60.0);
        assert_eq!(stored_result(&store, week(0)).await, None);
        assert_eq!(engine.recompute_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_resubmission_replaces_weigh_in() {
        let store = MemoryStore::new();
        let people = seed(&store, &[("Anna", 100.0), ("Ben", 80.0)]).await;
        let engine = ScoringEngine::with_today(&store, config(), week(0));
        let anna = people[0].participant_id;

        engine.record_weigh_in(anna, 99.0, None).await.unwrap();
        engine.record_weigh_in(people[1].participant_id, 79.6, None).await.unwrap();
        assert_eq!(
            stored_result(&store, week(0)).await.unwrap().winner_id,
            Some(anna)
        );

        let recorded = engine.record_weigh_in(anna, 99.84, None).await.unwrap();

        assert_eq!(recorded.weigh_in.weight, 99.8);
        assert_eq!(recorded.previous_weight, 100.0);
        assert_eq!(recorded.percent_change, 0.2);
        let history = engine.participant_weigh_ins(anna).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].weight, 99.8);
        assert_eq!(
            stored_result(&store, week(0)).await.unwrap().winner_id,
            Some(people[1].participant_id)
        );
    }

    #[tokio::test]
    async fn test_earlier_week_change_cascades_to_next_week() {
        let store = MemoryStore::new();
        let people = seed(&store, &[("Anna", 100.0), ("Ben", 80.0)]).await;
        let (anna, ben) = (people[0].participant_id, people[1].participant_id);
        let engine = ScoringEngine::with_today(&store, config(), week(1));

        engine.record_weigh_in(anna, 99.0, Some(week(0))).await.unwrap();
        engine.record_weigh_in(ben, 79.0, Some(week(0))).await.unwrap();
        engine.record_weigh_in(anna, 98.0, None).await.unwrap();
        engine.record_weigh_in(ben, 78.5, None).await.unwrap();
        assert_eq!(stored_result(&store, week(1)).await.unwrap().winner_id, Some(anna));

        engine.record_weigh_in(anna, 97.0, Some(week(0))).await.unwrap();

        let first = stored_result(&store, week(0)).await.unwrap();
        let second = stored_result(&store, week(1)).await.unwrap();
        assert_eq!(first.winner_id, Some(anna));
        assert_eq!(second.winner_id, Some(ben));
        assert_eq!(second.loser_id, Some(anna));
    }

    #[tokio::test]
    async fn test_pot_matches_stored_results() {
        let store = MemoryStore::new();
        let people = seed(&store, &[("Anna", 100.0), ("Ben", 80.0), ("Cleo", 60.0)]).await;
        let engine = ScoringEngine::with_today(&store, config(), week(3));
        let weights = [
            [99.0, 79.0, 61.0],
            [98.0, 78.9, 60.0],
            [98.0, 78.0, 60.5],
            [97.2, 77.1, 60.4],
        ];

        for (i, row) in weights.iter().enumerate() {
            for (p, weight) in people.iter().zip(row) {
                engine
                    .record_weigh_in(p.participant_id, *weight, Some(week(i as i64)))
                    .await
                    .unwrap();
            }
        }

        let results = {
            let mut session = store.snapshot().await.unwrap();
            session.list_weekly_results().await.unwrap()
        };
        let info = engine.pot_info().await.unwrap();
        let expected: i64 = results.iter().map(|r| i64::from(r.pot_change)).sum();

        assert_eq!(results.len(), 4);
        assert_eq!(info.total, expected);
        assert_eq!(
            info.contributions.iter().map(|c| c.total_contributed).sum::<i64>(),
            expected
        );
        assert!(results.iter().all(|r| r.winner_id != r.loser_id || r.winner_id.is_none()));
    }

    #[tokio::test]
    async fn test_failed_weigh_in_leaves_store_untouched() {
        let store = MemoryStore::new();
        seed(&store, &[("Anna", 100.0)]).await;
        let engine = ScoringEngine::with_today(&store, config(), week(0));

        let result = engine.record_weigh_in(Uuid::new_v4(), 90.0, None).await;

        assert!(matches!(result, Err(StorageError::NotFound)));
        let mut session = store.snapshot().await.unwrap();
        assert!(session.weigh_in_weeks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_weigh_ins_complete_the_week() {
        let store = MemoryStore::new();
        let people = seed(&store, &[("Anna", 100.0), ("Ben", 80.0), ("Cleo", 60.0)]).await;
        let engine = ScoringEngine::with_today(&store, config(), week(0));

        let (a, b, c) = tokio::join!(
            engine.record_weigh_in(people[0].participant_id, 99.0, None),
            engine.record_weigh_in(people[1].participant_id, 79.0, None),
            engine.record_weigh_in(people[2].participant_id, 61.0, None),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        let result = stored_result(&store, week(0)).await.unwrap();
        assert_eq!(result.winner_id, Some(people[1].participant_id));
    }

    #[tokio::test]
    async fn test_blank_names_are_refused() {
        let store = MemoryStore::new();
        let people = seed(&store, &[("Anna", 100.0)]).await;
        let engine = ScoringEngine::with_today(&store, config(), week(0));

        let added = engine
            .add_participant(&CreateParticipantRequest {
                name: "   ".to_string(),
                start_weight: 80.0,
            })
            .await;
        assert!(matches!(added, Err(StorageError::ConstraintViolation(_))));

        let renamed = engine
            .update_participant(
                people[0].participant_id,
                &UpdateParticipantRequest {
                    name: Some(" ".to_string()),
                    start_weight: None,
                },
            )
            .await;
        assert!(matches!(renamed, Err(StorageError::ConstraintViolation(_))));

        let names: Vec<String> = engine
            .participants()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Anna"]);
    }

    #[tokio::test]
    async fn test_weigh_ins_share_the_roster_lock_before_week_locks() {
        let store = RecordingStore::default();
        let people = seed(&store.inner, &[("Anna", 100.0)]).await;
        let engine = ScoringEngine::with_today(&store, config(), week(0));

        engine
            .record_weigh_in(people[0].participant_id, 99.0, None)
            .await
            .unwrap();
        assert_eq!(
            store.events()[..3],
            [
                Event::Roster(LockMode::Shared),
                Event::Week(week(0)),
                Event::Week(week(1)),
            ]
        );

        store.clear();
        engine.compute_weekly_result(week(0)).await.unwrap();
        assert_eq!(
            store.events(),
            vec![
                Event::Roster(LockMode::Shared),
                Event::Week(week(0)),
                Event::Commit,
            ]
        );
    }

    #[tokio::test]
    async fn test_roster_changes_lock_exclusively_before_listing_weeks() {
        let store = RecordingStore::default();
        let people = seed(&store.inner, &[("Anna", 100.0)]).await;
        let engine = ScoringEngine::with_today(&store, config(), week(0));
        engine
            .record_weigh_in(people[0].participant_id, 99.0, None)
            .await
            .unwrap();

        store.clear();
        engine
            .add_participant(&CreateParticipantRequest {
                name: "Ben".to_string(),
                start_weight: 80.0,
            })
            .await
            .unwrap();
        assert_eq!(
            store.events(),
            vec![
                Event::Roster(LockMode::Exclusive),
                Event::CreateParticipant,
                Event::ListWeeks,
                Event::Week(week(0)),
                Event::Commit,
            ]
        );

        store.clear();
        let request = UpdateParticipantRequest {
            name: None,
            start_weight: Some(101.0),
        };
        engine
            .update_participant(people[0].participant_id, &request)
            .await
            .unwrap();
        assert_eq!(store.events()[0], Event::Roster(LockMode::Exclusive));
        assert!(store.events().contains(&Event::ListWeeks));

        store.clear();
        engine.recompute_all().await.unwrap();
        assert_eq!(
            store.events()[..2],
            [Event::Roster(LockMode::Exclusive), Event::ListWeeks]
        );
    }

    #[tokio::test]
    async fn test_start_weight_change_recomputes_history() {
        let store = MemoryStore::new();
        let people = seed(&store, &[("Anna", 100.0), ("Ben", 80.0)]).await;
        let (anna, ben) = (people[0].participant_id, people[1].participant_id);
        let engine = ScoringEngine::with_today(&store, config(), week(0));
        engine.record_weigh_in(anna, 99.0, None).await.unwrap();
        engine.record_weigh_in(ben, 79.0, None).await.unwrap();
        assert_eq!(stored_result(&store, week(0)).await.unwrap().winner_id, Some(ben));

        let request = UpdateParticipantRequest {
            name: None,
            start_weight: Some(102.0),
        };
        let updated = engine.update_participant(anna, &request).await.unwrap();

        assert_eq!(updated.name, "Anna");
        assert_eq!(stored_result(&store, week(0)).await.unwrap().winner_id, Some(anna));
    }

    #[tokio::test]
    async fn test_reads_on_recorded_battle() {
        let store = MemoryStore::new();
        let people = seed(&store, &[("Anna", 92.0), ("Ben", 80.0)]).await;
        let anna = people[0].participant_id;
        let engine = ScoringEngine::with_today(&store, config(), week(3));

        for (i, weight) in [90.0, 89.0, 88.0, 87.0].into_iter().enumerate() {
            engine.record_weigh_in(anna, weight, Some(week(i as i64))).await.unwrap();
        }

        let projection = engine.projection(anna).await.unwrap();
        assert_eq!(projection.current_weight, 87.0);
        assert!(projection.projected_weight.is_some());

        let preview = engine.preview_weigh_in(anna, 86.0).await.unwrap();
        assert_eq!(preview.previous_weight, 88.0);

        let current = engine.current_week().await.unwrap();
        assert_eq!(current.week_start, week(3));
        assert!(!current.all_weighed_in);

        let stats = engine.participant_stats(anna).await.unwrap();
        assert_eq!(stats.weeks_participated, 4);

        let overview = engine.overview().await.unwrap();
        assert_eq!(overview.missing_weigh_ins, vec!["Ben".to_string()]);

        assert!(matches!(
            engine.projection(Uuid::new_v4()).await,
            Err(StorageError::NotFound)
        ));
    }
}
