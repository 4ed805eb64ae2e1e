//! Scoring and forecasting.
//!
//! Weekly results are written by [`weekly_result`] inside the same unit of
//! work as the weigh-in that triggered them. Everything else (pot,
//! leaderboard, forecasts, overview) is recomputed from a [`BattleData`]
//! snapshot on every read.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::week::previous_week;
use crate::models::{Participant, WeeklyResult, WeighIn};
use crate::store::StoreSession;

pub mod audit;
pub mod engine;
pub mod forecast;
pub mod leaderboard;
pub mod numeric;
pub mod overview;
pub mod pot;
pub mod setup;
pub mod stats;
pub mod weekly_result;

/// Trimmed participant name. Blank names are refused.
pub(crate) fn participant_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StorageError::ConstraintViolation(
            "Participant name must not be blank".to_string(),
        ));
    }
    Ok(name)
}

/// Committed state read through one snapshot session.
#[derive(Debug, Clone, Default)]
pub struct BattleData {
    /// Ordered by name
    pub participants: Vec<Participant>,
    /// Per participant, ordered by week
    pub histories: HashMap<Uuid, Vec<WeighIn>>,
    /// Most recent week first
    pub results: Vec<WeeklyResult>,
}

impl BattleData {
    pub async fn load(session: &mut dyn StoreSession) -> Result<Self> {
        let participants = session.list_participants().await?;

        let mut histories = HashMap::with_capacity(participants.len());
        for participant in &participants {
            let history = session
                .participant_weigh_ins(participant.participant_id)
                .await?;
            histories.insert(participant.participant_id, history);
        }

        let results = session.list_weekly_results().await?;

        Ok(Self {
            participants,
            histories,
            results,
        })
    }

    pub fn participant(&self, participant_id: Uuid) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.participant_id == participant_id)
    }

    pub fn name_of(&self, participant_id: Uuid) -> Option<String> {
        self.participant(participant_id).map(|p| p.name.clone())
    }

    pub fn history(&self, participant_id: Uuid) -> &[WeighIn] {
        self.histories
            .get(&participant_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn weigh_in(&self, participant_id: Uuid, week_start: NaiveDate) -> Option<&WeighIn> {
        self.history(participant_id)
            .iter()
            .find(|w| w.week_start == week_start)
    }

    /// Latest weigh-in, or the start weight before the first one.
    pub fn current_weight(&self, participant: &Participant) -> f64 {
        self.history(participant.participant_id)
            .last()
            .map(|w| w.weight)
            .unwrap_or(participant.start_weight)
    }

    /// Weight a measurement in `week_start` is compared against.
    pub fn reference_weight(&self, participant: &Participant, week_start: NaiveDate) -> f64 {
        self.weigh_in(participant.participant_id, previous_week(week_start))
            .map(|w| w.weight)
            .unwrap_or(participant.start_weight)
    }

    pub fn result_for(&self, week_start: NaiveDate) -> Option<&WeeklyResult> {
        self.results.iter().find(|r| r.week_start == week_start)
    }
}
