//! Weekly winner/loser calculation.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use super::numeric::percentage_change;
use crate::error::Result;
use crate::models::WeeklyResult;
use crate::models::week::previous_week;
use crate::store::StoreSession;

/// Two changes closer than this (percentage points) are a tie.
/// Tunable: keeps float noise from deciding a week.
pub const TIE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyChange {
    pub participant_id: Uuid,
    pub percent_change: f64,
}

fn is_tie(a: f64, b: f64) -> bool {
    (a - b).abs() < TIE_TOLERANCE
}

/// Decide the outcome of a complete week from everyone's change.
///
/// A shared first place means no winner and a shared last place means no
/// loser (and nothing for the pot). A lone participant wins by default.
pub fn decide_week(
    week_start: NaiveDate,
    changes: &[WeeklyChange],
    pot_contribution: i32,
) -> Option<WeeklyResult> {
    if changes.is_empty() {
        return None;
    }

    let mut ranked = changes.to_vec();
    ranked.sort_by(|a, b| b.percent_change.total_cmp(&a.percent_change));

    let mut result = WeeklyResult {
        week_start,
        winner_id: None,
        loser_id: None,
        pot_change: 0,
    };

    if let [only] = ranked.as_slice() {
        result.winner_id = Some(only.participant_id);
        return Some(result);
    }

    let (first, second) = (ranked[0], ranked[1]);
    if !is_tie(first.percent_change, second.percent_change) {
        result.winner_id = Some(first.participant_id);
    }

    let (second_last, last) = (ranked[ranked.len() - 2], ranked[ranked.len() - 1]);
    if !is_tie(second_last.percent_change, last.percent_change) {
        result.loser_id = Some(last.participant_id);
        result.pot_change = pot_contribution;
    }

    Some(result)
}

/// Previous week's weigh-in, else the start weight when known.
pub async fn reference_weight(
    session: &mut dyn StoreSession,
    participant_id: Uuid,
    start_weight: Option<f64>,
    week_start: NaiveDate,
) -> Result<Option<f64>> {
    let previous = session
        .find_weigh_in(participant_id, previous_week(week_start))
        .await?;

    Ok(previous.map(|w| w.weight).or(start_weight))
}

/// Recompute and store the result of `week_start`, or retract it when the
/// week is not complete.
///
/// Callers run this in the session that changed the week's weigh-ins and
/// hold the week's lock.
pub async fn compute_weekly_result(
    session: &mut dyn StoreSession,
    week_start: NaiveDate,
    pot_contribution: i32,
) -> Result<Option<WeeklyResult>> {
    let participants = session.list_participants().await?;
    let weigh_ins = session.week_weigh_ins(week_start).await?;

    if weigh_ins.len() < participants.len() {
        tracing::debug!(
            "Week {} incomplete ({}/{} weigh-ins), no result",
            week_start,
            weigh_ins.len(),
            participants.len()
        );
        session.delete_weekly_result(week_start).await?;
        return Ok(None);
    }

    let start_weights: HashMap<Uuid, f64> = participants
        .iter()
        .map(|p| (p.participant_id, p.start_weight))
        .collect();

    let mut changes = Vec::with_capacity(weigh_ins.len());
    for weigh_in in &weigh_ins {
        let start_weight = start_weights.get(&weigh_in.participant_id).copied();
        let reference =
            reference_weight(session, weigh_in.participant_id, start_weight, week_start).await?;

        let Some(reference) = reference else {
            tracing::warn!(
                "No reference weight for participant {} in week {}, skipping",
                weigh_in.participant_id,
                week_start
            );
            continue;
        };

        changes.push(WeeklyChange {
            participant_id: weigh_in.participant_id,
            percent_change: percentage_change(reference, weigh_in.weight),
        });
    }

    let Some(result) = decide_week(week_start, &changes, pot_contribution) else {
        session.delete_weekly_result(week_start).await?;
        return Ok(None);
    };

    session.save_weekly_result(&result).await?;
    tracing::info!(
        "Week {} result: winner {:?}, loser {:?}, pot +{}",
        week_start,
        result.winner_id,
        result.loser_id,
        result.pot_change
    );

    Ok(Some(result))
}
