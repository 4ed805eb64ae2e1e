//! Per-participant and per-week views built from a snapshot.

use chrono::NaiveDate;

use super::BattleData;
use super::leaderboard::{loss_count, win_count};
use super::numeric::{percentage_change, relative_to_start, round_to};
use crate::dto::stats::{ParticipantStats, ProgressPoint, ProgressSeries, WeeklyDataPoint};
use crate::dto::week::{ComparisonEntry, CurrentWeek, WeekView, WeekWeighIn, WeeklyResultDetail};
use crate::models::week::{week_end, week_start};
use crate::models::{Participant, WeeklyResult};

/// Label of the baseline point of every progress series.
pub const PROGRESS_BASELINE: &str = "start";

pub fn participant_stats(data: &BattleData, participant: &Participant) -> ParticipantStats {
    let history = data.history(participant.participant_id);
    let current_weight = data.current_weight(participant);

    let weekly_data = history
        .iter()
        .map(|w| WeeklyDataPoint {
            week_start: w.week_start,
            weight: w.weight,
            percent_change: round_to(
                percentage_change(data.reference_weight(participant, w.week_start), w.weight),
                2,
            ),
            relative_to_start: round_to(relative_to_start(participant.start_weight, w.weight), 2),
        })
        .collect();

    ParticipantStats {
        participant_id: participant.participant_id,
        name: participant.name.clone(),
        start_weight: participant.start_weight,
        current_weight,
        total_percent_change: round_to(
            percentage_change(participant.start_weight, current_weight),
            2,
        ),
        wins: win_count(&data.results, participant.participant_id),
        losses: loss_count(&data.results, participant.participant_id),
        weeks_participated: history.len(),
        weekly_data,
    }
}

/// Every participant side by side for `week`, best change first and those
/// who have not weighed in last.
pub fn weekly_comparison(data: &BattleData, week: NaiveDate) -> Vec<ComparisonEntry> {
    let mut entries: Vec<ComparisonEntry> = data
        .participants
        .iter()
        .map(|p| match data.weigh_in(p.participant_id, week) {
            Some(weigh_in) => ComparisonEntry {
                participant_id: p.participant_id,
                name: p.name.clone(),
                weight: Some(weigh_in.weight),
                percent_change: Some(round_to(
                    percentage_change(data.reference_weight(p, week), weigh_in.weight),
                    2,
                )),
                weighed_in: true,
            },
            None => ComparisonEntry {
                participant_id: p.participant_id,
                name: p.name.clone(),
                weight: None,
                percent_change: None,
                weighed_in: false,
            },
        })
        .collect();

    entries.sort_by(|a, b| match (a.percent_change, b.percent_change) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    entries
}

/// Weight relative to the start weight over time, for charting.
pub fn relative_progress(data: &BattleData) -> Vec<ProgressSeries> {
    data.participants
        .iter()
        .map(|p| {
            let baseline = ProgressPoint {
                week: PROGRESS_BASELINE.to_string(),
                value: 100.0,
            };
            let points = data.history(p.participant_id).iter().map(|w| ProgressPoint {
                week: w.week_start.to_string(),
                value: round_to(relative_to_start(p.start_weight, w.weight), 2),
            });

            ProgressSeries {
                participant_id: p.participant_id,
                name: p.name.clone(),
                data: std::iter::once(baseline).chain(points).collect(),
            }
        })
        .collect()
}

pub fn result_detail(data: &BattleData, result: &WeeklyResult) -> WeeklyResultDetail {
    WeeklyResultDetail {
        week_start: result.week_start,
        winner_id: result.winner_id,
        winner_name: result.winner_id.and_then(|id| data.name_of(id)),
        loser_id: result.loser_id,
        loser_name: result.loser_id.and_then(|id| data.name_of(id)),
        pot_change: result.pot_change,
    }
}

/// Weigh-ins filed under `week`, in participant order.
pub fn week_weigh_ins(data: &BattleData, week: NaiveDate) -> Vec<WeekWeighIn> {
    data.participants
        .iter()
        .filter_map(|p| {
            data.weigh_in(p.participant_id, week).map(|w| WeekWeighIn {
                participant_id: p.participant_id,
                name: p.name.clone(),
                weight: w.weight,
                recorded_at: w.recorded_at,
            })
        })
        .collect()
}

pub fn current_week(data: &BattleData, today: NaiveDate) -> CurrentWeek {
    let week = week_start(today);

    let missing_participants: Vec<Participant> = data
        .participants
        .iter()
        .filter(|p| data.weigh_in(p.participant_id, week).is_none())
        .cloned()
        .collect();

    CurrentWeek {
        week_start: week,
        week_end: week_end(week),
        weigh_ins: week_weigh_ins(data, week),
        result: data.result_for(week).map(|r| result_detail(data, r)),
        all_weighed_in: missing_participants.is_empty(),
        missing_participants,
    }
}

pub fn week_view(data: &BattleData, week: NaiveDate) -> WeekView {
    let week = week_start(week);

    WeekView {
        week_start: week,
        weigh_ins: week_weigh_ins(data, week),
        result: data.result_for(week).map(|r| result_detail(data, r)),
        comparison: weekly_comparison(data, week),
    }
}
