use uuid::Uuid;

use super::BattleData;
use super::numeric::{percentage_change, round_to};
use crate::dto::stats::LeaderboardEntry;
use crate::models::WeeklyResult;

pub fn win_count(results: &[WeeklyResult], participant_id: Uuid) -> i64 {
    results
        .iter()
        .filter(|r| r.winner_id == Some(participant_id))
        .count() as i64
}

pub fn loss_count(results: &[WeeklyResult], participant_id: Uuid) -> i64 {
    results
        .iter()
        .filter(|r| r.loser_id == Some(participant_id))
        .count() as i64
}

/// Rank participants by weekly wins, then by total change since the start.
///
/// Ranks are sequential: equal keys still get distinct positions, in the
/// order participants are listed.
pub fn leaderboard(data: &BattleData) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = data
        .participants
        .iter()
        .map(|p| {
            let current_weight = data.current_weight(p);
            LeaderboardEntry {
                rank: 0,
                participant_id: p.participant_id,
                name: p.name.clone(),
                wins: win_count(&data.results, p.participant_id),
                start_weight: p.start_weight,
                current_weight,
                total_percent_change: round_to(percentage_change(p.start_weight, current_weight), 2),
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.total_percent_change.total_cmp(&a.total_percent_change))
    });

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i as i64 + 1;
    }

    entries
}
