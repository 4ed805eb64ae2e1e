//! Pot accounting, derived from stored weekly results only.

use std::collections::HashMap;

use uuid::Uuid;

use super::BattleData;
use crate::dto::stats::{Contribution, PotInfo, RecentContribution};
use crate::models::{BattleConfig, WeeklyResult};

/// How many of the latest weeks are scanned for recent contributions.
const RECENT_WEEKS: usize = 5;

pub fn pot_total(results: &[WeeklyResult]) -> i64 {
    results.iter().map(|r| i64::from(r.pot_change)).sum()
}

/// Per-participant losses and payments, biggest payer first.
///
/// Every participant is listed, including those who never lost.
pub fn contributions(data: &BattleData) -> Vec<Contribution> {
    let mut losses: HashMap<Uuid, (i64, i64)> = HashMap::new();
    for result in &data.results {
        if let Some(loser_id) = result.loser_id {
            let entry = losses.entry(loser_id).or_default();
            entry.0 += 1;
            entry.1 += i64::from(result.pot_change);
        }
    }

    let mut contributions: Vec<Contribution> = data
        .participants
        .iter()
        .map(|p| {
            let (times_lost, total_contributed) =
                losses.get(&p.participant_id).copied().unwrap_or_default();
            Contribution {
                participant_id: p.participant_id,
                name: p.name.clone(),
                times_lost,
                total_contributed,
            }
        })
        .collect();

    contributions.sort_by(|a, b| {
        b.total_contributed
            .cmp(&a.total_contributed)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.participant_id.cmp(&b.participant_id))
    });

    contributions
}

/// Contributors sharing the highest loss count.
pub fn potential_final_payers(contributions: &[Contribution]) -> Vec<Contribution> {
    let Some(max_losses) = contributions.iter().map(|c| c.times_lost).max() else {
        return Vec::new();
    };

    contributions
        .iter()
        .filter(|c| c.times_lost == max_losses)
        .cloned()
        .collect()
}

fn recent_contributions(data: &BattleData) -> Vec<RecentContribution> {
    data.results
        .iter()
        .take(RECENT_WEEKS)
        .filter(|r| r.pot_change > 0)
        .filter_map(|r| {
            let loser_id = r.loser_id?;
            Some(RecentContribution {
                week_start: r.week_start,
                loser_name: data.name_of(loser_id).unwrap_or_default(),
                amount: r.pot_change,
            })
        })
        .collect()
}

pub fn pot_info(data: &BattleData, config: &BattleConfig) -> PotInfo {
    let total = pot_total(&data.results);
    let total_amount = i64::from(config.total_amount);
    let contributions = contributions(data);
    let potential_final_payers = potential_final_payers(&contributions);

    PotInfo {
        total,
        total_amount,
        remaining_amount: (total_amount - total).max(0),
        recent_contributions: recent_contributions(data),
        contributions,
        potential_final_payers,
    }
}
