use chrono::NaiveDate;

use super::BattleData;
use super::leaderboard::leaderboard;
use super::numeric::{percentage_change, round_to};
use super::pot::pot_total;
use crate::dto::stats::{Overview, WeekStanding};
use crate::models::BattleConfig;
use crate::models::week::week_start;

/// Top two standings closer than this (percentage points) are shown as a
/// head-to-head race. Display only, has no effect on results.
pub const HEAD_TO_HEAD_THRESHOLD: f64 = 0.3;

/// Everyone who weighed in during `week`, best change first.
pub fn week_standings(data: &BattleData, week: NaiveDate) -> Vec<WeekStanding> {
    let mut standings: Vec<WeekStanding> = data
        .participants
        .iter()
        .filter_map(|p| {
            let weigh_in = data.weigh_in(p.participant_id, week)?;
            let reference = data.reference_weight(p, week);
            Some(WeekStanding {
                participant_id: p.participant_id,
                name: p.name.clone(),
                weight: weigh_in.weight,
                percent_change: round_to(percentage_change(reference, weigh_in.weight), 2),
            })
        })
        .collect();

    standings.sort_by(|a, b| b.percent_change.total_cmp(&a.percent_change));
    standings
}

pub fn is_head_to_head(standings: &[WeekStanding]) -> bool {
    match standings {
        [first, second, ..] => {
            (first.percent_change - second.percent_change).abs() < HEAD_TO_HEAD_THRESHOLD
        }
        _ => false,
    }
}

pub fn days_remaining(end_date: NaiveDate, today: NaiveDate) -> i64 {
    (end_date - today).num_days().max(0)
}

pub fn overview(data: &BattleData, config: &BattleConfig, today: NaiveDate) -> Overview {
    let current_week = week_start(today);
    let standings = week_standings(data, current_week);
    let leaderboard = leaderboard(data);

    let missing_weigh_ins = data
        .participants
        .iter()
        .filter(|p| data.weigh_in(p.participant_id, current_week).is_none())
        .map(|p| p.name.clone())
        .collect();

    Overview {
        current_week,
        battle_end_date: config.battle_end_date,
        days_remaining: days_remaining(config.battle_end_date, today),
        total_participants: data.participants.len(),
        pot_total: pot_total(&data.results),
        leader: leaderboard.first().cloned(),
        head_to_head: is_head_to_head(&standings),
        current_week_standings: standings,
        missing_weigh_ins,
        leaderboard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{data, participant, result, week, weekly};

    fn config() -> BattleConfig {
        BattleConfig {
            pot_contribution: 5,
            total_amount: 100,
            battle_end_date: week(10),
        }
    }

    #[test]
    fn test_standings_use_previous_week_as_reference() {
        let anna = participant("Anna", 80.0);
        let ben = participant("Ben", 100.0);
        let data = data(
            vec![(&anna, weekly(&[80.0, 78.0])), (&ben, weekly(&[99.0, 98.0]))],
            vec![],
        );

        let standings = week_standings(&data, week(1));

        assert_eq!(standings[0].name, "Anna");
        assert_eq!(standings[0].percent_change, 2.5);
        assert_eq!(standings[1].percent_change, 1.01);
    }

    #[test]
    fn test_head_to_head_needs_two_close_standings() {
        let standing = |percent_change| WeekStanding {
            participant_id: uuid::Uuid::new_v4(),
            name: String::new(),
            weight: 80.0,
            percent_change,
        };

        assert!(!is_head_to_head(&[]));
        assert!(!is_head_to_head(&[standing(1.0)]));
        assert!(is_head_to_head(&[standing(1.2), standing(1.0)]));
        assert!(!is_head_to_head(&[standing(1.5), standing(1.0)]));
    }

    #[test]
    fn test_overview_for_running_week() {
        let anna = participant("Anna", 80.0);
        let ben = participant("Ben", 90.0);
        let cleo = participant("Cleo", 70.0);
        let data = data(
            vec![
                (&anna, weekly(&[79.0, 78.0])),
                (&ben, weekly(&[89.0])),
                (&cleo, weekly(&[70.0, 69.9])),
            ],
            vec![result(0, Some(&ben), Some(&cleo), 5)],
        );
        let today = week(1) + chrono::Duration::days(2);

        let overview = overview(&data, &config(), today);

        assert_eq!(overview.current_week, week(1));
        assert_eq!(overview.days_remaining, (week(10) - today).num_days());
        assert_eq!(overview.total_participants, 3);
        assert_eq!(overview.pot_total, 5);
        assert_eq!(overview.missing_weigh_ins, vec!["Ben".to_string()]);
        assert_eq!(overview.current_week_standings.len(), 2);
        assert_eq!(overview.current_week_standings[0].name, "Anna");
        assert!(!overview.head_to_head);
        assert_eq!(overview.leader.as_ref().map(|l| l.name.as_str()), Some("Ben"));
        assert_eq!(overview.leaderboard.len(), 3);
    }

    #[test]
    fn test_days_remaining_never_negative() {
        assert_eq!(days_remaining(week(0), week(1)), 0);
        assert_eq!(days_remaining(week(1), week(0)), 7);
    }
}
