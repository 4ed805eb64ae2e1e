//! Weight projections by ordinary least squares over each participant's
//! own weigh-in sequence.

use chrono::NaiveDate;

use super::BattleData;
use super::numeric::{percentage_change, round_to};
use crate::dto::stats::{Prognosis, Projection, Trend};
use crate::models::{BattleConfig, Participant, WeighIn};

/// Projections never go below this weight.
pub const MIN_PROJECTED_WEIGHT: f64 = 40.0;

/// Slope (kg per weigh-in) beyond which a trend is no longer "stable".
const TREND_THRESHOLD: f64 = 0.1;

/// Fit `y = intercept + slope * x`, returning `(slope, intercept)`.
///
/// With no spread in `x` the fit is flat at the mean of `y`.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return (0.0, 0.0);
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let count = n as f64;

    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
    let sum_x2: f64 = xs.iter().map(|x| x * x).sum();

    let denominator = count * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return (0.0, sum_y / count);
    }

    let slope = (count * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / count;

    (slope, intercept)
}

/// Whole weeks left until `end_date`, never negative.
pub fn weeks_remaining(end_date: NaiveDate, today: NaiveDate) -> i64 {
    ((end_date - today).num_days() / 7).max(0)
}

impl Trend {
    pub fn from_slope(slope: f64) -> Self {
        if slope < -TREND_THRESHOLD {
            Trend::Losing
        } else if slope > TREND_THRESHOLD {
            Trend::Gaining
        } else {
            Trend::Stable
        }
    }
}

pub fn project(participant: &Participant, history: &[WeighIn], weeks_remaining: i64) -> Projection {
    let current_weight = history
        .last()
        .map(|w| w.weight)
        .unwrap_or(participant.start_weight);

    if history.len() < 2 {
        return Projection {
            participant_id: participant.participant_id,
            name: participant.name.clone(),
            current_weight,
            projected_weight: None,
            projected_total_change: None,
            weekly_trend: None,
            trend: Trend::InsufficientData,
        };
    }

    let xs: Vec<f64> = (0..history.len()).map(|i| i as f64).collect();
    let ys: Vec<f64> = history.iter().map(|w| w.weight).collect();
    let (slope, intercept) = linear_regression(&xs, &ys);

    let projected_index = (history.len() as i64 + weeks_remaining) as f64;
    let projected_weight = (intercept + slope * projected_index).max(MIN_PROJECTED_WEIGHT);
    let projected_change = percentage_change(participant.start_weight, projected_weight);

    Projection {
        participant_id: participant.participant_id,
        name: participant.name.clone(),
        current_weight,
        projected_weight: Some(round_to(projected_weight, 1)),
        projected_total_change: Some(round_to(projected_change, 2)),
        weekly_trend: Some(round_to(slope, 2)),
        trend: Trend::from_slope(slope),
    }
}

/// Projections for everyone, best projected change first and participants
/// without enough data last.
pub fn prognosis(data: &BattleData, config: &BattleConfig, today: NaiveDate) -> Prognosis {
    let weeks_remaining = weeks_remaining(config.battle_end_date, today);

    let mut projections: Vec<Projection> = data
        .participants
        .iter()
        .map(|p| project(p, data.history(p.participant_id), weeks_remaining))
        .collect();

    projections.sort_by(|a, b| match (a.projected_total_change, b.projected_total_change) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    Prognosis {
        battle_end_date: config.battle_end_date,
        weeks_remaining,
        projections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{data, participant, week, weekly};
    use crate::services::numeric::approx_eq;

    #[test]
    fn test_regression_on_straight_line() {
        let (slope, intercept) = linear_regression(&[0.0, 1.0, 2.0, 3.0], &[90.0, 89.0, 88.0, 87.0]);
        assert!(approx_eq(slope, -1.0, 1e-9));
        assert!(approx_eq(intercept, 90.0, 1e-9));
    }

    #[test]
    fn test_regression_without_spread_is_flat_at_mean() {
        let (slope, intercept) = linear_regression(&[2.0, 2.0, 2.0], &[80.0, 81.0, 82.0]);
        assert_eq!(slope, 0.0);
        assert!(approx_eq(intercept, 81.0, 1e-9));
    }

    #[test]
    fn test_projection_example() {
        let anna = participant("Anna", 92.0);
        let data = data(vec![(&anna, weekly(&[90.0, 89.0, 88.0, 87.0]))], vec![]);

        let projection = project(&anna, data.history(anna.participant_id), 2);

        assert_eq!(projection.projected_weight, Some(84.0));
        assert_eq!(projection.weekly_trend, Some(-1.0));
        assert_eq!(projection.trend, Trend::Losing);
        assert_eq!(projection.current_weight, 87.0);
        assert_eq!(projection.projected_total_change, Some(8.7));
    }

    #[test]
    fn test_projection_is_floored() {
        let anna = participant("Anna", 60.0);
        let data = data(vec![(&anna, weekly(&[60.0, 55.0, 50.0]))], vec![]);

        let projection = project(&anna, data.history(anna.participant_id), 10);

        assert_eq!(projection.projected_weight, Some(MIN_PROJECTED_WEIGHT));
    }

    #[test]
    fn test_insufficient_data() {
        let anna = participant("Anna", 80.0);
        let data = data(vec![(&anna, weekly(&[79.0]))], vec![]);

        let projection = project(&anna, data.history(anna.participant_id), 4);

        assert_eq!(projection.trend, Trend::InsufficientData);
        assert_eq!(projection.projected_weight, None);
        assert_eq!(projection.projected_total_change, None);
        assert_eq!(projection.current_weight, 79.0);
    }

    #[test]
    fn test_trend_labels() {
        assert_eq!(Trend::from_slope(-0.5), Trend::Losing);
        assert_eq!(Trend::from_slope(-0.1), Trend::Stable);
        assert_eq!(Trend::from_slope(0.05), Trend::Stable);
        assert_eq!(Trend::from_slope(0.2), Trend::Gaining);
    }

    #[test]
    fn test_negative_slope_never_gaining() {
        for step in [-0.01, -0.1, -0.11, -2.0] {
            let weights: Vec<f64> = (0..5).map(|i| 90.0 + step * i as f64).collect();
            let (slope, _) = linear_regression(&[0.0, 1.0, 2.0, 3.0, 4.0], &weights);
            assert!(slope < 0.0);
            assert_ne!(Trend::from_slope(slope), Trend::Gaining);
        }
    }

    #[test]
    fn test_weeks_remaining() {
        assert_eq!(weeks_remaining(week(3), week(0)), 3);
        assert_eq!(weeks_remaining(week(3) - chrono::Duration::days(1), week(0)), 2);
        assert_eq!(weeks_remaining(week(0), week(3)), 0);
    }

    #[test]
    fn test_prognosis_sorts_missing_projections_last() {
        let anna = participant("Anna", 80.0);
        let ben = participant("Ben", 90.0);
        let cleo = participant("Cleo", 70.0);
        let data = data(
            vec![
                (&anna, weekly(&[79.0, 78.0])),
                (&ben, weekly(&[89.0])),
                (&cleo, weekly(&[69.0, 67.0])),
            ],
            vec![],
        );
        let config = BattleConfig {
            pot_contribution: 5,
            total_amount: 100,
            battle_end_date: week(4),
        };

        let prognosis = prognosis(&data, &config, week(2));
        let names: Vec<&str> = prognosis.projections.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(prognosis.weeks_remaining, 2);
        assert_eq!(names, vec!["Cleo", "Anna", "Ben"]);
    }
}
