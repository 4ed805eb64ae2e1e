use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

pub mod audit;
pub mod participant;
pub mod settings;
pub mod weekly_result;
pub mod weigh_in;

fn decimal_to_f64(decimal: Decimal) -> f64 {
    decimal.to_f64().unwrap_or(0.0)
}

/// Weights are stored with one decimal.
fn weight_to_decimal(weight: f64) -> Decimal {
    Decimal::from_f64(weight).unwrap_or_default().round_dp(1)
}
