mod audit;
mod battle_config;
mod participant;
mod weekly_result;
mod weigh_in;

pub mod week;

pub use audit::{AuditChange, AuditEntity, AuditEntry, SETUP_ACTOR, SYSTEM_ACTOR};
pub use battle_config::BattleConfig;
pub use participant::Participant;
pub use weekly_result::WeeklyResult;
pub use weigh_in::WeighIn;
