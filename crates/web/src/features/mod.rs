use storage::error::Result;
use storage::{Database, ScoringEngine};

pub mod audit;
pub mod participants;
pub mod setup;
pub mod stats;
pub mod weeks;
pub mod weigh_ins;

/// Engine bound to the stored battle settings.
pub async fn engine(db: &Database) -> Result<ScoringEngine<'_>> {
    let config = storage::services::setup::load_config(db).await?;
    Ok(ScoringEngine::new(db, config))
}
