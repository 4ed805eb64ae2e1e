use storage::{
    Database,
    dto::stats::{
        LeaderboardEntry, Overview, ParticipantStats, PotInfo, Prognosis, ProgressSeries,
    },
    error::Result,
};
use uuid::Uuid;

use crate::features::engine;

pub async fn overview(db: &Database) -> Result<Overview> {
    engine(db).await?.overview().await
}

pub async fn leaderboard(db: &Database) -> Result<Vec<LeaderboardEntry>> {
    engine(db).await?.leaderboard().await
}

pub async fn pot_info(db: &Database) -> Result<PotInfo> {
    engine(db).await?.pot_info().await
}

pub async fn prognosis(db: &Database) -> Result<Prognosis> {
    engine(db).await?.prognosis().await
}

pub async fn relative_progress(db: &Database) -> Result<Vec<ProgressSeries>> {
    engine(db).await?.relative_progress().await
}

pub async fn participant_stats(db: &Database, participant_id: Uuid) -> Result<ParticipantStats> {
    engine(db).await?.participant_stats(participant_id).await
}

/// Rebuild every stored weekly result from the weigh-ins
pub async fn recompute_all(db: &Database) -> Result<u64> {
    engine(db).await?.recompute_all().await
}
