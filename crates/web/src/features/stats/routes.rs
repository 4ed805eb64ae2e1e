use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    get_leaderboard, get_overview, get_participant_stats, get_pot, get_prognosis, get_progress,
    recompute_all,
};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/overview", get(get_overview))
        .route("/leaderboard", get(get_leaderboard))
        .route("/pot", get(get_pot))
        .route("/prognosis", get(get_prognosis))
        .route("/progress", get(get_progress))
        .route("/participant/:participant_id", get(get_participant_stats))
}

pub fn admin_routes() -> Router<Database> {
    Router::new().route("/recompute-all", post(recompute_all))
}
