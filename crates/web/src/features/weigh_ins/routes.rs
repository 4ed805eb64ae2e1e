use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{get_participant_weigh_ins, preview_weigh_in, record_weigh_in};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", post(record_weigh_in))
        .route("/preview", get(preview_weigh_in))
        .route("/participant/:participant_id", get(get_participant_weigh_ins))
}
