use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{get_current_week, get_week};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/current", get(get_current_week))
        .route("/:week_start", get(get_week))
}
