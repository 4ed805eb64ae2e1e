use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{complete_setup, get_config, get_setup_status, update_config};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", post(complete_setup))
        .route("/status", get(get_setup_status))
}

pub fn config_routes() -> Router<Database> {
    Router::new().route("/", get(get_config).put(update_config))
}
