use axum::{Router, routing::get};
use storage::Database;

use super::handlers::list_audit_log;

pub fn routes() -> Router<Database> {
    Router::new().route("/", get(list_audit_log))
}
