use axum::Router;
use storage::Database;

use crate::features::{audit, participants, setup, stats, weeks, weigh_ins};

pub fn api_routes() -> Router<Database> {
    Router::new()
        .nest("/setup", setup::routes::routes())
        .nest("/config", setup::routes::config_routes())
        .nest("/participants", participants::routes::routes())
        .nest("/weigh-ins", weigh_ins::routes::routes())
        .nest("/weeks", weeks::routes::routes())
        .nest("/stats", stats::routes::routes())
        .nest("/admin", stats::routes::admin_routes())
        .nest("/audit", audit::routes::routes())
}
