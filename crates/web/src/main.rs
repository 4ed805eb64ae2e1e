use std::time::Duration;

use anyhow::Context;
use axum::Router;
use storage::Database;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod routes;

use config::Config;
use features::{audit, participants, setup, stats, weeks, weigh_ins};

#[derive(OpenApi)]
#[openapi(
    paths(
        setup::handlers::get_setup_status,
        setup::handlers::complete_setup,
        setup::handlers::get_config,
        setup::handlers::update_config,
        participants::handlers::list_participants,
        participants::handlers::get_participant,
        participants::handlers::create_participant,
        participants::handlers::update_participant,
        weigh_ins::handlers::record_weigh_in,
        weigh_ins::handlers::preview_weigh_in,
        weigh_ins::handlers::get_participant_weigh_ins,
        weeks::handlers::get_current_week,
        weeks::handlers::get_week,
        stats::handlers::get_overview,
        stats::handlers::get_leaderboard,
        stats::handlers::get_pot,
        stats::handlers::get_prognosis,
        stats::handlers::get_progress,
        stats::handlers::get_participant_stats,
        stats::handlers::recompute_all,
        audit::handlers::list_audit_log,
    ),
    components(
        schemas(
            storage::dto::setup::SetupRequest,
            storage::dto::setup::UpdateConfigRequest,
            storage::dto::setup::SetupStatus,
            storage::dto::setup::SetupResponse,
            storage::dto::participant::CreateParticipantRequest,
            storage::dto::participant::UpdateParticipantRequest,
            storage::dto::weigh_in::RecordWeighInRequest,
            storage::dto::weigh_in::RecordedWeighIn,
            storage::dto::weigh_in::WeighInPreview,
            storage::dto::week::WeekWeighIn,
            storage::dto::week::WeeklyResultDetail,
            storage::dto::week::CurrentWeek,
            storage::dto::week::ComparisonEntry,
            storage::dto::week::WeekView,
            storage::dto::stats::LeaderboardEntry,
            storage::dto::stats::Contribution,
            storage::dto::stats::RecentContribution,
            storage::dto::stats::PotInfo,
            storage::dto::stats::Trend,
            storage::dto::stats::Projection,
            storage::dto::stats::Prognosis,
            storage::dto::stats::WeekStanding,
            storage::dto::stats::Overview,
            storage::dto::stats::WeeklyDataPoint,
            storage::dto::stats::ParticipantStats,
            storage::dto::stats::ProgressPoint,
            storage::dto::stats::ProgressSeries,
            storage::models::Participant,
            storage::models::WeighIn,
            storage::models::WeeklyResult,
            storage::models::BattleConfig,
            storage::models::AuditEntity,
            storage::models::AuditEntry,
        )
    ),
    tags(
        (name = "setup", description = "Battle setup and settings"),
        (name = "participants", description = "Participant management"),
        (name = "weigh-ins", description = "Weekly weigh-ins"),
        (name = "weeks", description = "Week views"),
        (name = "stats", description = "Leaderboard, pot and forecasts"),
        (name = "audit", description = "Change history"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Weight Battle API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", routes::api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(db);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}
