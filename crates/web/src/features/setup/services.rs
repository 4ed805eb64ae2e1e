use storage::{
    Database,
    dto::setup::{SetupRequest, SetupResponse, SetupStatus, UpdateConfigRequest},
    error::Result,
    models::BattleConfig,
    services::setup,
};

pub async fn setup_status(db: &Database) -> Result<SetupStatus> {
    setup::setup_status(db).await
}

pub async fn complete_setup(db: &Database, request: &SetupRequest) -> Result<SetupResponse> {
    setup::complete_setup(db, request).await
}

pub async fn get_config(db: &Database) -> Result<BattleConfig> {
    setup::load_config(db).await
}

pub async fn update_config(db: &Database, request: &UpdateConfigRequest) -> Result<BattleConfig> {
    setup::update_config(db, request).await
}
