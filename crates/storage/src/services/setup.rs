//! Battle initialisation and settings.

use super::numeric::round_to;
use super::participant_name;
use crate::dto::setup::{SetupRequest, SetupResponse, SetupStatus, UpdateConfigRequest};
use crate::error::{Result, StorageError};
use crate::models::{AuditChange, BattleConfig, SETUP_ACTOR};
use crate::store::{LockMode, WeighInStore};

pub async fn setup_status(store: &dyn WeighInStore) -> Result<SetupStatus> {
    let mut session = store.snapshot().await?;
    let has_users = !session.list_participants().await?.is_empty();
    let has_config = session.battle_config().await?.is_some();

    Ok(SetupStatus {
        setup_complete: has_users && has_config,
        has_users,
        has_config,
    })
}

/// Create every participant and the settings in one unit of work.
///
/// Fails without writing anything when the battle is already configured or
/// a name is blank or taken.
pub async fn complete_setup(store: &dyn WeighInStore, request: &SetupRequest) -> Result<SetupResponse> {
    let mut session = store.begin().await?;
    session.lock_roster(LockMode::Exclusive).await?;

    if session.battle_config().await?.is_some() {
        return Err(StorageError::ConstraintViolation(
            "Setup has already been completed".to_string(),
        ));
    }

    let mut participants = Vec::with_capacity(request.participants.len());
    for participant in &request.participants {
        let name = participant_name(&participant.name)?;
        let created = session
            .create_participant(name, round_to(participant.start_weight, 1))
            .await?;
        session
            .log_change(&AuditChange::participant(None, &created, SETUP_ACTOR))
            .await?;
        participants.push(created);
    }

    let config = BattleConfig {
        pot_contribution: request.pot_contribution,
        total_amount: request.total_amount,
        battle_end_date: request.battle_end_date,
    };
    session.save_battle_config(&config).await?;
    session.commit().await?;

    tracing::info!(
        "Battle set up with {} participants, ending {}",
        participants.len(),
        config.battle_end_date
    );

    participants.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(SetupResponse {
        participants,
        config,
    })
}

pub async fn load_config(store: &dyn WeighInStore) -> Result<BattleConfig> {
    let mut session = store.snapshot().await?;
    let config = session.battle_config().await?;
    config.ok_or(StorageError::NotConfigured)
}

/// Apply a partial settings change. Stored results keep the pot change they
/// were computed with.
pub async fn update_config(
    store: &dyn WeighInStore,
    request: &UpdateConfigRequest,
) -> Result<BattleConfig> {
    let mut session = store.begin().await?;
    let mut config = session
        .battle_config()
        .await?
        .ok_or(StorageError::NotConfigured)?;

    if let Some(pot_contribution) = request.pot_contribution {
        config.pot_contribution = pot_contribution;
    }
    if let Some(battle_end_date) = request.battle_end_date {
        config.battle_end_date = battle_end_date;
    }

    session.save_battle_config(&config).await?;
    session.commit().await?;

    tracing::info!(
        "Battle settings updated: contribution {}, ending {}",
        config.pot_contribution,
        config.battle_end_date
    );

    Ok(config)
}
