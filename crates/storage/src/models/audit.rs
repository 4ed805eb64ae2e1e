use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Participant, WeighIn};

/// `changed_by` for changes made during battle setup
pub const SETUP_ACTOR: &str = "setup";

/// `changed_by` for changes not attributed to anyone
pub const SYSTEM_ACTOR: &str = "system";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntity {
    Participant,
    WeighIn,
}

impl AuditEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::WeighIn => "weigh_in",
        }
    }
}

/// One recorded change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditEntry {
    pub audit_id: i64,
    pub entity: String,
    /// Participant the change belongs to
    pub entity_id: Uuid,
    #[schema(value_type = Option<Object>)]
    pub old_value: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub new_value: Option<Value>,
    pub changed_by: String,
    pub changed_at: NaiveDateTime,
}

/// A change about to be appended to the audit log
#[derive(Debug, Clone, PartialEq)]
pub struct AuditChange {
    pub entity: AuditEntity,
    pub entity_id: Uuid,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
    pub changed_by: String,
}

impl AuditChange {
    pub fn participant(old: Option<&Participant>, new: &Participant, changed_by: &str) -> Self {
        let value = |p: &Participant| json!({ "name": p.name, "start_weight": p.start_weight });

        Self {
            entity: AuditEntity::Participant,
            entity_id: new.participant_id,
            old_value: old.map(value),
            new_value: Some(value(new)),
            changed_by: changed_by.to_string(),
        }
    }

    pub fn weigh_in(old: Option<&WeighIn>, new: &WeighIn, changed_by: &str) -> Self {
        let value = |w: &WeighIn| json!({ "week_start": w.week_start, "weight": w.weight });

        Self {
            entity: AuditEntity::WeighIn,
            entity_id: new.participant_id,
            old_value: old.map(value),
            new_value: Some(value(new)),
            changed_by: changed_by.to_string(),
        }
    }
}
