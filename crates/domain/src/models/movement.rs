//! Movement log (audit trail) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::PageInfo;
use std::str::FromStr;

/// Actor recorded when no caller identity is supplied.
pub const SYSTEM_ACTOR: &str = "System";

/// Audited actions following the format: resource.operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementAction {
    AssetRegister,
    AssetUpdate,
    AssetDecommission,
    AssetReactivate,
    AssetDelete,
    AssignmentCreate,
    ReceptionCreate,
    ReceptionUpdate,
    ReceptionDelete,
}

impl MovementAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementAction::AssetRegister => "asset.register",
            MovementAction::AssetUpdate => "asset.update",
            MovementAction::AssetDecommission => "asset.decommission",
            MovementAction::AssetReactivate => "asset.reactivate",
            MovementAction::AssetDelete => "asset.delete",
            MovementAction::AssignmentCreate => "assignment.create",
            MovementAction::ReceptionCreate => "reception.create",
            MovementAction::ReceptionUpdate => "reception.update",
            MovementAction::ReceptionDelete => "reception.delete",
        }
    }

    /// Headline written at the start of the movement description.
    pub fn label(&self) -> &'static str {
        match self {
            MovementAction::AssetRegister => "Asset registered",
            MovementAction::AssetUpdate => "Asset updated",
            MovementAction::AssetDecommission => "Asset decommissioned",
            MovementAction::AssetReactivate => "Asset reactivated",
            MovementAction::AssetDelete => "Asset deleted",
            MovementAction::AssignmentCreate => "Assignment created",
            MovementAction::ReceptionCreate => "Reception created",
            MovementAction::ReceptionUpdate => "Reception updated",
            MovementAction::ReceptionDelete => "Reception deleted",
        }
    }
}

impl FromStr for MovementAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset.register" => Ok(MovementAction::AssetRegister),
            "asset.update" => Ok(MovementAction::AssetUpdate),
            "asset.decommission" => Ok(MovementAction::AssetDecommission),
            "asset.reactivate" => Ok(MovementAction::AssetReactivate),
            "asset.delete" => Ok(MovementAction::AssetDelete),
            "assignment.create" => Ok(MovementAction::AssignmentCreate),
            "reception.create" => Ok(MovementAction::ReceptionCreate),
            "reception.update" => Ok(MovementAction::ReceptionUpdate),
            "reception.delete" => Ok(MovementAction::ReceptionDelete),
            _ => Err(format!("Unknown movement action: {}", s)),
        }
    }
}

impl std::fmt::Display for MovementAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored movement log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Movement {
    pub id: i64,
    pub action: String,
    pub description: String,
    pub actor: String,
    pub occurred_at: DateTime<Utc>,
}

/// A movement to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    pub action: MovementAction,
    pub description: String,
    pub actor: String,
    pub occurred_at: DateTime<Utc>,
}

impl NewMovement {
    /// Creates an entry stamped with the current time.
    ///
    /// A blank actor is recorded as [`SYSTEM_ACTOR`].
    pub fn new(action: MovementAction, description: impl Into<String>, actor: &str) -> Self {
        let actor = actor.trim();
        Self {
            action,
            description: description.into(),
            actor: if actor.is_empty() {
                SYSTEM_ACTOR.to_string()
            } else {
                actor.to_string()
            },
            occurred_at: Utc::now(),
        }
    }
}

/// Query parameters for listing movements.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListMovementsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub action: Option<String>,
}

/// Response for listing movements.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListMovementsResponse {
    pub data: Vec<Movement>,
    pub pagination: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_round_trip() {
        let actions = [
            MovementAction::AssetRegister,
            MovementAction::AssetUpdate,
            MovementAction::AssetDecommission,
            MovementAction::AssetReactivate,
            MovementAction::AssetDelete,
            MovementAction::AssignmentCreate,
            MovementAction::ReceptionCreate,
            MovementAction::ReceptionUpdate,
            MovementAction::ReceptionDelete,
        ];
        for action in actions {
            assert_eq!(action.as_str().parse::<MovementAction>().unwrap(), action);
        }
        assert!("reception.archive".parse::<MovementAction>().is_err());
    }

    #[test]
    fn test_new_movement_blank_actor_is_system() {
        let entry = NewMovement::new(MovementAction::ReceptionCreate, "desc", "   ");
        assert_eq!(entry.actor, SYSTEM_ACTOR);

        let entry = NewMovement::new(MovementAction::ReceptionCreate, "desc", " Ana Pérez ");
        assert_eq!(entry.actor, "Ana Pérez");
    }
}
