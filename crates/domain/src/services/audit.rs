//! Movement log (audit trail) service.
//!
//! Processors receive an [`AuditSink`] and append one movement per committed
//! state transition. Appends are best-effort: a failing sink is logged and
//! never changes the outcome of the operation that produced the entry.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{info, warn};

use crate::models::{
    Asset, AssetSummary, AssignmentView, MovementAction, NewMovement, ReceptionView,
    StatusTransition,
};
use crate::services::reception::MetadataChange;

/// Text written where a list or optional value is empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// Errors raised by audit sinks.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Audit storage failed: {0}")]
    Storage(String),
}

/// Append-only destination for movement entries.
#[async_trait::async_trait]
pub trait AuditSink: Send + Sync {
    /// Append a single entry.
    async fn append(&self, entry: NewMovement) -> Result<(), AuditError>;
}

/// Appends `entry`, logging and discarding any failure.
pub async fn append_best_effort(sink: &dyn AuditSink, entry: NewMovement) {
    let action = entry.action;
    if let Err(e) = sink.append(entry).await {
        warn!(action = %action, error = %e, "Failed to append movement");
    }
}

/// In-memory sink for development and testing.
#[derive(Debug, Clone, Default)]
pub struct MockAuditSink {
    entries: Arc<Mutex<Vec<NewMovement>>>,
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl MockAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink whose appends always fail.
    pub fn failing() -> Self {
        Self {
            entries: Arc::default(),
            simulate_failure: true,
        }
    }

    /// Entries appended so far.
    pub fn entries(&self) -> Vec<NewMovement> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl AuditSink for MockAuditSink {
    async fn append(&self, entry: NewMovement) -> Result<(), AuditError> {
        if self.simulate_failure {
            return Err(AuditError::Storage(
                "Mock audit sink simulating failure".into(),
            ));
        }

        info!(action = %entry.action, actor = %entry.actor, "Mock: Would append movement");
        self.entries
            .lock()
            .map_err(|_| AuditError::Storage("Mock audit sink poisoned".into()))?
            .push(entry);
        Ok(())
    }
}

/// Builder for movement descriptions of the form `Headline | Key: value | ...`.
#[derive(Debug, Clone)]
pub struct MovementBuilder {
    action: MovementAction,
    headline: String,
    segments: Vec<String>,
}

impl MovementBuilder {
    /// Starts a description headed by the action label.
    pub fn new(action: MovementAction) -> Self {
        Self {
            action,
            headline: action.label().to_string(),
            segments: Vec::new(),
        }
    }

    /// Appends `(ID n)` to the headline.
    pub fn with_id(mut self, id: i64) -> Self {
        self.headline = format!("{} (ID {})", self.headline, id);
        self
    }

    /// Adds a `Key: value` segment.
    pub fn field(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.segments.push(format!("{}: {}", key, value.as_ref()));
        self
    }

    /// Adds a `Changes: ...` segment unless `changes` is empty.
    pub fn with_changes(mut self, changes: &[MetadataChange]) -> Self {
        if !changes.is_empty() {
            let joined = changes
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" | ");
            self.segments.push(format!("Changes: {}", joined));
        }
        self
    }

    pub fn description(&self) -> String {
        std::iter::once(self.headline.clone())
            .chain(self.segments.iter().cloned())
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Build the entry for `actor`.
    pub fn build(self, actor: &str) -> NewMovement {
        NewMovement::new(self.action, self.description(), actor)
    }
}

/// Formats assets as `CODE - Name, CODE - Name`, or `N/A` when empty.
pub fn format_asset_list(assets: &[AssetSummary]) -> String {
    if assets.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    assets
        .iter()
        .map(AssetSummary::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience functions for common movement entries.
pub mod audit_helpers {
    use super::*;

    fn or_not_available(value: Option<&str>) -> &str {
        value.filter(|v| !v.trim().is_empty()).unwrap_or(NOT_AVAILABLE)
    }

    fn reception_builder(action: MovementAction, view: &ReceptionView) -> MovementBuilder {
        MovementBuilder::new(action)
            .field("Responsible", &view.responsible.display_name)
            .field("Area", &view.area.name)
            .field("Date", view.returned_on.to_string())
            .field("Category", or_not_available(view.category.as_deref()))
            .field("Assets", format_asset_list(&view.assets))
    }

    /// Entry for a new reception.
    pub fn reception_created(view: &ReceptionView, actor: &str) -> NewMovement {
        reception_builder(MovementAction::ReceptionCreate, view).build(actor)
    }

    /// Entry for a reception metadata edit, with the field-by-field changes.
    pub fn reception_updated(
        view: &ReceptionView,
        changes: &[MetadataChange],
        actor: &str,
    ) -> NewMovement {
        MovementBuilder::new(MovementAction::ReceptionUpdate)
            .with_id(view.id)
            .field("Responsible", &view.responsible.display_name)
            .field("Area", &view.area.name)
            .field("Assets", format_asset_list(&view.assets))
            .with_changes(changes)
            .build(actor)
    }

    /// Entry for a removed reception, describing what was removed.
    pub fn reception_deleted(view: &ReceptionView, actor: &str) -> NewMovement {
        reception_builder(MovementAction::ReceptionDelete, view)
            .with_id(view.id)
            .build(actor)
    }

    /// Entry for a new assignment batch.
    pub fn assignment_created(view: &AssignmentView, actor: &str) -> NewMovement {
        MovementBuilder::new(MovementAction::AssignmentCreate)
            .field("Responsible", &view.responsible.display_name)
            .field("Area", &view.area.name)
            .field("Date", view.assigned_on.to_string())
            .field("Category", or_not_available(Some(view.category.as_str())))
            .field("Assets", format_asset_list(&view.assets))
            .build(actor)
    }

    /// Entry for a registered asset.
    pub fn asset_registered(asset: &Asset, actor: &str) -> NewMovement {
        MovementBuilder::new(MovementAction::AssetRegister)
            .field("Code", &asset.code)
            .field("Name", &asset.name)
            .field("Category", asset.category.label())
            .build(actor)
    }

    /// Entry for an asset update; status transitions get their own action.
    pub fn asset_updated(asset: &Asset, transition: StatusTransition, actor: &str) -> NewMovement {
        let action = match transition {
            StatusTransition::Decommissioned => MovementAction::AssetDecommission,
            StatusTransition::Reactivated => MovementAction::AssetReactivate,
            StatusTransition::Unchanged => MovementAction::AssetUpdate,
        };
        let mut builder = MovementBuilder::new(action)
            .with_id(asset.id)
            .field("Code", &asset.code)
            .field("Name", &asset.name);
        if transition == StatusTransition::Decommissioned {
            builder = builder.field(
                "Reason",
                or_not_available(asset.decommission_reason.as_deref()),
            );
        }
        builder.build(actor)
    }

    /// Entry for a deleted asset.
    pub fn asset_deleted(asset: &Asset, actor: &str) -> NewMovement {
        MovementBuilder::new(MovementAction::AssetDelete)
            .with_id(asset.id)
            .field("Code", &asset.code)
            .field("Name", &asset.name)
            .build(actor)
    }
}
