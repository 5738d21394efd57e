//! Domain services for the inventory backend.
//!
//! Services contain business logic that operates on domain models.

pub mod asset_code;
pub mod audit;
pub mod ledger;
pub mod reception;

pub use asset_code::{code_pattern, next_asset_code};
pub use audit::{
    append_best_effort, audit_helpers, format_asset_list, AuditError, AuditSink, MockAuditSink,
    MovementBuilder,
};
pub use ledger::{
    check_assignable, check_reception_holders, dedupe_asset_ids, ensure_batch_size,
    resolve_requested, HolderMap, HolderViolation, LockedAsset,
};
pub use reception::{diff_metadata, ensure_asset_set_unchanged, MetadataChange};
