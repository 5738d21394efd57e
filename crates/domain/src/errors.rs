//! Domain error taxonomy.

use serde::Serialize;
use thiserror::Error;

/// PostgreSQL SQLSTATE codes treated as retryable.
const LOCK_NOT_AVAILABLE: &str = "55P03";
const DEADLOCK_DETECTED: &str = "40P01";
const SERIALIZATION_FAILURE: &str = "40001";
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// A single field-attributed validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors produced by inventory operations.
///
/// Business-rule failures are always detected before any mutation, so every
/// variant except `Database` leaves storage untouched.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("{message}")]
    Validation {
        message: String,
        violations: Vec<FieldViolation>,
    },

    #[error("The assets of reception {reception_id} cannot change after it was registered")]
    ImmutableAssetSet {
        reception_id: i64,
        added: Vec<i64>,
        removed: Vec<i64>,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Temporary failure, try again: {0}")]
    Transient(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl InventoryError {
    /// Validation error with a single message on `field`.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        InventoryError::Validation {
            violations: vec![FieldViolation::new(field, message.clone())],
            message,
        }
    }

    /// Field violations carried by this error, if it is a validation failure.
    pub fn violations(&self) -> Vec<FieldViolation> {
        match self {
            InventoryError::Validation { violations, .. } => violations.clone(),
            InventoryError::ImmutableAssetSet { added, removed, .. } => {
                let mut out = Vec::new();
                if !added.is_empty() {
                    out.push(FieldViolation::new(
                        "assets",
                        format!("Assets not part of the reception: {}", join_ids(added)),
                    ));
                }
                if !removed.is_empty() {
                    out.push(FieldViolation::new(
                        "assets",
                        format!("Assets missing from the request: {}", join_ids(removed)),
                    ));
                }
                out
            }
            _ => Vec::new(),
        }
    }
}

impl From<sqlx::Error> for InventoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => InventoryError::NotFound("Resource".into()),
            sqlx::Error::PoolTimedOut => {
                InventoryError::Transient("database connection pool exhausted".into())
            }
            sqlx::Error::Io(e) => InventoryError::Transient(format!("database I/O: {}", e)),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(LOCK_NOT_AVAILABLE) => {
                    InventoryError::Transient("timed out waiting for a row lock".into())
                }
                Some(DEADLOCK_DETECTED) | Some(SERIALIZATION_FAILURE) => {
                    InventoryError::Transient("concurrent update detected".into())
                }
                Some(UNIQUE_VIOLATION) => InventoryError::Conflict("Resource already exists".into()),
                Some(FOREIGN_KEY_VIOLATION) => {
                    InventoryError::NotFound("Referenced resource".into())
                }
                _ => InventoryError::Database(db_err.to_string()),
            },
            other => InventoryError::Database(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for InventoryError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    FieldViolation::new(
                        field.to_string(),
                        e.message
                            .clone()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string()),
                    )
                })
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field));

        let message = if violations.len() == 1 {
            violations[0].message.clone()
        } else {
            format!("{} validation errors", violations.len())
        };

        InventoryError::Validation {
            message,
            violations,
        }
    }
}

/// Formats ids as `1, 2, 3`.
pub fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_builds_single_violation() {
        let err = InventoryError::invalid("assets", "At least one asset is required");
        assert_eq!(err.to_string(), "At least one asset is required");
        assert_eq!(
            err.violations(),
            vec![FieldViolation::new("assets", "At least one asset is required")]
        );
    }

    #[test]
    fn test_immutable_asset_set_violations() {
        let err = InventoryError::ImmutableAssetSet {
            reception_id: 5,
            added: vec![9],
            removed: vec![2, 3],
        };
        let violations = err.violations();
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.field == "assets"));
        assert!(violations[0].message.contains('9'));
        assert!(violations[1].message.contains("2, 3"));
        assert!(err.to_string().contains("reception 5"));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: InventoryError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, InventoryError::NotFound(_)));
    }

    #[test]
    fn test_pool_timeout_is_transient() {
        let err: InventoryError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, InventoryError::Transient(_)));
    }

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[1, 22, 3]), "1, 22, 3");
        assert_eq!(join_ids(&[]), "");
    }
}
