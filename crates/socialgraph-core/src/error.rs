//! Error types for the social graph core.

use std::fmt::Display;
use thiserror::Error;

use crate::config::ConfigError;

/// Marker SurrealDB attaches to every statement of a transaction that was
/// rolled back because a sibling statement failed.
const NOT_EXECUTED_MARKER: &str = "not executed due to a failed transaction";

/// Errors that can occur in repositories and analyses.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Requested vertex or edge does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A field is out of its allowed range or missing.
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Connection from a user to itself.
    #[error("User {0} cannot be connected to itself")]
    SelfLoop(i64),

    /// Duplicate connection or duplicate user name.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store aborted a transaction (serialization conflict, rollback).
    /// The caller decides whether to retry.
    #[error("Store transaction failed: {0}")]
    StoreTransaction(String),

    /// Any other store failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GraphError {
    pub fn not_found(entity: &'static str, key: impl Display) -> Self {
        GraphError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        GraphError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Whether the failure may succeed if the whole operation is repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GraphError::StoreTransaction(_))
    }

    /// Pick the most informative error out of a failed multi-statement
    /// response. Statements skipped by the rollback only carry a generic
    /// marker, so the statement that actually failed wins.
    pub(crate) fn from_statement_errors(errors: Vec<(usize, surrealdb::Error)>) -> Option<Self> {
        Self::from_statement_messages(
            errors
                .into_iter()
                .map(|(index, err)| (index, err.to_string()))
                .collect(),
        )
    }

    fn from_statement_messages(mut messages: Vec<(usize, String)>) -> Option<Self> {
        if messages.is_empty() {
            return None;
        }
        messages.sort_by_key(|(index, _)| *index);
        let primary = messages
            .iter()
            .position(|(_, message)| !message.contains(NOT_EXECUTED_MARKER))
            .unwrap_or(0);
        Some(Self::classify(messages.swap_remove(primary).1))
    }

    fn classify(message: String) -> Self {
        let lower = message.to_lowercase();

        if lower.contains("already contains") {
            // unique index violation
            GraphError::Conflict(message)
        } else if lower.contains("transaction")
            && (lower.contains("conflict") || lower.contains("retried") || lower.contains("failed"))
        {
            GraphError::StoreTransaction(message)
        } else {
            GraphError::Database(message)
        }
    }
}

impl From<surrealdb::Error> for GraphError {
    fn from(err: surrealdb::Error) -> Self {
        GraphError::classify(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transaction_errors_are_retryable() {
        assert!(GraphError::StoreTransaction("conflict".into()).is_retryable());
        assert!(!GraphError::Conflict("dup".into()).is_retryable());
        assert!(!GraphError::not_found("usuario", 7).is_retryable());
        assert!(!GraphError::Database("io".into()).is_retryable());
    }

    #[test]
    fn test_not_found_message() {
        let err = GraphError::not_found("usuario", 42);
        assert_eq!(err.to_string(), "usuario not found: 42");
    }

    #[test]
    fn test_empty_statement_errors() {
        assert!(GraphError::from_statement_errors(Vec::new()).is_none());
    }

    #[test]
    fn test_classify_store_messages() {
        let conflict = GraphError::classify(
            "Failed to commit transaction due to a read or write conflict. \
             This transaction can be retried"
                .to_string(),
        );
        assert!(matches!(conflict, GraphError::StoreTransaction(_)));
        assert!(conflict.is_retryable());

        let duplicate = GraphError::classify(
            "Database index `conectado_par` already contains [1, 2]".to_string(),
        );
        assert!(matches!(duplicate, GraphError::Conflict(_)));

        let other = GraphError::classify("Found 'x' for field `edad`".to_string());
        assert!(matches!(other, GraphError::Database(_)));
    }

    #[test]
    fn test_failing_statement_wins_over_rollback_marker() {
        let marker = format!("The query was {}", NOT_EXECUTED_MARKER);
        let messages = vec![
            (2, marker.clone()),
            (1, "Database index `usuario_nombre` already contains ['ana', 'lopez']".to_string()),
            (0, marker.clone()),
        ];
        let err = GraphError::from_statement_messages(messages).unwrap();
        assert!(matches!(err, GraphError::Conflict(_)));

        // only rollback markers left: the transaction itself failed
        let err = GraphError::from_statement_messages(vec![(0, marker)]).unwrap();
        assert!(matches!(err, GraphError::StoreTransaction(_)));
    }
}
