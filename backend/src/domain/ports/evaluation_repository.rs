//! Port for evaluation ledger persistence.
//!
//! Evaluations are create-only. The storage uniqueness constraint on
//! (student, lecturer, subject, semester) serialises concurrent
//! submissions; the losing writer sees
//! [`EvaluationRepositoryError::DuplicateKey`].

use async_trait::async_trait;

use crate::domain::{Evaluation, LecturerId, Rating, SemesterLabel, StudentId, SubjectId};

/// Errors raised by evaluation repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationRepositoryError {
    /// Repository connection could not be established.
    #[error("evaluation repository connection failed: {message}")]
    Connection {
        /// Adapter-provided detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("evaluation repository query failed: {message}")]
    Query {
        /// Adapter-provided detail.
        message: String,
    },
    /// The uniqueness constraint rejected a second row for the key.
    #[error("evaluation already recorded: {message}")]
    DuplicateKey {
        /// Adapter-provided detail.
        message: String,
    },
}

impl EvaluationRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a duplicate-key error with the given message.
    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::DuplicateKey {
            message: message.into(),
        }
    }
}

/// Port for evaluation inserts and rating reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EvaluationRepository: Send + Sync {
    /// Insert a new evaluation row.
    async fn insert(&self, evaluation: &Evaluation) -> Result<(), EvaluationRepositoryError>;

    /// Whether a row already exists for the exact key quadruple.
    async fn exists_for_key(
        &self,
        student_id: StudentId,
        lecturer_id: LecturerId,
        subject_id: Option<SubjectId>,
        semester: &SemesterLabel,
    ) -> Result<bool, EvaluationRepositoryError>;

    /// All ratings recorded for a lecturer.
    async fn ratings_for_lecturer(
        &self,
        lecturer_id: LecturerId,
    ) -> Result<Vec<Rating>, EvaluationRepositoryError>;

    /// List the evaluations a student has authored.
    async fn list_authored_by(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Evaluation>, EvaluationRepositoryError>;
}
