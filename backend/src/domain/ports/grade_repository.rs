//! Port for grade ledger persistence.
//!
//! Writes are keyed on the (student, subject, semester) triple; the
//! adapter resolves existing-row-or-new at the storage layer so repeated
//! upserts can never create a second row for the same key.

use async_trait::async_trait;

use crate::domain::{Grade, SemesterLabel, StudentId, SubjectId};

/// Errors raised by grade repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradeRepositoryError {
    /// Repository connection could not be established.
    #[error("grade repository connection failed: {message}")]
    Connection {
        /// Adapter-provided detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("grade repository query failed: {message}")]
    Query {
        /// Adapter-provided detail.
        message: String,
    },
}

impl GradeRepositoryError {
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
}

/// One grade joined with the credit weight of its subject, as read for
/// GPA aggregation. Rows whose subject no longer resolves are not
/// produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    /// Graded subject.
    pub subject_id: SubjectId,
    /// Credit weight of the subject.
    pub credits: i32,
    /// Weighted total of the grade, `None` while ungraded.
    pub total: Option<f64>,
}

/// Port for grade ledger reads and keyed upserts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GradeRepository: Send + Sync {
    /// Find the grade row for a key triple.
    async fn find_by_key(
        &self,
        student_id: StudentId,
        subject_id: SubjectId,
        semester: &SemesterLabel,
    ) -> Result<Option<Grade>, GradeRepositoryError>;

    /// Insert or update the row for the grade's key triple.
    async fn upsert(&self, grade: &Grade) -> Result<(), GradeRepositoryError>;

    /// Upsert a batch of grades inside one transaction; an error partway
    /// leaves no row from the batch behind.
    async fn upsert_many(&self, grades: &[Grade]) -> Result<(), GradeRepositoryError>;

    /// List a student's grades, optionally narrowed to one semester.
    async fn list_for_student<'a>(
        &self,
        student_id: StudentId,
        semester: Option<&'a SemesterLabel>,
    ) -> Result<Vec<Grade>, GradeRepositoryError>;

    /// Read the grade/credit pairs feeding GPA aggregation.
    async fn transcript_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<TranscriptEntry>, GradeRepositoryError>;
}
