//! Port for academic directory persistence.
//!
//! Directory writes are keyed upserts. Deletions surface dependent rows
//! as [`DirectoryRepositoryError::ForeignKey`] so the service can report
//! a conflict instead of silently cascading; the one exception is the
//! classroom→student edge, which the storage layer resolves by nulling
//! the student's classroom reference.

use async_trait::async_trait;

use crate::domain::{
    Classroom, ClassroomId, LecturerId, Major, MajorId, Schedule, ScheduleId, Subject, SubjectId,
};

/// Errors raised by directory repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryRepositoryError {
    /// Repository connection could not be established.
    #[error("directory repository connection failed: {message}")]
    Connection {
        /// Adapter-provided detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("directory repository query failed: {message}")]
    Query {
        /// Adapter-provided detail.
        message: String,
    },
    /// A uniqueness constraint rejected the write.
    #[error("directory uniqueness violated: {message}")]
    DuplicateKey {
        /// Adapter-provided detail.
        message: String,
    },
    /// A referential constraint rejected the write.
    #[error("directory referential integrity violated: {message}")]
    ForeignKey {
        /// Adapter-provided detail.
        message: String,
    },
}

impl DirectoryRepositoryError {
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

    /// Create a foreign-key error with the given message.
    pub fn foreign_key(message: impl Into<String>) -> Self {
        Self::ForeignKey {
            message: message.into(),
        }
    }
}

/// Port for reference-data persistence: majors, classrooms, subjects, and
/// schedules.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Insert or update a major keyed by its id.
    async fn upsert_major(&self, major: &Major) -> Result<(), DirectoryRepositoryError>;

    /// Find a major by its primary key.
    async fn find_major(&self, id: MajorId) -> Result<Option<Major>, DirectoryRepositoryError>;

    /// List all majors.
    async fn list_majors(&self) -> Result<Vec<Major>, DirectoryRepositoryError>;

    /// Delete a major; `false` when it does not exist.
    async fn delete_major(&self, id: MajorId) -> Result<bool, DirectoryRepositoryError>;

    /// Insert or update a classroom keyed by its id.
    async fn upsert_classroom(
        &self,
        classroom: &Classroom,
    ) -> Result<(), DirectoryRepositoryError>;

    /// Find a classroom by its primary key.
    async fn find_classroom(
        &self,
        id: ClassroomId,
    ) -> Result<Option<Classroom>, DirectoryRepositoryError>;

    /// List all classrooms.
    async fn list_classrooms(&self) -> Result<Vec<Classroom>, DirectoryRepositoryError>;

    /// Delete a classroom, unassigning its students; `false` when it does
    /// not exist.
    async fn delete_classroom(&self, id: ClassroomId) -> Result<bool, DirectoryRepositoryError>;

    /// Insert or update a subject keyed by its id.
    async fn upsert_subject(&self, subject: &Subject) -> Result<(), DirectoryRepositoryError>;

    /// Find a subject by its primary key.
    async fn find_subject(
        &self,
        id: SubjectId,
    ) -> Result<Option<Subject>, DirectoryRepositoryError>;

    /// List all subjects.
    async fn list_subjects(&self) -> Result<Vec<Subject>, DirectoryRepositoryError>;

    /// Delete a subject; `false` when it does not exist.
    async fn delete_subject(&self, id: SubjectId) -> Result<bool, DirectoryRepositoryError>;

    /// Insert or update a schedule slot keyed by its id.
    async fn upsert_schedule(&self, schedule: &Schedule) -> Result<(), DirectoryRepositoryError>;

    /// Find a schedule slot by its primary key.
    async fn find_schedule(
        &self,
        id: ScheduleId,
    ) -> Result<Option<Schedule>, DirectoryRepositoryError>;

    /// List the slots taught by a lecturer.
    async fn list_schedules_for_lecturer(
        &self,
        lecturer_id: LecturerId,
    ) -> Result<Vec<Schedule>, DirectoryRepositoryError>;

    /// List the slots attended by a classroom.
    async fn list_schedules_for_classroom(
        &self,
        classroom_id: ClassroomId,
    ) -> Result<Vec<Schedule>, DirectoryRepositoryError>;

    /// Delete a schedule slot; `false` when it does not exist.
    async fn delete_schedule(&self, id: ScheduleId) -> Result<bool, DirectoryRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn error_constructors_carry_the_message() {
        let err = DirectoryRepositoryError::duplicate_key("majors_code_key");
        assert!(err.to_string().contains("majors_code_key"));
        let err = DirectoryRepositoryError::foreign_key("schedules_subject_id_fkey");
        assert!(err.to_string().contains("schedules_subject_id_fkey"));
    }
}
