//! Port for enrollment writes: paired identity/profile creation and
//! deletion, plus profile lookups.
//!
//! Creating an account writes the identity row and its profile row inside
//! one transaction; deleting a profile removes both. Adapters surface
//! uniqueness races as [`EnrollmentRepositoryError::DuplicateKey`] so the
//! storage constraint stays the final arbiter.

use async_trait::async_trait;

use crate::domain::{ClassroomId, Identity, IdentityId, Lecturer, LecturerId, Student, StudentId};

/// Errors raised by enrollment repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrollmentRepositoryError {
    /// Repository connection could not be established.
    #[error("enrollment repository connection failed: {message}")]
    Connection {
        /// Adapter-provided detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("enrollment repository query failed: {message}")]
    Query {
        /// Adapter-provided detail.
        message: String,
    },
    /// A uniqueness constraint rejected the write.
    #[error("enrollment uniqueness violated: {message}")]
    DuplicateKey {
        /// Adapter-provided detail.
        message: String,
    },
    /// A referential constraint rejected the write.
    #[error("enrollment referential integrity violated: {message}")]
    ForeignKey {
        /// Adapter-provided detail.
        message: String,
    },
}

impl EnrollmentRepositoryError {
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

/// Port for profile persistence and the paired identity lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Persist an identity and its student profile in one transaction.
    async fn create_student(
        &self,
        identity: &Identity,
        student: &Student,
    ) -> Result<(), EnrollmentRepositoryError>;

    /// Persist an identity and its lecturer profile in one transaction.
    async fn create_lecturer(
        &self,
        identity: &Identity,
        lecturer: &Lecturer,
    ) -> Result<(), EnrollmentRepositoryError>;

    /// Find a student profile by its primary key.
    async fn find_student(
        &self,
        id: StudentId,
    ) -> Result<Option<Student>, EnrollmentRepositoryError>;

    /// Find the student profile owned by an identity.
    async fn find_student_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Student>, EnrollmentRepositoryError>;

    /// Find a lecturer profile by its primary key.
    async fn find_lecturer(
        &self,
        id: LecturerId,
    ) -> Result<Option<Lecturer>, EnrollmentRepositoryError>;

    /// Find the lecturer profile owned by an identity.
    async fn find_lecturer_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Lecturer>, EnrollmentRepositoryError>;

    /// List the students enrolled in a classroom.
    async fn list_students_in_classroom(
        &self,
        classroom_id: ClassroomId,
    ) -> Result<Vec<Student>, EnrollmentRepositoryError>;

    /// Delete a student profile and its owning identity in one
    /// transaction; `false` when the profile does not exist.
    async fn delete_student(&self, id: StudentId) -> Result<bool, EnrollmentRepositoryError>;

    /// Delete a lecturer profile and its owning identity in one
    /// transaction; `false` when the profile does not exist.
    async fn delete_lecturer(&self, id: LecturerId) -> Result<bool, EnrollmentRepositoryError>;
}
