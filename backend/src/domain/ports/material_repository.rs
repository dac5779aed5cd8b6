//! Port for material metadata persistence.

use async_trait::async_trait;

use crate::domain::{Material, MaterialId, SubjectId};

/// Errors raised by material repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaterialRepositoryError {
    /// Repository connection could not be established.
    #[error("material repository connection failed: {message}")]
    Connection {
        /// Adapter-provided detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("material repository query failed: {message}")]
    Query {
        /// Adapter-provided detail.
        message: String,
    },
    /// A referential constraint rejected the write.
    #[error("material referential integrity violated: {message}")]
    ForeignKey {
        /// Adapter-provided detail.
        message: String,
    },
}

impl MaterialRepositoryError {
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

    /// Create a foreign-key error with the given message.
    pub fn foreign_key(message: impl Into<String>) -> Self {
        Self::ForeignKey {
            message: message.into(),
        }
    }
}

/// Port for material inserts, reads, and the download counter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaterialRepository: Send + Sync {
    /// Insert a new material row.
    async fn insert(&self, material: &Material) -> Result<(), MaterialRepositoryError>;

    /// Find a material by its primary key.
    async fn find(&self, id: MaterialId) -> Result<Option<Material>, MaterialRepositoryError>;

    /// List the materials registered for a subject.
    async fn list_for_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<Material>, MaterialRepositoryError>;

    /// Atomically bump the download counter; `false` when no row matched.
    async fn increment_download_count(
        &self,
        id: MaterialId,
    ) -> Result<bool, MaterialRepositoryError>;

    /// Delete a material; `false` when it does not exist.
    async fn delete(&self, id: MaterialId) -> Result<bool, MaterialRepositoryError>;
}
