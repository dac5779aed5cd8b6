//! Port for identity lookups and credential updates.
//!
//! Identity rows are created and deleted only together with a profile, so
//! the write side of that lifecycle lives on the enrollment repository;
//! this port covers authentication reads and credential rotation.

use async_trait::async_trait;

use crate::domain::{Identity, IdentityId, PasswordHash};

/// Errors raised by identity repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityRepositoryError {
    /// Repository connection could not be established.
    #[error("identity repository connection failed: {message}")]
    Connection {
        /// Adapter-provided detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("identity repository query failed: {message}")]
    Query {
        /// Adapter-provided detail.
        message: String,
    },
}

impl IdentityRepositoryError {
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

/// Port for reading identities and rotating their credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find an identity by its primary key.
    async fn find_by_id(
        &self,
        id: IdentityId,
    ) -> Result<Option<Identity>, IdentityRepositoryError>;

    /// Find an identity by its unique handle.
    async fn find_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<Identity>, IdentityRepositoryError>;

    /// Find an identity by its unique contact address.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Identity>, IdentityRepositoryError>;

    /// Replace the stored credential hash; `false` when no row matched.
    async fn update_password(
        &self,
        id: IdentityId,
        hash: &PasswordHash,
    ) -> Result<bool, IdentityRepositoryError>;
}
