//! Identity records: login credentials and the role they grant.

use crate::domain::auth::PasswordHash;
use crate::domain::id::IdentityId;
use crate::domain::role::Role;

/// Minimum allowed length for a handle.
pub const HANDLE_MIN: usize = 3;
/// Maximum allowed length for a handle.
pub const HANDLE_MAX: usize = 64;
/// Maximum allowed length for a contact address.
pub const EMAIL_MAX: usize = 120;

/// Validation errors returned by [`Identity::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// Handle was blank once trimmed.
    #[error("handle must not be empty")]
    EmptyHandle,
    /// Handle is shorter than the accepted minimum.
    #[error("handle must be at least {min} characters")]
    HandleTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Handle exceeds the storage width.
    #[error("handle must be at most {max} characters")]
    HandleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Contact address does not look like an email address.
    #[error("contact address is not a valid email address")]
    InvalidEmail,
    /// Contact address exceeds the storage width.
    #[error("contact address must be at most {max} characters")]
    EmailTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// Input for building an [`Identity`].
#[derive(Debug, Clone)]
pub struct IdentityDraft {
    /// Primary key.
    pub id: IdentityId,
    /// Unique login handle.
    pub handle: String,
    /// Unique contact address.
    pub email: String,
    /// Salted one-way hash of the secret.
    pub password_hash: PasswordHash,
    /// Fixed role for the identity's lifetime.
    pub role: Role,
    /// Whether the identity may authenticate.
    pub is_active: bool,
}

/// A login-capable identity with a fixed role.
///
/// ## Invariants
/// - `handle` is trimmed, unique, and between [`HANDLE_MIN`] and
///   [`HANDLE_MAX`] characters.
/// - `email` is unique and shaped like `local@domain`.
/// - `role` never changes after creation.
///
/// At most one student profile and at most one lecturer profile may
/// reference an identity; account creation ensures the role matches the
/// profile being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: IdentityId,
    handle: String,
    email: String,
    password_hash: PasswordHash,
    role: Role,
    is_active: bool,
}

impl Identity {
    /// Build an identity from validated components.
    pub fn new(draft: IdentityDraft) -> Result<Self, IdentityValidationError> {
        let handle = draft.handle.trim().to_owned();
        if handle.is_empty() {
            return Err(IdentityValidationError::EmptyHandle);
        }
        let handle_len = handle.chars().count();
        if handle_len < HANDLE_MIN {
            return Err(IdentityValidationError::HandleTooShort { min: HANDLE_MIN });
        }
        if handle_len > HANDLE_MAX {
            return Err(IdentityValidationError::HandleTooLong { max: HANDLE_MAX });
        }

        let email = draft.email.trim().to_owned();
        if email.chars().count() > EMAIL_MAX {
            return Err(IdentityValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !looks_like_email(&email) {
            return Err(IdentityValidationError::InvalidEmail);
        }

        Ok(Self {
            id: draft.id,
            handle,
            email,
            password_hash: draft.password_hash,
            role: draft.role,
            is_active: draft.is_active,
        })
    }

    /// Primary key.
    pub const fn id(&self) -> IdentityId {
        self.id
    }

    /// Unique login handle.
    pub fn handle(&self) -> &str {
        self.handle.as_str()
    }

    /// Unique contact address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Stored credential hash.
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Fixed role.
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether the identity may authenticate.
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Replace the stored credential hash.
    pub fn with_password_hash(mut self, hash: PasswordHash) -> Self {
        self.password_hash = hash;
        self
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && !domain.starts_with('.') && domain.contains('.')
}
