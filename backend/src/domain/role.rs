//! Roles and the capability check gating role-scoped operations.
//!
//! Every mutating operation in the services takes a [`Capability`] and
//! re-checks its role on entry, so a caller can never reach a mutation
//! without first passing through [`authorize`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{Error, Identity, IdentityId};

/// Fixed role assigned to an identity for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages the directory and enrollment.
    Admin,
    /// Teaches, enters grades, uploads materials.
    Lecturer,
    /// Studies, reads grades, submits evaluations.
    Student,
}

impl Role {
    /// Stable storage label for the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Lecturer => "lecturer",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when decoding a role label from storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role label: {label}")]
pub struct UnknownRoleError {
    /// The label that failed to decode.
    pub label: String,
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "lecturer" => Ok(Self::Lecturer),
            "student" => Ok(Self::Student),
            other => Err(UnknownRoleError {
                label: other.to_owned(),
            }),
        }
    }
}

/// Proof that an identity holds a role, minted by [`authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    identity_id: IdentityId,
    role: Role,
}

impl Capability {
    /// Identity the capability was minted for.
    pub const fn identity_id(&self) -> IdentityId {
        self.identity_id
    }

    /// Role the capability grants.
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Require the capability to carry `role`.
    pub fn require(&self, role: Role) -> Result<(), Error> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::forbidden(format!("operation requires the {role} role")))
        }
    }
}

/// Check that `identity` holds `required` and mint the matching capability.
///
/// The check is a pure predicate: an identity has a single fixed role, so
/// authorisation succeeds iff the roles match and the identity is still
/// active.
pub fn authorize(identity: &Identity, required: Role) -> Result<Capability, Error> {
    if !identity.is_active() {
        return Err(Error::forbidden("identity is deactivated"));
    }
    if identity.role() != required {
        return Err(Error::forbidden(format!(
            "operation requires the {required} role"
        )));
    }
    Ok(Capability {
        identity_id: identity.id(),
        role: required,
    })
}
