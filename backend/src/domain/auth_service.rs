//! Authentication and credential management.
//!
//! [`authorize`](crate::domain::authorize) itself is a pure predicate and
//! lives in [`crate::domain::role`]; this service covers the repository-
//! backed operations: credential verification, rotation, and display-name
//! resolution.

use std::sync::Arc;

use crate::domain::auth::validate_secret;
use crate::domain::ports::{
    EnrollmentRepository, EnrollmentRepositoryError, IdentityRepository, IdentityRepositoryError,
};
use crate::domain::{DomainResult, Error, Identity, IdentityId, LoginCredentials, PasswordHash, Role};

const INVALID_CREDENTIALS: &str = "invalid handle or secret";
const DEACTIVATED: &str = "account is deactivated; contact an administrator";

fn map_identity_repo_error(error: IdentityRepositoryError) -> Error {
    match error {
        IdentityRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("identity repository unavailable: {message}"))
        }
        IdentityRepositoryError::Query { message } => {
            Error::internal(format!("identity repository error: {message}"))
        }
    }
}

fn map_enrollment_repo_error(error: EnrollmentRepositoryError) -> Error {
    match error {
        EnrollmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("enrollment repository unavailable: {message}"))
        }
        other => Error::internal(format!("enrollment repository error: {other}")),
    }
}

/// Repository-backed authentication service.
#[derive(Clone)]
pub struct AuthService<I, E> {
    identities: Arc<I>,
    enrollment: Arc<E>,
}

impl<I, E> AuthService<I, E> {
    /// Create a new service over the identity and enrollment repositories.
    pub fn new(identities: Arc<I>, enrollment: Arc<E>) -> Self {
        Self {
            identities,
            enrollment,
        }
    }
}

impl<I, E> AuthService<I, E>
where
    I: IdentityRepository,
    E: EnrollmentRepository,
{
    /// Validate credentials and return the authenticated identity.
    ///
    /// Unknown handles and hash mismatches produce the same failure so a
    /// caller cannot probe for registered handles; a deactivated identity
    /// gets its own user-facing reason.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> DomainResult<Identity> {
        let identity = self
            .identities
            .find_by_handle(credentials.handle())
            .await
            .map_err(map_identity_repo_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;

        if !identity.password_hash().verify(credentials.secret()) {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        if !identity.is_active() {
            return Err(Error::unauthorized(DEACTIVATED));
        }

        Ok(identity)
    }

    /// Verify the current secret and store a freshly salted hash of the
    /// new one.
    pub async fn change_credential(
        &self,
        id: IdentityId,
        current_secret: &str,
        new_secret: &str,
    ) -> DomainResult<()> {
        validate_secret(new_secret).map_err(|err| Error::invalid_request(err.to_string()))?;

        let identity = self
            .identities
            .find_by_id(id)
            .await
            .map_err(map_identity_repo_error)?
            .ok_or_else(|| Error::not_found(format!("identity {id} not found")))?;

        if !identity.password_hash().verify(current_secret) {
            return Err(Error::unauthorized("current secret does not match"));
        }

        let updated = self
            .identities
            .update_password(id, &PasswordHash::derive(new_secret))
            .await
            .map_err(map_identity_repo_error)?;

        if updated {
            Ok(())
        } else {
            Err(Error::not_found(format!("identity {id} not found")))
        }
    }

    /// Resolve the display name for an identity.
    ///
    /// Delegates to the linked profile's full name and falls back to the
    /// handle when no profile exists for the role.
    pub async fn display_name(&self, identity: &Identity) -> DomainResult<String> {
        match identity.role() {
            Role::Student => {
                if let Some(student) = self
                    .enrollment
                    .find_student_by_identity(identity.id())
                    .await
                    .map_err(map_enrollment_repo_error)?
                {
                    return Ok(student.full_name().to_owned());
                }
            }
            Role::Lecturer => {
                if let Some(lecturer) = self
                    .enrollment
                    .find_lecturer_by_identity(identity.id())
                    .await
                    .map_err(map_enrollment_repo_error)?
                {
                    return Ok(lecturer.full_name().to_owned());
                }
            }
            Role::Admin => {}
        }
        Ok(identity.handle().to_owned())
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
