//! Account enrollment: paired identity/profile creation and deletion.
//!
//! An identity and its profile form one logical record. Creation writes
//! both rows in a single transaction after uniqueness pre-checks;
//! deletion removes both. The pre-checks give precise failure reasons
//! while the storage constraints stay the final arbiter under
//! concurrency.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::auth::validate_secret;
use crate::domain::enrollment::{Lecturer, LecturerDraft, Student, StudentDraft};
use crate::domain::identity::{Identity, IdentityDraft};
use crate::domain::ports::{
    EnrollmentRepository, EnrollmentRepositoryError, IdentityRepository, IdentityRepositoryError,
};
use crate::domain::{
    Capability, ClassroomId, DomainResult, Error, IdentityId, LecturerId, MajorId, PasswordHash,
    Role, StudentId,
};

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
        EnrollmentRepositoryError::Query { message } => {
            Error::internal(format!("enrollment repository error: {message}"))
        }
        EnrollmentRepositoryError::DuplicateKey { message } => {
            Error::conflict(format!("enrollment key already in use: {message}"))
        }
        EnrollmentRepositoryError::ForeignKey { message } => {
            Error::conflict(format!("dependent records exist: {message}"))
        }
    }
}

/// Request payload for [`EnrollmentService::create_student_account`].
#[derive(Debug, Clone)]
pub struct NewStudentAccount {
    /// Unique login handle.
    pub handle: String,
    /// Unique contact address.
    pub email: String,
    /// Initial secret.
    pub secret: String,
    /// Unique student code.
    pub code: String,
    /// Full display name.
    pub full_name: String,
    /// Birth date, if recorded.
    pub birth_date: Option<NaiveDate>,
    /// Gender label, if recorded.
    pub gender: Option<String>,
    /// Phone number, if recorded.
    pub phone: Option<String>,
    /// Postal address, if recorded.
    pub address: Option<String>,
    /// Classroom assignment, if chosen.
    pub classroom_id: Option<ClassroomId>,
    /// Major assignment, if chosen.
    pub major_id: Option<MajorId>,
    /// Year the student enrolled, if recorded.
    pub enrollment_year: Option<i32>,
}

/// Request payload for [`EnrollmentService::create_lecturer_account`].
#[derive(Debug, Clone)]
pub struct NewLecturerAccount {
    /// Unique login handle.
    pub handle: String,
    /// Unique contact address.
    pub email: String,
    /// Initial secret.
    pub secret: String,
    /// Unique lecturer code.
    pub code: String,
    /// Full display name.
    pub full_name: String,
    /// Department or faculty, if recorded.
    pub department: Option<String>,
    /// Area of expertise, if recorded.
    pub expertise: Option<String>,
    /// Phone number, if recorded.
    pub phone: Option<String>,
    /// Academic degree label, if recorded.
    pub degree: Option<String>,
}

/// Enrollment graph service.
#[derive(Clone)]
pub struct EnrollmentService<I, E> {
    identities: Arc<I>,
    enrollment: Arc<E>,
}

impl<I, E> EnrollmentService<I, E> {
    /// Create a new service over the identity and enrollment repositories.
    pub fn new(identities: Arc<I>, enrollment: Arc<E>) -> Self {
        Self {
            identities,
            enrollment,
        }
    }
}

impl<I, E> EnrollmentService<I, E>
where
    I: IdentityRepository,
    E: EnrollmentRepository,
{
    async fn check_uniqueness(&self, handle: &str, email: &str) -> DomainResult<()> {
        if self
            .identities
            .find_by_handle(handle)
            .await
            .map_err(map_identity_repo_error)?
            .is_some()
        {
            return Err(Error::conflict("handle is already taken"));
        }
        if self
            .identities
            .find_by_email(email)
            .await
            .map_err(map_identity_repo_error)?
            .is_some()
        {
            return Err(Error::conflict("contact address is already in use"));
        }
        Ok(())
    }

    fn build_identity(
        handle: String,
        email: String,
        secret: &str,
        role: Role,
    ) -> DomainResult<Identity> {
        validate_secret(secret).map_err(|err| Error::invalid_request(err.to_string()))?;
        Identity::new(IdentityDraft {
            id: IdentityId::random(),
            handle,
            email,
            password_hash: PasswordHash::derive(secret),
            role,
            is_active: true,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))
    }

    /// Create a student account: identity plus profile, both visible or
    /// neither.
    pub async fn create_student_account(
        &self,
        capability: &Capability,
        request: NewStudentAccount,
    ) -> DomainResult<Student> {
        capability.require(Role::Admin)?;
        self.check_uniqueness(&request.handle, &request.email).await?;

        let identity = Self::build_identity(
            request.handle,
            request.email,
            &request.secret,
            Role::Student,
        )?;
        let student = Student::new(StudentDraft {
            id: StudentId::random(),
            identity_id: identity.id(),
            code: request.code,
            full_name: request.full_name,
            birth_date: request.birth_date,
            gender: request.gender,
            phone: request.phone,
            address: request.address,
            classroom_id: request.classroom_id,
            major_id: request.major_id,
            enrollment_year: request.enrollment_year,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.enrollment
            .create_student(&identity, &student)
            .await
            .map_err(map_enrollment_repo_error)?;
        Ok(student)
    }

    /// Create a lecturer account: identity plus profile, both visible or
    /// neither.
    pub async fn create_lecturer_account(
        &self,
        capability: &Capability,
        request: NewLecturerAccount,
    ) -> DomainResult<Lecturer> {
        capability.require(Role::Admin)?;
        self.check_uniqueness(&request.handle, &request.email).await?;

        let identity = Self::build_identity(
            request.handle,
            request.email,
            &request.secret,
            Role::Lecturer,
        )?;
        let lecturer = Lecturer::new(LecturerDraft {
            id: LecturerId::random(),
            identity_id: identity.id(),
            code: request.code,
            full_name: request.full_name,
            department: request.department,
            expertise: request.expertise,
            phone: request.phone,
            degree: request.degree,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.enrollment
            .create_lecturer(&identity, &lecturer)
            .await
            .map_err(map_enrollment_repo_error)?;
        Ok(lecturer)
    }

    /// Delete a student profile together with its owning identity.
    pub async fn delete_student_profile(
        &self,
        capability: &Capability,
        id: StudentId,
    ) -> DomainResult<()> {
        capability.require(Role::Admin)?;
        let deleted = self
            .enrollment
            .delete_student(id)
            .await
            .map_err(map_enrollment_repo_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("student {id} not found")))
        }
    }

    /// Delete a lecturer profile together with its owning identity.
    ///
    /// Teaching schedules are shared directory data and block the delete
    /// with a conflict; remove them first.
    pub async fn delete_lecturer_profile(
        &self,
        capability: &Capability,
        id: LecturerId,
    ) -> DomainResult<()> {
        capability.require(Role::Admin)?;
        let deleted = self
            .enrollment
            .delete_lecturer(id)
            .await
            .map_err(map_enrollment_repo_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("lecturer {id} not found")))
        }
    }

    /// Find a student profile.
    pub async fn student(&self, id: StudentId) -> DomainResult<Student> {
        self.enrollment
            .find_student(id)
            .await
            .map_err(map_enrollment_repo_error)?
            .ok_or_else(|| Error::not_found(format!("student {id} not found")))
    }

    /// Find a lecturer profile.
    pub async fn lecturer(&self, id: LecturerId) -> DomainResult<Lecturer> {
        self.enrollment
            .find_lecturer(id)
            .await
            .map_err(map_enrollment_repo_error)?
            .ok_or_else(|| Error::not_found(format!("lecturer {id} not found")))
    }

    /// List the students enrolled in a classroom.
    pub async fn students_in_classroom(
        &self,
        classroom_id: ClassroomId,
    ) -> DomainResult<Vec<Student>> {
        self.enrollment
            .list_students_in_classroom(classroom_id)
            .await
            .map_err(map_enrollment_repo_error)
    }
}

#[cfg(test)]
#[path = "enrollment_service_tests.rs"]
mod tests;
