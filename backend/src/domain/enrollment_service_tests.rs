//! Tests for the enrollment service.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockEnrollmentRepository, MockIdentityRepository};
use crate::domain::{AuthService, ErrorCode, LoginCredentials, authorize};

fn capability_for(role: Role) -> Capability {
    let identity = Identity::new(IdentityDraft {
        id: IdentityId::random(),
        handle: "registraradmin".to_owned(),
        email: "admin@example.edu".to_owned(),
        password_hash: PasswordHash::derive("hunter22"),
        role,
        is_active: true,
    })
    .expect("valid identity");
    authorize(&identity, role).expect("matching role authorises")
}

#[fixture]
fn admin() -> Capability {
    capability_for(Role::Admin)
}

fn student_request() -> NewStudentAccount {
    NewStudentAccount {
        handle: "nguyenvana".to_owned(),
        email: "nguyenvana@example.edu".to_owned(),
        secret: "hunter22".to_owned(),
        code: "SV2024001".to_owned(),
        full_name: "Nguyen Van A".to_owned(),
        birth_date: None,
        gender: Some("Nam".to_owned()),
        phone: None,
        address: None,
        classroom_id: None,
        major_id: None,
        enrollment_year: Some(2022),
    }
}

fn lecturer_request() -> NewLecturerAccount {
    NewLecturerAccount {
        handle: "tranthib".to_owned(),
        email: "tranthib@example.edu".to_owned(),
        secret: "hunter22".to_owned(),
        code: "GV012".to_owned(),
        full_name: "Tran Thi B".to_owned(),
        department: Some("Computer Science".to_owned()),
        expertise: None,
        phone: None,
        degree: Some("TS".to_owned()),
    }
}

fn service(
    identities: MockIdentityRepository,
    enrollment: MockEnrollmentRepository,
) -> EnrollmentService<MockIdentityRepository, MockEnrollmentRepository> {
    EnrollmentService::new(Arc::new(identities), Arc::new(enrollment))
}

fn unique_identities() -> MockIdentityRepository {
    let mut identities = MockIdentityRepository::new();
    identities.expect_find_by_handle().returning(|_| Ok(None));
    identities.expect_find_by_email().returning(|_| Ok(None));
    identities
}

#[rstest]
#[tokio::test]
async fn create_student_account_writes_identity_and_profile_together(admin: Capability) {
    let mut enrollment = MockEnrollmentRepository::new();
    enrollment
        .expect_create_student()
        .times(1)
        .withf(|identity, student| {
            identity.role() == Role::Student
                && identity.handle() == "nguyenvana"
                && student.identity_id() == identity.id()
                && identity.password_hash().verify("hunter22")
        })
        .return_once(|_, _| Ok(()));

    let student = service(unique_identities(), enrollment)
        .create_student_account(&admin, student_request())
        .await
        .expect("account creation succeeds");
    assert_eq!(student.code(), "SV2024001");
}

#[rstest]
#[tokio::test]
async fn create_lecturer_account_assigns_the_lecturer_role(admin: Capability) {
    let mut enrollment = MockEnrollmentRepository::new();
    enrollment
        .expect_create_lecturer()
        .times(1)
        .withf(|identity, lecturer| {
            identity.role() == Role::Lecturer && lecturer.identity_id() == identity.id()
        })
        .return_once(|_, _| Ok(()));

    let lecturer = service(unique_identities(), enrollment)
        .create_lecturer_account(&admin, lecturer_request())
        .await
        .expect("account creation succeeds");
    assert_eq!(lecturer.code(), "GV012");
}

#[rstest]
#[tokio::test]
async fn taken_handles_are_a_conflict(admin: Capability) {
    let mut identities = MockIdentityRepository::new();
    identities.expect_find_by_handle().return_once(|_| {
        Ok(Some(
            Identity::new(IdentityDraft {
                id: IdentityId::random(),
                handle: "nguyenvana".to_owned(),
                email: "other@example.edu".to_owned(),
                password_hash: PasswordHash::derive("hunter22"),
                role: Role::Student,
                is_active: true,
            })
            .expect("valid identity"),
        ))
    });

    let mut enrollment = MockEnrollmentRepository::new();
    enrollment.expect_create_student().times(0);

    let err = service(identities, enrollment)
        .create_student_account(&admin, student_request())
        .await
        .expect_err("taken handle must fail");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn uniqueness_races_map_the_storage_rejection_to_a_conflict(admin: Capability) {
    let mut enrollment = MockEnrollmentRepository::new();
    enrollment
        .expect_create_student()
        .return_once(|_, _| Err(EnrollmentRepositoryError::duplicate_key("identities_handle_key")));

    let err = service(unique_identities(), enrollment)
        .create_student_account(&admin, student_request())
        .await
        .expect_err("storage race must fail");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn short_initial_secrets_are_rejected(admin: Capability) {
    let mut request = student_request();
    request.secret = "tiny".to_owned();

    let mut enrollment = MockEnrollmentRepository::new();
    enrollment.expect_create_student().times(0);

    let err = service(unique_identities(), enrollment)
        .create_student_account(&admin, request)
        .await
        .expect_err("short secret must fail");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn account_creation_requires_the_admin_capability() {
    let student_cap = capability_for(Role::Student);
    let mut enrollment = MockEnrollmentRepository::new();
    enrollment.expect_create_student().times(0);

    let err = service(MockIdentityRepository::new(), enrollment)
        .create_student_account(&student_cap, student_request())
        .await
        .expect_err("students cannot enroll accounts");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn delete_student_profile_reports_success_and_absence(admin: Capability) {
    let mut enrollment = MockEnrollmentRepository::new();
    enrollment.expect_delete_student().return_once(|_| Ok(true));
    service(MockIdentityRepository::new(), enrollment)
        .delete_student_profile(&admin, StudentId::random())
        .await
        .expect("delete succeeds");

    let mut enrollment = MockEnrollmentRepository::new();
    enrollment.expect_delete_student().return_once(|_| Ok(false));
    let err = service(MockIdentityRepository::new(), enrollment)
        .delete_student_profile(&admin, StudentId::random())
        .await
        .expect_err("missing profile must fail");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn delete_lecturer_with_schedules_is_a_conflict(admin: Capability) {
    let mut enrollment = MockEnrollmentRepository::new();
    enrollment
        .expect_delete_lecturer()
        .return_once(|_| Err(EnrollmentRepositoryError::foreign_key("schedules_lecturer_id_fkey")));

    let err = service(MockIdentityRepository::new(), enrollment)
        .delete_lecturer_profile(&admin, LecturerId::random())
        .await
        .expect_err("schedules must block the delete");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

/// Shared in-memory registry backing both ports, for lifecycle tests
/// that cross the enrollment/authentication seam.
#[derive(Default)]
struct InMemoryRegistry {
    state: Mutex<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    identities: Vec<Identity>,
    students: Vec<Student>,
    lecturers: Vec<Lecturer>,
}

impl InMemoryRegistry {
    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        self.state.lock().expect("registry lock")
    }
}

#[async_trait]
impl IdentityRepository for InMemoryRegistry {
    async fn find_by_id(
        &self,
        id: IdentityId,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        Ok(self.lock().identities.iter().find(|i| i.id() == id).cloned())
    }

    async fn find_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        Ok(self
            .lock()
            .identities
            .iter()
            .find(|i| i.handle() == handle)
            .cloned())
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        Ok(self
            .lock()
            .identities
            .iter()
            .find(|i| i.email() == email)
            .cloned())
    }

    async fn update_password(
        &self,
        id: IdentityId,
        hash: &PasswordHash,
    ) -> Result<bool, IdentityRepositoryError> {
        let mut state = self.lock();
        let Some(position) = state.identities.iter().position(|i| i.id() == id) else {
            return Ok(false);
        };
        let updated = state.identities.remove(position).with_password_hash(hash.clone());
        state.identities.push(updated);
        Ok(true)
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryRegistry {
    async fn create_student(
        &self,
        identity: &Identity,
        student: &Student,
    ) -> Result<(), EnrollmentRepositoryError> {
        let mut state = self.lock();
        if state.identities.iter().any(|i| i.handle() == identity.handle()) {
            return Err(EnrollmentRepositoryError::duplicate_key("identities_handle_key"));
        }
        state.identities.push(identity.clone());
        state.students.push(student.clone());
        Ok(())
    }

    async fn create_lecturer(
        &self,
        identity: &Identity,
        lecturer: &Lecturer,
    ) -> Result<(), EnrollmentRepositoryError> {
        let mut state = self.lock();
        state.identities.push(identity.clone());
        state.lecturers.push(lecturer.clone());
        Ok(())
    }

    async fn find_student(
        &self,
        id: StudentId,
    ) -> Result<Option<Student>, EnrollmentRepositoryError> {
        Ok(self.lock().students.iter().find(|s| s.id() == id).cloned())
    }

    async fn find_student_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Student>, EnrollmentRepositoryError> {
        Ok(self
            .lock()
            .students
            .iter()
            .find(|s| s.identity_id() == identity_id)
            .cloned())
    }

    async fn find_lecturer(
        &self,
        id: LecturerId,
    ) -> Result<Option<Lecturer>, EnrollmentRepositoryError> {
        Ok(self.lock().lecturers.iter().find(|l| l.id() == id).cloned())
    }

    async fn find_lecturer_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Lecturer>, EnrollmentRepositoryError> {
        Ok(self
            .lock()
            .lecturers
            .iter()
            .find(|l| l.identity_id() == identity_id)
            .cloned())
    }

    async fn list_students_in_classroom(
        &self,
        classroom_id: ClassroomId,
    ) -> Result<Vec<Student>, EnrollmentRepositoryError> {
        Ok(self
            .lock()
            .students
            .iter()
            .filter(|s| s.classroom_id() == Some(classroom_id))
            .cloned()
            .collect())
    }

    async fn delete_student(&self, id: StudentId) -> Result<bool, EnrollmentRepositoryError> {
        let mut state = self.lock();
        let Some(position) = state.students.iter().position(|s| s.id() == id) else {
            return Ok(false);
        };
        let student = state.students.remove(position);
        state.identities.retain(|i| i.id() != student.identity_id());
        Ok(true)
    }

    async fn delete_lecturer(&self, id: LecturerId) -> Result<bool, EnrollmentRepositoryError> {
        let mut state = self.lock();
        let Some(position) = state.lecturers.iter().position(|l| l.id() == id) else {
            return Ok(false);
        };
        let lecturer = state.lecturers.remove(position);
        state.identities.retain(|i| i.id() != lecturer.identity_id());
        Ok(true)
    }
}

#[rstest]
#[tokio::test]
async fn deleting_a_student_profile_also_revokes_authentication(admin: Capability) {
    let registry = Arc::new(InMemoryRegistry::default());
    let enrollment_service = EnrollmentService::new(registry.clone(), registry.clone());
    let auth_service = AuthService::new(registry.clone(), registry.clone());

    let student = enrollment_service
        .create_student_account(&admin, student_request())
        .await
        .expect("account creation succeeds");

    let credentials =
        LoginCredentials::try_from_parts("nguyenvana", "hunter22").expect("valid credentials");
    auth_service
        .authenticate(&credentials)
        .await
        .expect("fresh account authenticates");

    enrollment_service
        .delete_student_profile(&admin, student.id())
        .await
        .expect("profile deletion succeeds");

    let err = auth_service
        .authenticate(&credentials)
        .await
        .expect_err("deleted account no longer authenticates");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "invalid handle or secret");
}

#[rstest]
#[tokio::test]
async fn student_lookup_reports_a_missing_profile() {
    let mut enrollment = MockEnrollmentRepository::new();
    enrollment.expect_find_student().return_once(|_| Ok(None));

    let err = service(MockIdentityRepository::new(), enrollment)
        .student(StudentId::random())
        .await
        .expect_err("missing student must fail");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
