//! PostgreSQL-backed `EnrollmentRepository` implementation using Diesel.
//!
//! The identity row and its profile row are written and deleted inside
//! one transaction, so an error partway leaves neither visible. Grade and
//! evaluation rows owned by a deleted student go with it through the
//! schema's cascades; a lecturer's teaching schedules block the delete at
//! the foreign key.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{EnrollmentRepository, EnrollmentRepositoryError};
use crate::domain::{
    ClassroomId, Identity, IdentityId, Lecturer, LecturerDraft, LecturerId, MajorId, Student,
    StudentDraft, StudentId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{LecturerRow, NewIdentityRow, NewLecturerRow, NewStudentRow, StudentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{identities, lecturers, students};

/// Diesel-backed implementation of the enrollment repository port.
#[derive(Clone)]
pub struct DieselEnrollmentRepository {
    pool: DbPool,
}

impl DieselEnrollmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> EnrollmentRepositoryError {
    map_pool_error(error, EnrollmentRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> EnrollmentRepositoryError {
    map_diesel_error(
        error,
        EnrollmentRepositoryError::query,
        EnrollmentRepositoryError::connection,
        EnrollmentRepositoryError::duplicate_key,
        EnrollmentRepositoryError::foreign_key,
    )
}

fn identity_to_row(identity: &Identity) -> NewIdentityRow<'_> {
    NewIdentityRow {
        id: *identity.id().as_uuid(),
        handle: identity.handle(),
        email: identity.email(),
        password_hash: identity.password_hash().as_str(),
        role: identity.role().as_str(),
        is_active: identity.is_active(),
    }
}

/// Convert a database row into a validated domain student.
pub(crate) fn row_to_student(row: StudentRow) -> Result<Student, EnrollmentRepositoryError> {
    Student::new(StudentDraft {
        id: StudentId::from_uuid(row.id),
        identity_id: IdentityId::from_uuid(row.identity_id),
        code: row.code,
        full_name: row.full_name,
        birth_date: row.birth_date,
        gender: row.gender,
        phone: row.phone,
        address: row.address,
        classroom_id: row.classroom_id.map(ClassroomId::from_uuid),
        major_id: row.major_id.map(MajorId::from_uuid),
        enrollment_year: row.enrollment_year,
    })
    .map_err(|err| EnrollmentRepositoryError::query(err.to_string()))
}

/// Convert a database row into a validated domain lecturer.
pub(crate) fn row_to_lecturer(row: LecturerRow) -> Result<Lecturer, EnrollmentRepositoryError> {
    Lecturer::new(LecturerDraft {
        id: LecturerId::from_uuid(row.id),
        identity_id: IdentityId::from_uuid(row.identity_id),
        code: row.code,
        full_name: row.full_name,
        department: row.department,
        expertise: row.expertise,
        phone: row.phone,
        degree: row.degree,
    })
    .map_err(|err| EnrollmentRepositoryError::query(err.to_string()))
}

#[async_trait]
impl EnrollmentRepository for DieselEnrollmentRepository {
    async fn create_student(
        &self,
        identity: &Identity,
        student: &Student,
    ) -> Result<(), EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let identity_row = identity_to_row(identity);
        let student_row = NewStudentRow {
            id: *student.id().as_uuid(),
            identity_id: *student.identity_id().as_uuid(),
            code: student.code(),
            full_name: student.full_name(),
            birth_date: student.birth_date(),
            gender: student.gender(),
            phone: student.phone(),
            address: student.address(),
            classroom_id: student.classroom_id().map(Uuid::from),
            major_id: student.major_id().map(Uuid::from),
            enrollment_year: student.enrollment_year(),
        };

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(identities::table)
                    .values(&identity_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(students::table)
                    .values(&student_row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel)
    }

    async fn create_lecturer(
        &self,
        identity: &Identity,
        lecturer: &Lecturer,
    ) -> Result<(), EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let identity_row = identity_to_row(identity);
        let lecturer_row = NewLecturerRow {
            id: *lecturer.id().as_uuid(),
            identity_id: *lecturer.identity_id().as_uuid(),
            code: lecturer.code(),
            full_name: lecturer.full_name(),
            department: lecturer.department(),
            expertise: lecturer.expertise(),
            phone: lecturer.phone(),
            degree: lecturer.degree(),
        };

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(identities::table)
                    .values(&identity_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(lecturers::table)
                    .values(&lecturer_row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel)
    }

    async fn find_student(
        &self,
        id: StudentId,
    ) -> Result<Option<Student>, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = students::table
            .filter(students::id.eq(id.as_uuid()))
            .select(StudentRow::as_select())
            .first::<StudentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_student).transpose()
    }

    async fn find_student_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Student>, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = students::table
            .filter(students::identity_id.eq(identity_id.as_uuid()))
            .select(StudentRow::as_select())
            .first::<StudentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_student).transpose()
    }

    async fn find_lecturer(
        &self,
        id: LecturerId,
    ) -> Result<Option<Lecturer>, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = lecturers::table
            .filter(lecturers::id.eq(id.as_uuid()))
            .select(LecturerRow::as_select())
            .first::<LecturerRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_lecturer).transpose()
    }

    async fn find_lecturer_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Lecturer>, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = lecturers::table
            .filter(lecturers::identity_id.eq(identity_id.as_uuid()))
            .select(LecturerRow::as_select())
            .first::<LecturerRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_lecturer).transpose()
    }

    async fn list_students_in_classroom(
        &self,
        classroom_id: ClassroomId,
    ) -> Result<Vec<Student>, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<StudentRow> = students::table
            .filter(students::classroom_id.eq(classroom_id.as_uuid()))
            .order(students::code.asc())
            .select(StudentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_student).collect()
    }

    async fn delete_student(&self, id: StudentId) -> Result<bool, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let student_id = *id.as_uuid();

        conn.transaction(|conn| {
            async move {
                let identity_id: Option<Uuid> = students::table
                    .filter(students::id.eq(student_id))
                    .select(students::identity_id)
                    .first(conn)
                    .await
                    .optional()?;

                let Some(identity_id) = identity_id else {
                    return Ok(false);
                };

                diesel::delete(students::table.filter(students::id.eq(student_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(identities::table.filter(identities::id.eq(identity_id)))
                    .execute(conn)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel)
    }

    async fn delete_lecturer(&self, id: LecturerId) -> Result<bool, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let lecturer_id = *id.as_uuid();

        conn.transaction(|conn| {
            async move {
                let identity_id: Option<Uuid> = lecturers::table
                    .filter(lecturers::id.eq(lecturer_id))
                    .select(lecturers::identity_id)
                    .first(conn)
                    .await
                    .optional()?;

                let Some(identity_id) = identity_id else {
                    return Ok(false);
                };

                diesel::delete(lecturers::table.filter(lecturers::id.eq(lecturer_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(identities::table.filter(identities::id.eq(identity_id)))
                    .execute(conn)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion.
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_student_row() -> StudentRow {
        StudentRow {
            id: Uuid::new_v4(),
            identity_id: Uuid::new_v4(),
            code: "SV2024001".to_owned(),
            full_name: "Nguyen Van A".to_owned(),
            birth_date: None,
            gender: Some("Nam".to_owned()),
            phone: None,
            address: None,
            classroom_id: Some(Uuid::new_v4()),
            major_id: None,
            enrollment_year: Some(2022),
        }
    }

    #[rstest]
    fn valid_student_rows_convert(valid_student_row: StudentRow) {
        let student = row_to_student(valid_student_row).expect("valid row converts");
        assert_eq!(student.code(), "SV2024001");
        assert!(student.classroom_id().is_some());
    }

    #[rstest]
    fn corrupted_student_rows_are_rejected(mut valid_student_row: StudentRow) {
        valid_student_row.code = "  ".to_owned();
        let err = row_to_student(valid_student_row).expect_err("blank code fails");
        assert!(matches!(err, EnrollmentRepositoryError::Query { .. }));
    }

    #[rstest]
    fn unique_violations_map_to_duplicate_key() {
        let err = map_diesel(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("identities_handle_key".to_owned()),
        ));
        assert!(matches!(err, EnrollmentRepositoryError::DuplicateKey { .. }));
        assert!(err.to_string().contains("identities_handle_key"));
    }

    #[rstest]
    fn foreign_key_violations_map_to_foreign_key() {
        let err = map_diesel(DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("schedules_lecturer_id_fkey".to_owned()),
        ));
        assert!(matches!(err, EnrollmentRepositoryError::ForeignKey { .. }));
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool(PoolError::checkout("connection refused"));
        assert!(matches!(err, EnrollmentRepositoryError::Connection { .. }));
    }
}
