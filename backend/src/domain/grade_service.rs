//! Grade ledger operations: keyed upserts and reads.
//!
//! The upsert path always resolves existing-row-or-new before writing, so
//! the (student, subject, semester) uniqueness invariant can only be
//! violated by bypassing this service; the storage constraint backstops
//! that too.

use std::sync::Arc;

use crate::domain::grades::{Grade, GradeDraft, ScoreBreakdown};
use crate::domain::ports::{
    DirectoryRepository, DirectoryRepositoryError, EnrollmentRepository,
    EnrollmentRepositoryError, GradeRepository, GradeRepositoryError,
};
use crate::domain::{
    Capability, ClassroomId, DomainResult, Error, GradeId, Role, SemesterLabel, StudentId,
    SubjectId,
};

fn map_grade_repo_error(error: GradeRepositoryError) -> Error {
    match error {
        GradeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("grade repository unavailable: {message}"))
        }
        GradeRepositoryError::Query { message } => {
            Error::internal(format!("grade repository error: {message}"))
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

fn map_directory_repo_error(error: DirectoryRepositoryError) -> Error {
    match error {
        DirectoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("directory repository unavailable: {message}"))
        }
        other => Error::internal(format!("directory repository error: {other}")),
    }
}

/// Component scores submitted for one student; absent components weigh in
/// as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInput {
    /// Attendance component, if entered.
    pub attendance: Option<f64>,
    /// Midterm component, if entered.
    pub midterm: Option<f64>,
    /// Final-exam component, if entered.
    pub final_exam: Option<f64>,
}

impl ScoreInput {
    fn breakdown(self) -> DomainResult<ScoreBreakdown> {
        ScoreBreakdown::try_new(
            self.attendance.unwrap_or(0.0),
            self.midterm.unwrap_or(0.0),
            self.final_exam.unwrap_or(0.0),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

/// Grade ledger service.
#[derive(Clone)]
pub struct GradeService<G, E, D> {
    grades: Arc<G>,
    enrollment: Arc<E>,
    directory: Arc<D>,
}

impl<G, E, D> GradeService<G, E, D> {
    /// Create a new service over the grade, enrollment, and directory
    /// repositories.
    pub fn new(grades: Arc<G>, enrollment: Arc<E>, directory: Arc<D>) -> Self {
        Self {
            grades,
            enrollment,
            directory,
        }
    }
}

impl<G, E, D> GradeService<G, E, D>
where
    G: GradeRepository,
    E: EnrollmentRepository,
    D: DirectoryRepository,
{
    async fn ensure_student_exists(&self, student_id: StudentId) -> DomainResult<()> {
        self.enrollment
            .find_student(student_id)
            .await
            .map_err(map_enrollment_repo_error)?
            .ok_or_else(|| Error::not_found(format!("student {student_id} not found")))?;
        Ok(())
    }

    async fn ensure_subject_exists(&self, subject_id: SubjectId) -> DomainResult<()> {
        self.directory
            .find_subject(subject_id)
            .await
            .map_err(map_directory_repo_error)?
            .ok_or_else(|| Error::not_found(format!("subject {subject_id} not found")))?;
        Ok(())
    }

    /// Resolve the existing row for the key triple and build the updated
    /// grade, keeping the row id and note stable across upserts.
    async fn resolve_grade(
        &self,
        student_id: StudentId,
        subject_id: SubjectId,
        semester: &SemesterLabel,
        scores: ScoreInput,
        note: Option<String>,
    ) -> DomainResult<Grade> {
        let breakdown = scores.breakdown()?;
        let existing = self
            .grades
            .find_by_key(student_id, subject_id, semester)
            .await
            .map_err(map_grade_repo_error)?;

        let (id, kept_note) = existing.map_or_else(
            || (GradeId::random(), None),
            |grade| (grade.id(), grade.note().map(ToOwned::to_owned)),
        );

        Grade::new(GradeDraft {
            id,
            student_id,
            subject_id,
            semester: semester.clone(),
            scores: Some(breakdown),
            note: note.or(kept_note),
        })
        .map_err(|err| Error::invalid_request(err.to_string()))
    }

    /// Upsert the grade row for a key triple, recomputing the weighted
    /// total. Repeated calls overwrite rather than accumulate.
    pub async fn upsert_grade(
        &self,
        capability: &Capability,
        student_id: StudentId,
        subject_id: SubjectId,
        semester: &SemesterLabel,
        scores: ScoreInput,
        note: Option<String>,
    ) -> DomainResult<Grade> {
        capability.require(Role::Lecturer)?;
        self.ensure_student_exists(student_id).await?;
        self.ensure_subject_exists(subject_id).await?;

        let grade = self
            .resolve_grade(student_id, subject_id, semester, scores, note)
            .await?;
        self.grades
            .upsert(&grade)
            .await
            .map_err(map_grade_repo_error)?;
        Ok(grade)
    }

    /// Upsert scores for every listed student of a classroom in one
    /// transaction; an error partway leaves no row from the batch.
    pub async fn record_class_grades(
        &self,
        capability: &Capability,
        classroom_id: ClassroomId,
        subject_id: SubjectId,
        semester: &SemesterLabel,
        entries: &[(StudentId, ScoreInput)],
    ) -> DomainResult<usize> {
        capability.require(Role::Lecturer)?;
        self.ensure_subject_exists(subject_id).await?;

        let students = self
            .enrollment
            .list_students_in_classroom(classroom_id)
            .await
            .map_err(map_enrollment_repo_error)?;

        let mut batch = Vec::with_capacity(entries.len());
        for (student_id, scores) in entries {
            if !students.iter().any(|student| student.id() == *student_id) {
                return Err(Error::invalid_request(format!(
                    "student {student_id} is not enrolled in classroom {classroom_id}"
                )));
            }
            let grade = self
                .resolve_grade(*student_id, subject_id, semester, *scores, None)
                .await?;
            batch.push(grade);
        }

        self.grades
            .upsert_many(&batch)
            .await
            .map_err(map_grade_repo_error)?;
        Ok(batch.len())
    }

    /// List a student's grades, optionally narrowed to one semester.
    pub async fn grades_for_student(
        &self,
        student_id: StudentId,
        semester: Option<&SemesterLabel>,
    ) -> DomainResult<Vec<Grade>> {
        self.ensure_student_exists(student_id).await?;
        self.grades
            .list_for_student(student_id, semester)
            .await
            .map_err(map_grade_repo_error)
    }
}

#[cfg(test)]
#[path = "grade_service_tests.rs"]
mod tests;
