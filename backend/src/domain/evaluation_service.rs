//! Evaluation ledger operations: create-only ratings and aggregation.

use std::sync::Arc;

use crate::domain::evaluation::{Evaluation, EvaluationDraft, Rating, average_rating};
use crate::domain::ports::{
    EnrollmentRepository, EnrollmentRepositoryError, EvaluationRepository,
    EvaluationRepositoryError,
};
use crate::domain::{
    Capability, DomainResult, Error, EvaluationId, LecturerId, Role, SemesterLabel, StudentId,
    SubjectId,
};

const ALREADY_RECORDED: &str =
    "this lecturer has already been evaluated for this subject and semester";

fn map_evaluation_repo_error(error: EvaluationRepositoryError) -> Error {
    match error {
        EvaluationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("evaluation repository unavailable: {message}"))
        }
        EvaluationRepositoryError::Query { message } => {
            Error::internal(format!("evaluation repository error: {message}"))
        }
        EvaluationRepositoryError::DuplicateKey { .. } => Error::conflict(ALREADY_RECORDED),
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

/// Evaluation ledger service.
#[derive(Clone)]
pub struct EvaluationService<V, E> {
    evaluations: Arc<V>,
    enrollment: Arc<E>,
}

impl<V, E> EvaluationService<V, E> {
    /// Create a new service over the evaluation and enrollment
    /// repositories.
    pub fn new(evaluations: Arc<V>, enrollment: Arc<E>) -> Self {
        Self {
            evaluations,
            enrollment,
        }
    }
}

impl<V, E> EvaluationService<V, E>
where
    V: EvaluationRepository,
    E: EnrollmentRepository,
{
    /// Record a rating for a lecturer.
    ///
    /// The (student, lecturer, subject, semester) key is create-only: a
    /// second submission fails with a conflict and leaves the first row
    /// untouched. Concurrent submissions race on the storage constraint
    /// and the second writer loses.
    #[expect(clippy::too_many_arguments, reason = "operation carries the full evaluation key")]
    pub async fn record_evaluation(
        &self,
        capability: &Capability,
        student_id: StudentId,
        lecturer_id: LecturerId,
        subject_id: Option<SubjectId>,
        semester: &SemesterLabel,
        rating: i16,
        comment: Option<String>,
        is_anonymous: bool,
    ) -> DomainResult<Evaluation> {
        capability.require(Role::Student)?;
        let rating = Rating::try_new(rating).map_err(|err| Error::invalid_request(err.to_string()))?;

        self.enrollment
            .find_student(student_id)
            .await
            .map_err(map_enrollment_repo_error)?
            .ok_or_else(|| Error::not_found(format!("student {student_id} not found")))?;
        self.enrollment
            .find_lecturer(lecturer_id)
            .await
            .map_err(map_enrollment_repo_error)?
            .ok_or_else(|| Error::not_found(format!("lecturer {lecturer_id} not found")))?;

        let already_recorded = self
            .evaluations
            .exists_for_key(student_id, lecturer_id, subject_id, semester)
            .await
            .map_err(map_evaluation_repo_error)?;
        if already_recorded {
            return Err(Error::conflict(ALREADY_RECORDED));
        }

        let evaluation = Evaluation::new(EvaluationDraft {
            id: EvaluationId::random(),
            student_id,
            lecturer_id,
            subject_id,
            rating,
            comment,
            semester: semester.clone(),
            is_anonymous,
        });

        self.evaluations
            .insert(&evaluation)
            .await
            .map_err(map_evaluation_repo_error)?;
        Ok(evaluation)
    }

    /// Mean of a lecturer's ratings rounded to one decimal, `0` with
    /// none.
    pub async fn average_rating(&self, lecturer_id: LecturerId) -> DomainResult<f64> {
        self.enrollment
            .find_lecturer(lecturer_id)
            .await
            .map_err(map_enrollment_repo_error)?
            .ok_or_else(|| Error::not_found(format!("lecturer {lecturer_id} not found")))?;
        let ratings = self
            .evaluations
            .ratings_for_lecturer(lecturer_id)
            .await
            .map_err(map_evaluation_repo_error)?;
        Ok(average_rating(&ratings))
    }

    /// List the evaluations a student has authored.
    pub async fn evaluations_authored_by(
        &self,
        student_id: StudentId,
    ) -> DomainResult<Vec<Evaluation>> {
        self.evaluations
            .list_authored_by(student_id)
            .await
            .map_err(map_evaluation_repo_error)
    }
}

#[cfg(test)]
#[path = "evaluation_service_tests.rs"]
mod tests;
