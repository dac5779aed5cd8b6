//! PostgreSQL-backed `EvaluationRepository` implementation using Diesel.
//!
//! Inserts race on the (student_id, lecturer_id, subject_id, semester)
//! uniqueness constraint; the losing writer's violation is surfaced as a
//! duplicate-key error rather than being retried or swallowed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{EvaluationRepository, EvaluationRepositoryError};
use crate::domain::{
    Evaluation, EvaluationDraft, EvaluationId, LecturerId, Rating, SemesterLabel, StudentId,
    SubjectId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{EvaluationRow, NewEvaluationRow};
use super::pool::{DbPool, PoolError};
use super::schema::evaluations;

/// Diesel-backed implementation of the evaluation repository port.
#[derive(Clone)]
pub struct DieselEvaluationRepository {
    pool: DbPool,
}

impl DieselEvaluationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> EvaluationRepositoryError {
    map_pool_error(error, EvaluationRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> EvaluationRepositoryError {
    map_diesel_error(
        error,
        EvaluationRepositoryError::query,
        EvaluationRepositoryError::connection,
        EvaluationRepositoryError::duplicate_key,
        EvaluationRepositoryError::query,
    )
}

/// Convert a database row into a validated domain evaluation.
pub(crate) fn row_to_evaluation(
    row: EvaluationRow,
) -> Result<Evaluation, EvaluationRepositoryError> {
    let rating = Rating::try_new(row.rating).map_err(|err| {
        EvaluationRepositoryError::query(format!("corrupted rating in database: {err}"))
    })?;
    let semester = SemesterLabel::new(row.semester)
        .map_err(|err| EvaluationRepositoryError::query(format!("corrupted semester: {err}")))?;

    Ok(Evaluation::new(EvaluationDraft {
        id: EvaluationId::from_uuid(row.id),
        student_id: StudentId::from_uuid(row.student_id),
        lecturer_id: LecturerId::from_uuid(row.lecturer_id),
        subject_id: row.subject_id.map(SubjectId::from_uuid),
        rating,
        comment: row.comment,
        semester,
        is_anonymous: row.is_anonymous,
    }))
}

#[async_trait]
impl EvaluationRepository for DieselEvaluationRepository {
    async fn insert(&self, evaluation: &Evaluation) -> Result<(), EvaluationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewEvaluationRow {
            id: *evaluation.id().as_uuid(),
            student_id: *evaluation.student_id().as_uuid(),
            lecturer_id: *evaluation.lecturer_id().as_uuid(),
            subject_id: evaluation.subject_id().map(Uuid::from),
            rating: evaluation.rating().value(),
            comment: evaluation.comment(),
            semester: evaluation.semester().as_str(),
            is_anonymous: evaluation.is_anonymous(),
        };

        diesel::insert_into(evaluations::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn exists_for_key(
        &self,
        student_id: StudentId,
        lecturer_id: LecturerId,
        subject_id: Option<SubjectId>,
        semester: &SemesterLabel,
    ) -> Result<bool, EvaluationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let found = evaluations::table
            .filter(
                evaluations::student_id
                    .eq(student_id.as_uuid())
                    .and(evaluations::lecturer_id.eq(lecturer_id.as_uuid()))
                    .and(
                        evaluations::subject_id
                            .is_not_distinct_from(subject_id.map(Uuid::from)),
                    )
                    .and(evaluations::semester.eq(semester.as_str())),
            )
            .select(evaluations::id)
            .first::<Uuid>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(found.is_some())
    }

    async fn ratings_for_lecturer(
        &self,
        lecturer_id: LecturerId,
    ) -> Result<Vec<Rating>, EvaluationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let values: Vec<i16> = evaluations::table
            .filter(evaluations::lecturer_id.eq(lecturer_id.as_uuid()))
            .select(evaluations::rating)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        values
            .into_iter()
            .map(|value| {
                Rating::try_new(value).map_err(|err| {
                    EvaluationRepositoryError::query(format!(
                        "corrupted rating in database: {err}"
                    ))
                })
            })
            .collect()
    }

    async fn list_authored_by(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Evaluation>, EvaluationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<EvaluationRow> = evaluations::table
            .filter(evaluations::student_id.eq(student_id.as_uuid()))
            .order(evaluations::semester.desc())
            .select(EvaluationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_evaluation).collect()
    }
}
