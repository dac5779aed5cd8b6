//! PostgreSQL-backed `GradeRepository` implementation using Diesel.
//!
//! Upserts key on the (student_id, subject_id, semester) uniqueness
//! constraint, so a concurrent writer for the same triple updates the
//! existing row instead of creating a second one. Batch writes run inside
//! one transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{GradeRepository, GradeRepositoryError, TranscriptEntry};
use crate::domain::{
    Grade, GradeDraft, GradeId, ScoreBreakdown, SemesterLabel, StudentId, SubjectId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{GradeChangeset, GradeRow, NewGradeRow};
use super::pool::{DbPool, PoolError};
use super::schema::{grades, subjects};

/// Diesel-backed implementation of the grade repository port.
#[derive(Clone)]
pub struct DieselGradeRepository {
    pool: DbPool,
}

impl DieselGradeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> GradeRepositoryError {
    map_pool_error(error, GradeRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> GradeRepositoryError {
    map_diesel_error(
        error,
        GradeRepositoryError::query,
        GradeRepositoryError::connection,
        GradeRepositoryError::query,
        GradeRepositoryError::query,
    )
}

/// Convert a database row into a validated domain grade.
///
/// A null total marks a row that was never graded; the component columns
/// hold their zero defaults in that case and are not surfaced.
pub(crate) fn row_to_grade(row: GradeRow) -> Result<Grade, GradeRepositoryError> {
    let semester = SemesterLabel::new(row.semester)
        .map_err(|err| GradeRepositoryError::query(format!("corrupted semester: {err}")))?;
    let scores = if row.score_total.is_some() {
        Some(
            ScoreBreakdown::try_new(row.score_attendance, row.score_midterm, row.score_final)
                .map_err(|err| {
                    GradeRepositoryError::query(format!("corrupted scores in database: {err}"))
                })?,
        )
    } else {
        None
    };

    Grade::new(GradeDraft {
        id: GradeId::from_uuid(row.id),
        student_id: StudentId::from_uuid(row.student_id),
        subject_id: SubjectId::from_uuid(row.subject_id),
        semester,
        scores,
        note: row.note,
    })
    .map_err(|err| GradeRepositoryError::query(err.to_string()))
}

async fn upsert_on(
    conn: &mut AsyncPgConnection,
    grade: &Grade,
) -> Result<(), diesel::result::Error> {
    let scores = grade.scores();
    let new_row = NewGradeRow {
        id: *grade.id().as_uuid(),
        student_id: *grade.student_id().as_uuid(),
        subject_id: *grade.subject_id().as_uuid(),
        score_attendance: scores.map_or(0.0, ScoreBreakdown::attendance),
        score_midterm: scores.map_or(0.0, ScoreBreakdown::midterm),
        score_final: scores.map_or(0.0, ScoreBreakdown::final_exam),
        score_total: grade.total(),
        semester: grade.semester().as_str(),
        note: grade.note(),
    };
    let changeset = GradeChangeset {
        score_attendance: new_row.score_attendance,
        score_midterm: new_row.score_midterm,
        score_final: new_row.score_final,
        score_total: new_row.score_total,
        note: new_row.note,
    };

    diesel::insert_into(grades::table)
        .values(&new_row)
        .on_conflict((grades::student_id, grades::subject_id, grades::semester))
        .do_update()
        .set(&changeset)
        .execute(conn)
        .await
        .map(|_| ())
}

#[async_trait]
impl GradeRepository for DieselGradeRepository {
    async fn find_by_key(
        &self,
        student_id: StudentId,
        subject_id: SubjectId,
        semester: &SemesterLabel,
    ) -> Result<Option<Grade>, GradeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = grades::table
            .filter(
                grades::student_id
                    .eq(student_id.as_uuid())
                    .and(grades::subject_id.eq(subject_id.as_uuid()))
                    .and(grades::semester.eq(semester.as_str())),
            )
            .select(GradeRow::as_select())
            .first::<GradeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_grade).transpose()
    }

    async fn upsert(&self, grade: &Grade) -> Result<(), GradeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        upsert_on(&mut conn, grade).await.map_err(map_diesel)
    }

    async fn upsert_many(&self, grades_batch: &[Grade]) -> Result<(), GradeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        conn.transaction(|conn| {
            async move {
                for grade in grades_batch {
                    upsert_on(conn, grade).await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel)
    }

    async fn list_for_student<'a>(
        &self,
        student_id: StudentId,
        semester: Option<&'a SemesterLabel>,
    ) -> Result<Vec<Grade>, GradeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let mut query = grades::table
            .filter(grades::student_id.eq(student_id.as_uuid()))
            .into_boxed();
        if let Some(semester) = semester {
            query = query.filter(grades::semester.eq(semester.as_str()));
        }

        let rows: Vec<GradeRow> = query
            .order(grades::semester.desc())
            .select(GradeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_grade).collect()
    }

    async fn transcript_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<TranscriptEntry>, GradeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<(uuid::Uuid, i32, Option<f64>)> = grades::table
            .inner_join(subjects::table)
            .filter(grades::student_id.eq(student_id.as_uuid()))
            .select((subjects::id, subjects::credits, grades::score_total))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows
            .into_iter()
            .map(|(subject_id, credits, total)| TranscriptEntry {
                subject_id: SubjectId::from_uuid(subject_id),
                credits,
                total,
            })
            .collect())
    }
}
