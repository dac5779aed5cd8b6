//! GPA aggregation derived from the grade ledger on demand.
//!
//! Nothing here is persisted: every call reads the current grade/credit
//! pairs and folds them. Two separate figures come out of the ledger and
//! must not be confused: the credit-weighted GPA over every graded row,
//! and the credited-credit total counting only passing rows.

use std::sync::Arc;

use crate::domain::grades::round_to_2dp;
use crate::domain::ports::{
    EnrollmentRepository, EnrollmentRepositoryError, GradeRepository, GradeRepositoryError,
    TranscriptEntry,
};
use crate::domain::{DomainResult, Error, StudentId};

/// Totals at or above this value bank the subject's credits.
const PASSING_TOTAL: f64 = 4.0;

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

/// Credit-weighted mean of the graded totals, rounded to two decimals;
/// `0` when no graded row carries credits.
fn gpa_from(entries: &[TranscriptEntry]) -> f64 {
    let mut credited_total = 0.0;
    let mut credit_sum: i32 = 0;
    for entry in entries {
        if let Some(total) = entry.total {
            credited_total += total * f64::from(entry.credits);
            credit_sum += entry.credits;
        }
    }
    if credit_sum > 0 {
        round_to_2dp(credited_total / f64::from(credit_sum))
    } else {
        0.0
    }
}

/// Sum of credits over passing rows, for transcript display.
fn credited_credits_from(entries: &[TranscriptEntry]) -> i32 {
    entries
        .iter()
        .filter(|entry| entry.total.is_some_and(|total| total >= PASSING_TOTAL))
        .map(|entry| entry.credits)
        .sum()
}

/// Cumulative figures derived from a student's grade ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranscriptSummary {
    /// Credit-weighted GPA across all semesters.
    pub gpa: f64,
    /// Credits banked from passing grades.
    pub credited_credits: i32,
}

/// GPA aggregation service.
#[derive(Clone)]
pub struct TranscriptService<G, E> {
    grades: Arc<G>,
    enrollment: Arc<E>,
}

impl<G, E> TranscriptService<G, E> {
    /// Create a new service over the grade and enrollment repositories.
    pub fn new(grades: Arc<G>, enrollment: Arc<E>) -> Self {
        Self { grades, enrollment }
    }
}

impl<G, E> TranscriptService<G, E>
where
    G: GradeRepository,
    E: EnrollmentRepository,
{
    async fn entries_for(&self, student_id: StudentId) -> DomainResult<Vec<TranscriptEntry>> {
        self.enrollment
            .find_student(student_id)
            .await
            .map_err(map_enrollment_repo_error)?
            .ok_or_else(|| Error::not_found(format!("student {student_id} not found")))?;
        self.grades
            .transcript_for_student(student_id)
            .await
            .map_err(map_grade_repo_error)
    }

    /// Cumulative GPA: `round(Σ(total·credits) / Σcredits, 2)` over every
    /// graded row with a resolvable subject, `0` with none.
    pub async fn compute_gpa(&self, student_id: StudentId) -> DomainResult<f64> {
        Ok(gpa_from(&self.entries_for(student_id).await?))
    }

    /// Credits banked from passing grades (total at least 4.0).
    pub async fn credited_credits(&self, student_id: StudentId) -> DomainResult<i32> {
        Ok(credited_credits_from(&self.entries_for(student_id).await?))
    }

    /// Both transcript figures from one ledger read.
    pub async fn summary(&self, student_id: StudentId) -> DomainResult<TranscriptSummary> {
        let entries = self.entries_for(student_id).await?;
        Ok(TranscriptSummary {
            gpa: gpa_from(&entries),
            credited_credits: credited_credits_from(&entries),
        })
    }
}

#[cfg(test)]
#[path = "transcript_service_tests.rs"]
mod tests;
