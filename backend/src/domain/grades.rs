//! Grade rows and the weighted-total and letter-band computations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::id::{GradeId, StudentId, SubjectId};
use crate::domain::semester::SemesterLabel;

/// Smallest accepted component score.
pub const SCORE_MIN: f64 = 0.0;
/// Largest accepted component score.
pub const SCORE_MAX: f64 = 10.0;
/// Maximum allowed length for a grade note.
pub const NOTE_MAX: usize = 200;

const ATTENDANCE_WEIGHT: f64 = 0.10;
const MIDTERM_WEIGHT: f64 = 0.30;
const FINAL_WEIGHT: f64 = 0.60;

/// Validation errors raised by the grade constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradeValidationError {
    /// A component score fell outside `0..=10`.
    #[error("{component} score must be between 0 and 10")]
    ScoreOutOfRange {
        /// The offending component.
        component: &'static str,
    },
    /// Note exceeds the storage width.
    #[error("note must be at most {max} characters")]
    NoteTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

fn validated_score(value: f64, component: &'static str) -> Result<f64, GradeValidationError> {
    if !value.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&value) {
        return Err(GradeValidationError::ScoreOutOfRange { component });
    }
    Ok(value)
}

pub(crate) fn round_to_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Attendance, midterm, and final component scores for one grade row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    attendance: f64,
    midterm: f64,
    final_exam: f64,
}

impl ScoreBreakdown {
    /// Validate and wrap the three component scores.
    pub fn try_new(
        attendance: f64,
        midterm: f64,
        final_exam: f64,
    ) -> Result<Self, GradeValidationError> {
        Ok(Self {
            attendance: validated_score(attendance, "attendance")?,
            midterm: validated_score(midterm, "midterm")?,
            final_exam: validated_score(final_exam, "final")?,
        })
    }

    /// Attendance component.
    pub const fn attendance(&self) -> f64 {
        self.attendance
    }

    /// Midterm component.
    pub const fn midterm(&self) -> f64 {
        self.midterm
    }

    /// Final-exam component.
    pub const fn final_exam(&self) -> f64 {
        self.final_exam
    }

    /// Weighted total: attendance 10%, midterm 30%, final 60%, rounded to
    /// two decimal places.
    pub fn weighted_total(&self) -> f64 {
        round_to_2dp(
            self.attendance * ATTENDANCE_WEIGHT
                + self.midterm * MIDTERM_WEIGHT
                + self.final_exam * FINAL_WEIGHT,
        )
    }
}

/// Letter band derived from a total score.
///
/// Bands are evaluated high to low and the first matching band wins:
/// `>= 8.5` A, `>= 7.0` B, `>= 5.5` C, `>= 4.0` D, below that F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    /// Total of 8.5 or above.
    A,
    /// Total of 7.0 or above.
    B,
    /// Total of 5.5 or above.
    C,
    /// Total of 4.0 or above.
    D,
    /// Total below 4.0.
    F,
}

impl LetterGrade {
    /// Classify an arbitrary score into its band.
    pub fn from_score(score: f64) -> Self {
        if score >= 8.5 {
            Self::A
        } else if score >= 7.0 {
            Self::B
        } else if score >= 5.5 {
            Self::C
        } else if score >= 4.0 {
            Self::D
        } else {
            Self::F
        }
    }

    /// The band as a transcript label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for building a [`Grade`].
#[derive(Debug, Clone)]
pub struct GradeDraft {
    /// Primary key.
    pub id: GradeId,
    /// Graded student.
    pub student_id: StudentId,
    /// Graded subject.
    pub subject_id: SubjectId,
    /// Term the grade belongs to.
    pub semester: SemesterLabel,
    /// Component scores; `None` for a row that was never graded.
    pub scores: Option<ScoreBreakdown>,
    /// Free-text note.
    pub note: Option<String>,
}

/// One grade row per (student, subject, semester).
///
/// ## Invariants
/// - At most one row exists per key triple; writes go through the upsert
///   path, never a blind insert.
/// - `total` is always the weighted total of `scores`, or `None` while no
///   scores were ever entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    id: GradeId,
    student_id: StudentId,
    subject_id: SubjectId,
    semester: SemesterLabel,
    scores: Option<ScoreBreakdown>,
    total: Option<f64>,
    note: Option<String>,
}

impl Grade {
    /// Build a grade row, deriving the total from the component scores.
    pub fn new(draft: GradeDraft) -> Result<Self, GradeValidationError> {
        if let Some(note) = &draft.note {
            if note.chars().count() > NOTE_MAX {
                return Err(GradeValidationError::NoteTooLong { max: NOTE_MAX });
            }
        }
        Ok(Self {
            id: draft.id,
            student_id: draft.student_id,
            subject_id: draft.subject_id,
            semester: draft.semester,
            total: draft.scores.as_ref().map(ScoreBreakdown::weighted_total),
            scores: draft.scores,
            note: draft.note,
        })
    }

    /// Primary key.
    pub const fn id(&self) -> GradeId {
        self.id
    }

    /// Graded student.
    pub const fn student_id(&self) -> StudentId {
        self.student_id
    }

    /// Graded subject.
    pub const fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    /// Term the grade belongs to.
    pub const fn semester(&self) -> &SemesterLabel {
        &self.semester
    }

    /// Component scores, if any were entered.
    pub const fn scores(&self) -> Option<&ScoreBreakdown> {
        self.scores.as_ref()
    }

    /// Weighted total, `None` while the row is ungraded.
    pub const fn total(&self) -> Option<f64> {
        self.total
    }

    /// Free-text note.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Letter band for the stored total, `None` while ungraded.
    pub fn letter(&self) -> Option<LetterGrade> {
        self.total.map(LetterGrade::from_score)
    }

    /// Transcript label: the letter band, or `-` for an ungraded row.
    pub fn letter_label(&self) -> &'static str {
        self.letter().map_or("-", LetterGrade::as_str)
    }
}
