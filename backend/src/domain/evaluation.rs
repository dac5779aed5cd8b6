//! Lecturer evaluations: immutable one-per-key ratings and their
//! aggregation.

use serde::{Deserialize, Serialize};

use crate::domain::id::{EvaluationId, LecturerId, StudentId, SubjectId};
use crate::domain::semester::SemesterLabel;

/// Smallest accepted rating.
pub const RATING_MIN: i16 = 1;
/// Largest accepted rating.
pub const RATING_MAX: i16 = 5;

/// Validation errors raised by the evaluation constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationValidationError {
    /// Rating fell outside `1..=5`.
    #[error("rating must be between {min} and {max}")]
    RatingOutOfRange {
        /// Smallest accepted rating.
        min: i16,
        /// Largest accepted rating.
        max: i16,
    },
}

/// A star rating constrained to `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Rating(i16);

impl Rating {
    /// Validate and wrap a rating.
    pub const fn try_new(value: i16) -> Result<Self, EvaluationValidationError> {
        if value < RATING_MIN || value > RATING_MAX {
            return Err(EvaluationValidationError::RatingOutOfRange {
                min: RATING_MIN,
                max: RATING_MAX,
            });
        }
        Ok(Self(value))
    }

    /// The rating as an integer.
    pub const fn value(self) -> i16 {
        self.0
    }
}

impl From<Rating> for i16 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl TryFrom<i16> for Rating {
    type Error = EvaluationValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

/// Mean of `ratings` rounded to one decimal place, `0` when empty.
pub fn average_rating(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: f64 = ratings.iter().map(|r| f64::from(r.value())).sum();
    let count = ratings.len() as u32;
    let mean = sum / f64::from(count);
    (mean * 10.0).round() / 10.0
}

/// Input for building an [`Evaluation`].
#[derive(Debug, Clone)]
pub struct EvaluationDraft {
    /// Primary key.
    pub id: EvaluationId,
    /// Authoring student.
    pub student_id: StudentId,
    /// Rated lecturer.
    pub lecturer_id: LecturerId,
    /// Subject context, if the rating is subject-specific.
    pub subject_id: Option<SubjectId>,
    /// Star rating.
    pub rating: Rating,
    /// Free-text comment.
    pub comment: Option<String>,
    /// Term the rating belongs to.
    pub semester: SemesterLabel,
    /// Whether the author is hidden from the lecturer.
    pub is_anonymous: bool,
}

/// One immutable rating per (student, lecturer, subject, semester).
///
/// ## Invariants
/// - At most one row exists per key quadruple; the storage constraint
///   serialises concurrent submissions and the second writer loses.
/// - Rows are create-only; there is no edit path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    id: EvaluationId,
    student_id: StudentId,
    lecturer_id: LecturerId,
    subject_id: Option<SubjectId>,
    rating: Rating,
    comment: Option<String>,
    semester: SemesterLabel,
    is_anonymous: bool,
}

impl Evaluation {
    /// Build an evaluation from validated components.
    pub fn new(draft: EvaluationDraft) -> Self {
        Self {
            id: draft.id,
            student_id: draft.student_id,
            lecturer_id: draft.lecturer_id,
            subject_id: draft.subject_id,
            rating: draft.rating,
            comment: draft.comment,
            semester: draft.semester,
            is_anonymous: draft.is_anonymous,
        }
    }

    /// Primary key.
    pub const fn id(&self) -> EvaluationId {
        self.id
    }

    /// Authoring student.
    pub const fn student_id(&self) -> StudentId {
        self.student_id
    }

    /// Rated lecturer.
    pub const fn lecturer_id(&self) -> LecturerId {
        self.lecturer_id
    }

    /// Subject context, if the rating is subject-specific.
    pub const fn subject_id(&self) -> Option<SubjectId> {
        self.subject_id
    }

    /// Star rating.
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Free-text comment.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Term the rating belongs to.
    pub const fn semester(&self) -> &SemesterLabel {
        &self.semester
    }

    /// Whether the author is hidden from the lecturer.
    pub const fn is_anonymous(&self) -> bool {
        self.is_anonymous
    }
}
