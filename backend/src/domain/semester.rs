//! Semester labels partitioning grades, evaluations, and schedules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum allowed length for a semester label.
pub const SEMESTER_MAX: usize = 20;

/// Validation errors returned by [`SemesterLabel::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemesterValidationError {
    /// Label was blank once trimmed.
    #[error("semester label must not be empty")]
    Empty,
    /// Label exceeds the storage width.
    #[error("semester label must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Opaque academic-term key such as `HK2-2024`.
///
/// Labels partition grade and evaluation rows into terms; they are never
/// validated against a calendar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SemesterLabel(String);

impl SemesterLabel {
    /// Validate and construct a label from owned input.
    pub fn new(label: impl Into<String>) -> Result<Self, SemesterValidationError> {
        Self::from_owned(label.into())
    }

    fn from_owned(label: String) -> Result<Self, SemesterValidationError> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(SemesterValidationError::Empty);
        }
        if trimmed.chars().count() > SEMESTER_MAX {
            return Err(SemesterValidationError::TooLong { max: SEMESTER_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The label text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for SemesterLabel {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SemesterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SemesterLabel> for String {
    fn from(value: SemesterLabel) -> Self {
        value.0
    }
}

impl TryFrom<String> for SemesterLabel {
    type Error = SemesterValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}
