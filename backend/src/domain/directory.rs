//! Academic directory reference data: majors, classrooms, subjects, and
//! teaching schedules.
//!
//! These entities carry no computation of their own but anchor the
//! foreign keys used by enrollment, grades, evaluations, and materials.
//! Optional references are true optionals; the sentinel "0 means
//! unselected" convention of form payloads never reaches this module.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::id::{ClassroomId, LecturerId, MajorId, ScheduleId, SubjectId};
use crate::domain::semester::SemesterLabel;

/// Maximum allowed length for directory codes.
pub const CODE_MAX: usize = 20;
/// Maximum allowed length for directory names.
pub const NAME_MAX: usize = 100;
/// Maximum allowed length for a classroom name or room label.
pub const ROOM_MAX: usize = 50;

/// Smallest accepted credit weight.
pub const CREDITS_MIN: i32 = 1;
/// Largest accepted credit weight.
pub const CREDITS_MAX: i32 = 10;

/// Theory hours assigned when a subject omits them.
pub const DEFAULT_THEORY_HOURS: i32 = 30;
/// Practice hours assigned when a subject omits them.
pub const DEFAULT_PRACTICE_HOURS: i32 = 15;

/// Validation errors raised by the directory constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryValidationError {
    /// Code was blank once trimmed.
    #[error("code must not be empty")]
    EmptyCode,
    /// Code exceeds the storage width.
    #[error("code must be at most {max} characters")]
    CodeTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Name was blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Name exceeds the storage width.
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Credit weight falls outside the accepted band.
    #[error("credits must be between {min} and {max}")]
    CreditsOutOfRange {
        /// Smallest accepted weight.
        min: i32,
        /// Largest accepted weight.
        max: i32,
    },
    /// Hour counts must not be negative.
    #[error("hour counts must not be negative")]
    NegativeHours,
    /// Room label was blank once trimmed.
    #[error("room label must not be empty")]
    EmptyRoom,
    /// A schedule slot must end after it starts.
    #[error("end time must be after start time")]
    EndNotAfterStart,
    /// An optional date range must be ordered.
    #[error("end date must not precede start date")]
    DateRangeInverted,
}

fn validated_code(code: String) -> Result<String, DirectoryValidationError> {
    let code = code.trim().to_owned();
    if code.is_empty() {
        return Err(DirectoryValidationError::EmptyCode);
    }
    if code.chars().count() > CODE_MAX {
        return Err(DirectoryValidationError::CodeTooLong { max: CODE_MAX });
    }
    Ok(code)
}

fn validated_name(name: String, max: usize) -> Result<String, DirectoryValidationError> {
    let name = name.trim().to_owned();
    if name.is_empty() {
        return Err(DirectoryValidationError::EmptyName);
    }
    if name.chars().count() > max {
        return Err(DirectoryValidationError::NameTooLong { max });
    }
    Ok(name)
}

/// Input for building a [`Major`].
#[derive(Debug, Clone)]
pub struct MajorDraft {
    /// Primary key.
    pub id: MajorId,
    /// Unique major code.
    pub code: String,
    /// Major name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
}

/// A field of study. Referenced by classrooms and students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Major {
    id: MajorId,
    code: String,
    name: String,
    description: Option<String>,
}

impl Major {
    /// Build a major from validated components.
    pub fn new(draft: MajorDraft) -> Result<Self, DirectoryValidationError> {
        Ok(Self {
            id: draft.id,
            code: validated_code(draft.code)?,
            name: validated_name(draft.name, NAME_MAX)?,
            description: draft.description,
        })
    }

    /// Primary key.
    pub const fn id(&self) -> MajorId {
        self.id
    }

    /// Unique major code.
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Major name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Free-text description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Input for building a [`Classroom`].
#[derive(Debug, Clone)]
pub struct ClassroomDraft {
    /// Primary key.
    pub id: ClassroomId,
    /// Unique classroom name.
    pub name: String,
    /// Major the classroom belongs to, if any.
    pub major_id: Option<MajorId>,
    /// Advising lecturer, if assigned.
    pub advisor_id: Option<LecturerId>,
    /// Academic-year label such as `2020-2024`.
    pub academic_year: Option<String>,
}

/// An administrative class grouping students.
///
/// Deleting a classroom leaves enrolled students without a classroom
/// reference rather than cascading to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    id: ClassroomId,
    name: String,
    major_id: Option<MajorId>,
    advisor_id: Option<LecturerId>,
    academic_year: Option<String>,
}

impl Classroom {
    /// Build a classroom from validated components.
    pub fn new(draft: ClassroomDraft) -> Result<Self, DirectoryValidationError> {
        Ok(Self {
            id: draft.id,
            name: validated_name(draft.name, ROOM_MAX)?,
            major_id: draft.major_id,
            advisor_id: draft.advisor_id,
            academic_year: draft.academic_year,
        })
    }

    /// Primary key.
    pub const fn id(&self) -> ClassroomId {
        self.id
    }

    /// Unique classroom name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Major the classroom belongs to, if any.
    pub const fn major_id(&self) -> Option<MajorId> {
        self.major_id
    }

    /// Advising lecturer, if assigned.
    pub const fn advisor_id(&self) -> Option<LecturerId> {
        self.advisor_id
    }

    /// Academic-year label.
    pub fn academic_year(&self) -> Option<&str> {
        self.academic_year.as_deref()
    }
}

/// Credit weight of a subject, constrained to `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Credits(i32);

impl Credits {
    /// Validate and wrap a credit weight.
    pub const fn try_new(value: i32) -> Result<Self, DirectoryValidationError> {
        if value < CREDITS_MIN || value > CREDITS_MAX {
            return Err(DirectoryValidationError::CreditsOutOfRange {
                min: CREDITS_MIN,
                max: CREDITS_MAX,
            });
        }
        Ok(Self(value))
    }

    /// The weight as an integer.
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl From<Credits> for i32 {
    fn from(value: Credits) -> Self {
        value.0
    }
}

impl TryFrom<i32> for Credits {
    type Error = DirectoryValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

/// Input for building a [`Subject`].
#[derive(Debug, Clone)]
pub struct SubjectDraft {
    /// Primary key.
    pub id: SubjectId,
    /// Unique subject code.
    pub code: String,
    /// Subject name.
    pub name: String,
    /// Credit weight.
    pub credits: Credits,
    /// Theory hour count; defaults to [`DEFAULT_THEORY_HOURS`].
    pub theory_hours: Option<i32>,
    /// Practice hour count; defaults to [`DEFAULT_PRACTICE_HOURS`].
    pub practice_hours: Option<i32>,
    /// Free-text description.
    pub description: Option<String>,
}

/// A taught subject with a credit weight feeding GPA aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    id: SubjectId,
    code: String,
    name: String,
    credits: Credits,
    theory_hours: i32,
    practice_hours: i32,
    description: Option<String>,
}

impl Subject {
    /// Build a subject from validated components.
    pub fn new(draft: SubjectDraft) -> Result<Self, DirectoryValidationError> {
        let theory_hours = draft.theory_hours.unwrap_or(DEFAULT_THEORY_HOURS);
        let practice_hours = draft.practice_hours.unwrap_or(DEFAULT_PRACTICE_HOURS);
        if theory_hours < 0 || practice_hours < 0 {
            return Err(DirectoryValidationError::NegativeHours);
        }
        Ok(Self {
            id: draft.id,
            code: validated_code(draft.code)?,
            name: validated_name(draft.name, NAME_MAX)?,
            credits: draft.credits,
            theory_hours,
            practice_hours,
            description: draft.description,
        })
    }

    /// Primary key.
    pub const fn id(&self) -> SubjectId {
        self.id
    }

    /// Unique subject code.
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Subject name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Credit weight.
    pub const fn credits(&self) -> Credits {
        self.credits
    }

    /// Theory hour count.
    pub const fn theory_hours(&self) -> i32 {
        self.theory_hours
    }

    /// Practice hour count.
    pub const fn practice_hours(&self) -> i32 {
        self.practice_hours
    }

    /// Free-text description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Input for building a [`Schedule`].
#[derive(Debug, Clone)]
pub struct ScheduleDraft {
    /// Primary key.
    pub id: ScheduleId,
    /// Taught subject.
    pub subject_id: SubjectId,
    /// Teaching lecturer.
    pub lecturer_id: LecturerId,
    /// Attending classroom.
    pub classroom_id: ClassroomId,
    /// Room label such as `A101`.
    pub room: String,
    /// Day the slot repeats on.
    pub day_of_week: Weekday,
    /// Slot start.
    pub start_time: NaiveTime,
    /// Slot end.
    pub end_time: NaiveTime,
    /// Term the slot belongs to.
    pub semester: SemesterLabel,
    /// First teaching day, if bounded.
    pub start_date: Option<NaiveDate>,
    /// Last teaching day, if bounded.
    pub end_date: Option<NaiveDate>,
}

/// A weekly teaching slot.
///
/// Slots are stored as entered; nothing checks a lecturer or room for
/// overlapping slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    id: ScheduleId,
    subject_id: SubjectId,
    lecturer_id: LecturerId,
    classroom_id: ClassroomId,
    room: String,
    day_of_week: Weekday,
    start_time: NaiveTime,
    end_time: NaiveTime,
    semester: SemesterLabel,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl Schedule {
    /// Build a schedule slot from validated components.
    pub fn new(draft: ScheduleDraft) -> Result<Self, DirectoryValidationError> {
        let room = draft.room.trim().to_owned();
        if room.is_empty() {
            return Err(DirectoryValidationError::EmptyRoom);
        }
        if room.chars().count() > ROOM_MAX {
            return Err(DirectoryValidationError::NameTooLong { max: ROOM_MAX });
        }
        if draft.end_time <= draft.start_time {
            return Err(DirectoryValidationError::EndNotAfterStart);
        }
        if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
            if end < start {
                return Err(DirectoryValidationError::DateRangeInverted);
            }
        }
        Ok(Self {
            id: draft.id,
            subject_id: draft.subject_id,
            lecturer_id: draft.lecturer_id,
            classroom_id: draft.classroom_id,
            room,
            day_of_week: draft.day_of_week,
            start_time: draft.start_time,
            end_time: draft.end_time,
            semester: draft.semester,
            start_date: draft.start_date,
            end_date: draft.end_date,
        })
    }

    /// Primary key.
    pub const fn id(&self) -> ScheduleId {
        self.id
    }

    /// Taught subject.
    pub const fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    /// Teaching lecturer.
    pub const fn lecturer_id(&self) -> LecturerId {
        self.lecturer_id
    }

    /// Attending classroom.
    pub const fn classroom_id(&self) -> ClassroomId {
        self.classroom_id
    }

    /// Room label.
    pub fn room(&self) -> &str {
        self.room.as_str()
    }

    /// Day the slot repeats on.
    pub const fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    /// Slot start.
    pub const fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    /// Slot end.
    pub const fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    /// Term the slot belongs to.
    pub const fn semester(&self) -> &SemesterLabel {
        &self.semester
    }

    /// First teaching day, if bounded.
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Last teaching day, if bounded.
    pub const fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}
