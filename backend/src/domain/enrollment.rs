//! Student and lecturer profiles linked 1:1 to identities.
//!
//! A profile never exists without its owning identity; the two are created
//! and deleted together by the enrollment service. Optional classroom and
//! major references are true optionals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::id::{ClassroomId, IdentityId, LecturerId, MajorId, StudentId};

/// Maximum allowed length for a profile code.
pub const PROFILE_CODE_MAX: usize = 20;
/// Maximum allowed length for a full name.
pub const FULL_NAME_MAX: usize = 100;
/// Earliest plausible enrollment year.
pub const ENROLLMENT_YEAR_MIN: i32 = 1950;
/// Latest plausible enrollment year.
pub const ENROLLMENT_YEAR_MAX: i32 = 2100;

/// Validation errors raised by the profile constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrollmentValidationError {
    /// Profile code was blank once trimmed.
    #[error("profile code must not be empty")]
    EmptyCode,
    /// Profile code exceeds the storage width.
    #[error("profile code must be at most {max} characters")]
    CodeTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Full name was blank once trimmed.
    #[error("full name must not be empty")]
    EmptyFullName,
    /// Full name exceeds the storage width.
    #[error("full name must be at most {max} characters")]
    FullNameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Enrollment year is not plausible.
    #[error("enrollment year must be between {min} and {max}")]
    EnrollmentYearOutOfRange {
        /// Earliest accepted year.
        min: i32,
        /// Latest accepted year.
        max: i32,
    },
}

fn validated_code(code: String) -> Result<String, EnrollmentValidationError> {
    let code = code.trim().to_owned();
    if code.is_empty() {
        return Err(EnrollmentValidationError::EmptyCode);
    }
    if code.chars().count() > PROFILE_CODE_MAX {
        return Err(EnrollmentValidationError::CodeTooLong {
            max: PROFILE_CODE_MAX,
        });
    }
    Ok(code)
}

fn validated_full_name(name: String) -> Result<String, EnrollmentValidationError> {
    let name = name.trim().to_owned();
    if name.is_empty() {
        return Err(EnrollmentValidationError::EmptyFullName);
    }
    if name.chars().count() > FULL_NAME_MAX {
        return Err(EnrollmentValidationError::FullNameTooLong { max: FULL_NAME_MAX });
    }
    Ok(name)
}

/// Input for building a [`Student`].
#[derive(Debug, Clone)]
pub struct StudentDraft {
    /// Primary key.
    pub id: StudentId,
    /// Owning identity.
    pub identity_id: IdentityId,
    /// Unique student code.
    pub code: String,
    /// Full display name.
    pub full_name: String,
    /// Birth date, if recorded.
    pub birth_date: Option<NaiveDate>,
    /// Gender label, if recorded.
    pub gender: Option<String>,
    /// Phone number, if recorded.
    pub phone: Option<String>,
    /// Postal address, if recorded.
    pub address: Option<String>,
    /// Classroom the student belongs to, if assigned.
    pub classroom_id: Option<ClassroomId>,
    /// Major the student follows, if chosen.
    pub major_id: Option<MajorId>,
    /// Year the student enrolled, if recorded.
    pub enrollment_year: Option<i32>,
}

/// A student profile owned by exactly one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    id: StudentId,
    identity_id: IdentityId,
    code: String,
    full_name: String,
    birth_date: Option<NaiveDate>,
    gender: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    classroom_id: Option<ClassroomId>,
    major_id: Option<MajorId>,
    enrollment_year: Option<i32>,
}

impl Student {
    /// Build a student profile from validated components.
    pub fn new(draft: StudentDraft) -> Result<Self, EnrollmentValidationError> {
        if let Some(year) = draft.enrollment_year {
            if !(ENROLLMENT_YEAR_MIN..=ENROLLMENT_YEAR_MAX).contains(&year) {
                return Err(EnrollmentValidationError::EnrollmentYearOutOfRange {
                    min: ENROLLMENT_YEAR_MIN,
                    max: ENROLLMENT_YEAR_MAX,
                });
            }
        }
        Ok(Self {
            id: draft.id,
            identity_id: draft.identity_id,
            code: validated_code(draft.code)?,
            full_name: validated_full_name(draft.full_name)?,
            birth_date: draft.birth_date,
            gender: draft.gender,
            phone: draft.phone,
            address: draft.address,
            classroom_id: draft.classroom_id,
            major_id: draft.major_id,
            enrollment_year: draft.enrollment_year,
        })
    }

    /// Primary key.
    pub const fn id(&self) -> StudentId {
        self.id
    }

    /// Owning identity.
    pub const fn identity_id(&self) -> IdentityId {
        self.identity_id
    }

    /// Unique student code.
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Full display name.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Birth date, if recorded.
    pub const fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    /// Gender label, if recorded.
    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    /// Phone number, if recorded.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Postal address, if recorded.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Classroom the student belongs to, if assigned.
    pub const fn classroom_id(&self) -> Option<ClassroomId> {
        self.classroom_id
    }

    /// Major the student follows, if chosen.
    pub const fn major_id(&self) -> Option<MajorId> {
        self.major_id
    }

    /// Year the student enrolled, if recorded.
    pub const fn enrollment_year(&self) -> Option<i32> {
        self.enrollment_year
    }
}

/// Input for building a [`Lecturer`].
#[derive(Debug, Clone)]
pub struct LecturerDraft {
    /// Primary key.
    pub id: LecturerId,
    /// Owning identity.
    pub identity_id: IdentityId,
    /// Unique lecturer code.
    pub code: String,
    /// Full display name.
    pub full_name: String,
    /// Department or faculty, if recorded.
    pub department: Option<String>,
    /// Area of expertise, if recorded.
    pub expertise: Option<String>,
    /// Phone number, if recorded.
    pub phone: Option<String>,
    /// Academic degree label, if recorded.
    pub degree: Option<String>,
}

/// A lecturer profile owned by exactly one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecturer {
    id: LecturerId,
    identity_id: IdentityId,
    code: String,
    full_name: String,
    department: Option<String>,
    expertise: Option<String>,
    phone: Option<String>,
    degree: Option<String>,
}

impl Lecturer {
    /// Build a lecturer profile from validated components.
    pub fn new(draft: LecturerDraft) -> Result<Self, EnrollmentValidationError> {
        Ok(Self {
            id: draft.id,
            identity_id: draft.identity_id,
            code: validated_code(draft.code)?,
            full_name: validated_full_name(draft.full_name)?,
            department: draft.department,
            expertise: draft.expertise,
            phone: draft.phone,
            degree: draft.degree,
        })
    }

    /// Primary key.
    pub const fn id(&self) -> LecturerId {
        self.id
    }

    /// Owning identity.
    pub const fn identity_id(&self) -> IdentityId {
        self.identity_id
    }

    /// Unique lecturer code.
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Full display name.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Department or faculty, if recorded.
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// Area of expertise, if recorded.
    pub fn expertise(&self) -> Option<&str> {
        self.expertise.as_deref()
    }

    /// Phone number, if recorded.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Academic degree label, if recorded.
    pub fn degree(&self) -> Option<&str> {
        self.degree.as_deref()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    fn student_draft() -> StudentDraft {
        StudentDraft {
            id: StudentId::random(),
            identity_id: IdentityId::random(),
            code: "SV2024001".to_owned(),
            full_name: "Nguyen Van A".to_owned(),
            birth_date: NaiveDate::from_ymd_opt(2004, 5, 17),
            gender: Some("Nam".to_owned()),
            phone: None,
            address: None,
            classroom_id: None,
            major_id: None,
            enrollment_year: Some(2022),
        }
    }

    #[test]
    fn student_code_and_name_are_trimmed() {
        let mut draft = student_draft();
        draft.code = " SV2024001 ".to_owned();
        draft.full_name = " Nguyen Van A ".to_owned();
        let student = Student::new(draft).expect("valid student");
        assert_eq!(student.code(), "SV2024001");
        assert_eq!(student.full_name(), "Nguyen Van A");
    }

    #[rstest]
    #[case(1899)]
    #[case(2101)]
    fn implausible_enrollment_years_are_rejected(#[case] year: i32) {
        let mut draft = student_draft();
        draft.enrollment_year = Some(year);
        let err = Student::new(draft).expect_err("implausible year");
        assert_eq!(
            err,
            EnrollmentValidationError::EnrollmentYearOutOfRange {
                min: ENROLLMENT_YEAR_MIN,
                max: ENROLLMENT_YEAR_MAX
            }
        );
    }

    #[test]
    fn blank_profile_codes_are_rejected() {
        let mut draft = student_draft();
        draft.code = "  ".to_owned();
        assert_eq!(
            Student::new(draft).expect_err("blank code"),
            EnrollmentValidationError::EmptyCode
        );
    }

    #[test]
    fn lecturer_profile_keeps_optional_fields() {
        let lecturer = Lecturer::new(LecturerDraft {
            id: LecturerId::random(),
            identity_id: IdentityId::random(),
            code: "GV012".to_owned(),
            full_name: "Tran Thi B".to_owned(),
            department: Some("Computer Science".to_owned()),
            expertise: Some("Distributed systems".to_owned()),
            phone: None,
            degree: Some("TS".to_owned()),
        })
        .expect("valid lecturer");
        assert_eq!(lecturer.department(), Some("Computer Science"));
        assert_eq!(lecturer.degree(), Some("TS"));
        assert_eq!(lecturer.phone(), None);
    }
}
