//! Domain entities, validation, and services.
//!
//! Purpose: define the strongly typed academic records model — identities
//! and capabilities, the academic directory, enrollment, grades, GPA
//! aggregation, lecturer evaluations, and material metadata — together
//! with the services implementing each operation against the ports in
//! [`ports`]. Types are immutable once constructed; invariants live in
//! the constructors.

pub mod auth;
pub mod auth_service;
pub mod directory;
pub mod directory_service;
pub mod enrollment;
pub mod enrollment_service;
pub mod error;
pub mod evaluation;
pub mod evaluation_service;
pub mod grade_service;
pub mod grades;
pub mod id;
pub mod identity;
pub mod material;
pub mod material_service;
pub mod ports;
pub mod role;
pub mod semester;
pub mod transcript_service;

pub use self::auth::{CredentialError, LoginCredentials, PasswordHash};
pub use self::auth_service::AuthService;
pub use self::directory::{
    Classroom, ClassroomDraft, Credits, DirectoryValidationError, Major, MajorDraft, Schedule,
    ScheduleDraft, Subject, SubjectDraft,
};
pub use self::directory_service::{
    ClassroomFields, DirectoryService, MajorFields, ScheduleFields, SubjectFields,
};
pub use self::enrollment::{
    EnrollmentValidationError, Lecturer, LecturerDraft, Student, StudentDraft,
};
pub use self::enrollment_service::{EnrollmentService, NewLecturerAccount, NewStudentAccount};
pub use self::error::{Error, ErrorCode};
pub use self::evaluation::{
    Evaluation, EvaluationDraft, EvaluationValidationError, Rating, average_rating,
};
pub use self::evaluation_service::EvaluationService;
pub use self::grade_service::{GradeService, ScoreInput};
pub use self::grades::{Grade, GradeDraft, GradeValidationError, LetterGrade, ScoreBreakdown};
pub use self::id::{
    ClassroomId, EvaluationId, GradeId, IdentityId, LecturerId, MajorId, MaterialId, ScheduleId,
    StudentId, SubjectId,
};
pub use self::identity::{Identity, IdentityDraft, IdentityValidationError};
pub use self::material::{Material, MaterialDraft, MaterialValidationError, NewMaterial, StoredFile};
pub use self::material_service::MaterialService;
pub use self::role::{Capability, Role, UnknownRoleError, authorize};
pub use self::semester::{SemesterLabel, SemesterValidationError};
pub use self::transcript_service::{TranscriptService, TranscriptSummary};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
