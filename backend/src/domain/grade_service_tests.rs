//! Tests for the grade ledger service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockDirectoryRepository, MockEnrollmentRepository, MockGradeRepository,
};
use crate::domain::{
    Credits, ErrorCode, Identity, IdentityDraft, IdentityId, PasswordHash, Student, StudentDraft,
    Subject, SubjectDraft, authorize,
};

fn capability_for(role: Role) -> Capability {
    let identity = Identity::new(IdentityDraft {
        id: IdentityId::random(),
        handle: "tranthib".to_owned(),
        email: "tranthib@example.edu".to_owned(),
        password_hash: PasswordHash::derive("hunter22"),
        role,
        is_active: true,
    })
    .expect("valid identity");
    authorize(&identity, role).expect("matching role authorises")
}

#[fixture]
fn lecturer() -> Capability {
    capability_for(Role::Lecturer)
}

fn semester() -> SemesterLabel {
    SemesterLabel::new("HK2-2024").expect("valid semester")
}

fn student_with_id(id: StudentId, classroom_id: Option<ClassroomId>) -> Student {
    Student::new(StudentDraft {
        id,
        identity_id: IdentityId::random(),
        code: "SV2024001".to_owned(),
        full_name: "Nguyen Van A".to_owned(),
        birth_date: None,
        gender: None,
        phone: None,
        address: None,
        classroom_id,
        major_id: None,
        enrollment_year: None,
    })
    .expect("valid student")
}

fn subject_with_id(id: SubjectId) -> Subject {
    Subject::new(SubjectDraft {
        id,
        code: "INT1340".to_owned(),
        name: "Database Systems".to_owned(),
        credits: Credits::try_new(3).expect("valid credits"),
        theory_hours: None,
        practice_hours: None,
        description: None,
    })
    .expect("valid subject")
}

fn scores(attendance: f64, midterm: f64, final_exam: f64) -> ScoreInput {
    ScoreInput {
        attendance: Some(attendance),
        midterm: Some(midterm),
        final_exam: Some(final_exam),
    }
}

struct Mocks {
    grades: MockGradeRepository,
    enrollment: MockEnrollmentRepository,
    directory: MockDirectoryRepository,
}

impl Mocks {
    fn with_known_student_and_subject(student_id: StudentId, subject_id: SubjectId) -> Self {
        let mut enrollment = MockEnrollmentRepository::new();
        enrollment
            .expect_find_student()
            .returning(move |_| Ok(Some(student_with_id(student_id, None))));
        let mut directory = MockDirectoryRepository::new();
        directory
            .expect_find_subject()
            .returning(move |_| Ok(Some(subject_with_id(subject_id))));
        Self {
            grades: MockGradeRepository::new(),
            enrollment,
            directory,
        }
    }

    fn into_service(
        self,
    ) -> GradeService<MockGradeRepository, MockEnrollmentRepository, MockDirectoryRepository> {
        GradeService::new(
            Arc::new(self.grades),
            Arc::new(self.enrollment),
            Arc::new(self.directory),
        )
    }
}

#[rstest]
#[tokio::test]
async fn upsert_grade_computes_the_weighted_total(lecturer: Capability) {
    let student_id = StudentId::random();
    let subject_id = SubjectId::random();
    let mut mocks = Mocks::with_known_student_and_subject(student_id, subject_id);
    mocks.grades.expect_find_by_key().return_once(|_, _, _| Ok(None));
    mocks
        .grades
        .expect_upsert()
        .times(1)
        .withf(|grade| grade.total() == Some(8.45))
        .return_once(|_| Ok(()));

    let grade = mocks
        .into_service()
        .upsert_grade(
            &lecturer,
            student_id,
            subject_id,
            &semester(),
            scores(8.0, 7.5, 9.0),
            None,
        )
        .await
        .expect("upsert succeeds");

    assert_eq!(grade.total(), Some(8.45));
    assert_eq!(grade.letter_label(), "B");
}

#[rstest]
#[tokio::test]
async fn upsert_grade_reuses_the_existing_row_for_the_key(lecturer: Capability) {
    let student_id = StudentId::random();
    let subject_id = SubjectId::random();
    let existing = Grade::new(GradeDraft {
        id: GradeId::random(),
        student_id,
        subject_id,
        semester: semester(),
        scores: Some(ScoreBreakdown::try_new(5.0, 5.0, 5.0).expect("valid scores")),
        note: Some("resit".to_owned()),
    })
    .expect("valid grade");
    let existing_id = existing.id();

    let mut mocks = Mocks::with_known_student_and_subject(student_id, subject_id);
    mocks
        .grades
        .expect_find_by_key()
        .return_once(move |_, _, _| Ok(Some(existing)));
    mocks
        .grades
        .expect_upsert()
        .times(1)
        .withf(move |grade| grade.id() == existing_id && grade.note() == Some("resit"))
        .return_once(|_| Ok(()));

    let grade = mocks
        .into_service()
        .upsert_grade(
            &lecturer,
            student_id,
            subject_id,
            &semester(),
            scores(9.0, 9.0, 9.0),
            None,
        )
        .await
        .expect("second upsert updates the first row");

    assert_eq!(grade.id(), existing_id);
    assert_eq!(grade.total(), Some(9.0));
}

#[rstest]
#[tokio::test]
async fn missing_components_weigh_in_as_zero(lecturer: Capability) {
    let student_id = StudentId::random();
    let subject_id = SubjectId::random();
    let mut mocks = Mocks::with_known_student_and_subject(student_id, subject_id);
    mocks.grades.expect_find_by_key().return_once(|_, _, _| Ok(None));
    mocks.grades.expect_upsert().return_once(|_| Ok(()));

    let grade = mocks
        .into_service()
        .upsert_grade(
            &lecturer,
            student_id,
            subject_id,
            &semester(),
            ScoreInput {
                attendance: None,
                midterm: None,
                final_exam: Some(10.0),
            },
            None,
        )
        .await
        .expect("upsert succeeds");

    assert_eq!(grade.total(), Some(6.0));
}

#[rstest]
#[case(-0.5, 5.0, 5.0)]
#[case(5.0, 10.5, 5.0)]
#[case(5.0, 5.0, 11.0)]
#[tokio::test]
async fn out_of_range_scores_are_rejected(
    lecturer: Capability,
    #[case] attendance: f64,
    #[case] midterm: f64,
    #[case] final_exam: f64,
) {
    let student_id = StudentId::random();
    let subject_id = SubjectId::random();
    let mut mocks = Mocks::with_known_student_and_subject(student_id, subject_id);
    mocks.grades.expect_upsert().times(0);

    let err = mocks
        .into_service()
        .upsert_grade(
            &lecturer,
            student_id,
            subject_id,
            &semester(),
            scores(attendance, midterm, final_exam),
            None,
        )
        .await
        .expect_err("out-of-range scores must fail");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn grading_an_unknown_student_reports_not_found(lecturer: Capability) {
    let mut enrollment = MockEnrollmentRepository::new();
    enrollment.expect_find_student().return_once(|_| Ok(None));

    let service = GradeService::new(
        Arc::new(MockGradeRepository::new()),
        Arc::new(enrollment),
        Arc::new(MockDirectoryRepository::new()),
    );

    let err = service
        .upsert_grade(
            &lecturer,
            StudentId::random(),
            SubjectId::random(),
            &semester(),
            scores(8.0, 8.0, 8.0),
            None,
        )
        .await
        .expect_err("unknown student must fail");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn grade_entry_requires_the_lecturer_capability() {
    let student_cap = capability_for(Role::Student);
    let service = GradeService::new(
        Arc::new(MockGradeRepository::new()),
        Arc::new(MockEnrollmentRepository::new()),
        Arc::new(MockDirectoryRepository::new()),
    );

    let err = service
        .upsert_grade(
            &student_cap,
            StudentId::random(),
            SubjectId::random(),
            &semester(),
            scores(8.0, 8.0, 8.0),
            None,
        )
        .await
        .expect_err("students cannot enter grades");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn record_class_grades_batches_one_row_per_student(lecturer: Capability) {
    let classroom_id = ClassroomId::random();
    let subject_id = SubjectId::random();
    let first = StudentId::random();
    let second = StudentId::random();

    let mut enrollment = MockEnrollmentRepository::new();
    enrollment
        .expect_list_students_in_classroom()
        .return_once(move |_| {
            Ok(vec![
                student_with_id(first, Some(classroom_id)),
                student_with_id(second, Some(classroom_id)),
            ])
        });

    let mut directory = MockDirectoryRepository::new();
    directory
        .expect_find_subject()
        .returning(move |_| Ok(Some(subject_with_id(subject_id))));

    let mut grades = MockGradeRepository::new();
    grades.expect_find_by_key().returning(|_, _, _| Ok(None));
    grades
        .expect_upsert_many()
        .times(1)
        .withf(|batch| batch.len() == 2)
        .return_once(|_| Ok(()));

    let service = GradeService::new(Arc::new(grades), Arc::new(enrollment), Arc::new(directory));
    let written = service
        .record_class_grades(
            &lecturer,
            classroom_id,
            subject_id,
            &semester(),
            &[(first, scores(8.0, 8.0, 8.0)), (second, scores(6.0, 6.0, 6.0))],
        )
        .await
        .expect("batch succeeds");
    assert_eq!(written, 2);
}

#[rstest]
#[tokio::test]
async fn record_class_grades_rejects_students_outside_the_classroom(lecturer: Capability) {
    let classroom_id = ClassroomId::random();
    let subject_id = SubjectId::random();
    let enrolled = StudentId::random();
    let outsider = StudentId::random();

    let mut enrollment = MockEnrollmentRepository::new();
    enrollment
        .expect_list_students_in_classroom()
        .return_once(move |_| Ok(vec![student_with_id(enrolled, Some(classroom_id))]));

    let mut directory = MockDirectoryRepository::new();
    directory
        .expect_find_subject()
        .returning(move |_| Ok(Some(subject_with_id(subject_id))));

    let mut grades = MockGradeRepository::new();
    grades.expect_find_by_key().returning(|_, _, _| Ok(None));
    grades.expect_upsert_many().times(0);

    let service = GradeService::new(Arc::new(grades), Arc::new(enrollment), Arc::new(directory));
    let err = service
        .record_class_grades(
            &lecturer,
            classroom_id,
            subject_id,
            &semester(),
            &[(outsider, scores(8.0, 8.0, 8.0))],
        )
        .await
        .expect_err("outsiders must be rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn grades_for_student_narrows_to_the_requested_semester() {
    let student_id = StudentId::random();
    let wanted = semester();

    let mut enrollment = MockEnrollmentRepository::new();
    enrollment
        .expect_find_student()
        .returning(move |_| Ok(Some(student_with_id(student_id, None))));

    let listed = Grade::new(GradeDraft {
        id: GradeId::random(),
        student_id,
        subject_id: SubjectId::random(),
        semester: wanted.clone(),
        scores: Some(ScoreBreakdown::try_new(8.0, 8.0, 8.0).expect("valid scores")),
        note: None,
    })
    .expect("valid grade");

    let mut grades = MockGradeRepository::new();
    grades
        .expect_list_for_student()
        .times(1)
        .withf(|_, semester| matches!(semester, Some(s) if s.as_str() == "HK2-2024"))
        .return_once(move |_, _| Ok(vec![listed]));

    let service = GradeService::new(
        Arc::new(grades),
        Arc::new(enrollment),
        Arc::new(MockDirectoryRepository::new()),
    );
    let rows = service
        .grades_for_student(student_id, Some(&wanted))
        .await
        .expect("listing succeeds");
    assert_eq!(rows.len(), 1);
}
