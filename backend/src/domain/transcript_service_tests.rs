//! Tests for the GPA aggregation service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockEnrollmentRepository, MockGradeRepository};
use crate::domain::{ErrorCode, IdentityId, Student, StudentDraft, SubjectId};

fn known_student(student_id: StudentId) -> MockEnrollmentRepository {
    let mut enrollment = MockEnrollmentRepository::new();
    enrollment.expect_find_student().returning(move |_| {
        Ok(Some(
            Student::new(StudentDraft {
                id: student_id,
                identity_id: IdentityId::random(),
                code: "SV2024001".to_owned(),
                full_name: "Nguyen Van A".to_owned(),
                birth_date: None,
                gender: None,
                phone: None,
                address: None,
                classroom_id: None,
                major_id: None,
                enrollment_year: None,
            })
            .expect("valid student"),
        ))
    });
    enrollment
}

fn entry(credits: i32, total: Option<f64>) -> TranscriptEntry {
    TranscriptEntry {
        subject_id: SubjectId::random(),
        credits,
        total,
    }
}

fn service_with_entries(
    student_id: StudentId,
    entries: Vec<TranscriptEntry>,
) -> TranscriptService<MockGradeRepository, MockEnrollmentRepository> {
    let mut grades = MockGradeRepository::new();
    grades
        .expect_transcript_for_student()
        .returning(move |_| Ok(entries.clone()));
    TranscriptService::new(Arc::new(grades), Arc::new(known_student(student_id)))
}

#[tokio::test]
async fn gpa_is_zero_without_any_grade_rows() {
    let student_id = StudentId::random();
    let service = service_with_entries(student_id, Vec::new());
    let gpa = service.compute_gpa(student_id).await.expect("gpa computes");
    assert_eq!(gpa, 0.0);
}

#[tokio::test]
async fn gpa_weights_totals_by_subject_credits() {
    let student_id = StudentId::random();
    let service = service_with_entries(
        student_id,
        vec![entry(3, Some(8.0)), entry(4, Some(6.0))],
    );
    let gpa = service.compute_gpa(student_id).await.expect("gpa computes");
    assert_eq!(gpa, 6.86);
}

#[tokio::test]
async fn ungraded_rows_are_excluded_from_the_gpa() {
    let student_id = StudentId::random();
    let service = service_with_entries(
        student_id,
        vec![entry(3, Some(8.0)), entry(10, None)],
    );
    let gpa = service.compute_gpa(student_id).await.expect("gpa computes");
    assert_eq!(gpa, 8.0);
}

#[rstest]
#[case(vec![], 0)]
#[case(vec![(3, Some(8.0)), (4, Some(6.0))], 7)]
#[case(vec![(3, Some(3.99)), (4, Some(4.0))], 4)]
#[case(vec![(3, None), (4, Some(9.0))], 4)]
#[tokio::test]
async fn credited_credits_count_only_passing_rows(
    #[case] rows: Vec<(i32, Option<f64>)>,
    #[case] expected: i32,
) {
    let student_id = StudentId::random();
    let entries = rows.into_iter().map(|(c, t)| entry(c, t)).collect();
    let service = service_with_entries(student_id, entries);
    let credits = service
        .credited_credits(student_id)
        .await
        .expect("credits compute");
    assert_eq!(credits, expected);
}

#[tokio::test]
async fn summary_reports_both_figures_from_one_read() {
    let student_id = StudentId::random();
    let service = service_with_entries(
        student_id,
        vec![entry(3, Some(8.0)), entry(4, Some(3.0))],
    );
    let summary = service.summary(student_id).await.expect("summary computes");
    // GPA still counts the failing row; credited credits do not.
    assert_eq!(summary.gpa, round_to_2dp((3.0 * 8.0 + 4.0 * 3.0) / 7.0));
    assert_eq!(summary.credited_credits, 3);
}

#[tokio::test]
async fn unknown_students_report_not_found() {
    let mut enrollment = MockEnrollmentRepository::new();
    enrollment.expect_find_student().return_once(|_| Ok(None));
    let service = TranscriptService::new(
        Arc::new(MockGradeRepository::new()),
        Arc::new(enrollment),
    );

    let err = service
        .compute_gpa(StudentId::random())
        .await
        .expect_err("unknown student must fail");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn repository_connection_failures_surface_as_service_unavailable() {
    let student_id = StudentId::random();
    let mut grades = MockGradeRepository::new();
    grades
        .expect_transcript_for_student()
        .return_once(|_| Err(GradeRepositoryError::connection("pool unavailable")));

    let service = TranscriptService::new(Arc::new(grades), Arc::new(known_student(student_id)));
    let err = service
        .compute_gpa(student_id)
        .await
        .expect_err("connection failure surfaces");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
