//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and
//! must never be exposed to the domain. They exist solely to satisfy
//! Diesel's type requirements for queries and mutations.

use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    classrooms, evaluations, grades, identities, lecturers, majors, materials, schedules,
    students, subjects,
};

// ---------------------------------------------------------------------------
// Identity models
// ---------------------------------------------------------------------------

/// Row struct for reading from the identities table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = identities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IdentityRow {
    pub id: Uuid,
    pub handle: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
}

/// Insertable struct for creating identity records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = identities)]
pub(crate) struct NewIdentityRow<'a> {
    pub id: Uuid,
    pub handle: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Major models
// ---------------------------------------------------------------------------

/// Row struct for reading from the majors table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = majors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MajorRow {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// Insertable struct for creating major records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = majors)]
pub(crate) struct NewMajorRow<'a> {
    pub id: Uuid,
    pub code: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
}

/// Changeset struct for upserting major records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = majors)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MajorChangeset<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Lecturer models
// ---------------------------------------------------------------------------

/// Row struct for reading from the lecturers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lecturers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LecturerRow {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub code: String,
    pub full_name: String,
    pub department: Option<String>,
    pub expertise: Option<String>,
    pub phone: Option<String>,
    pub degree: Option<String>,
}

/// Insertable struct for creating lecturer records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = lecturers)]
pub(crate) struct NewLecturerRow<'a> {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub code: &'a str,
    pub full_name: &'a str,
    pub department: Option<&'a str>,
    pub expertise: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub degree: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Classroom models
// ---------------------------------------------------------------------------

/// Row struct for reading from the classrooms table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = classrooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClassroomRow {
    pub id: Uuid,
    pub name: String,
    pub major_id: Option<Uuid>,
    pub advisor_id: Option<Uuid>,
    pub academic_year: Option<String>,
}

/// Insertable struct for creating classroom records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = classrooms)]
pub(crate) struct NewClassroomRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub major_id: Option<Uuid>,
    pub advisor_id: Option<Uuid>,
    pub academic_year: Option<&'a str>,
}

/// Changeset struct for upserting classroom records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = classrooms)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ClassroomChangeset<'a> {
    pub name: &'a str,
    pub major_id: Option<Uuid>,
    pub advisor_id: Option<Uuid>,
    pub academic_year: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Student models
// ---------------------------------------------------------------------------

/// Row struct for reading from the students table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentRow {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub code: String,
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub classroom_id: Option<Uuid>,
    pub major_id: Option<Uuid>,
    pub enrollment_year: Option<i32>,
}

/// Insertable struct for creating student records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub(crate) struct NewStudentRow<'a> {
    pub id: Uuid,
    pub identity_id: Uuid,
    pub code: &'a str,
    pub full_name: &'a str,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub classroom_id: Option<Uuid>,
    pub major_id: Option<Uuid>,
    pub enrollment_year: Option<i32>,
}

// ---------------------------------------------------------------------------
// Subject models
// ---------------------------------------------------------------------------

/// Row struct for reading from the subjects table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = subjects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubjectRow {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub theory_hours: i32,
    pub practice_hours: i32,
    pub description: Option<String>,
}

/// Insertable struct for creating subject records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subjects)]
pub(crate) struct NewSubjectRow<'a> {
    pub id: Uuid,
    pub code: &'a str,
    pub name: &'a str,
    pub credits: i32,
    pub theory_hours: i32,
    pub practice_hours: i32,
    pub description: Option<&'a str>,
}

/// Changeset struct for upserting subject records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = subjects)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct SubjectChangeset<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub credits: i32,
    pub theory_hours: i32,
    pub practice_hours: i32,
    pub description: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Schedule models
// ---------------------------------------------------------------------------

/// Row struct for reading from the schedules table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScheduleRow {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub lecturer_id: Uuid,
    pub classroom_id: Uuid,
    pub room: String,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub semester: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Insertable struct for creating schedule records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schedules)]
pub(crate) struct NewScheduleRow<'a> {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub lecturer_id: Uuid,
    pub classroom_id: Uuid,
    pub room: &'a str,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub semester: &'a str,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Changeset struct for upserting schedule records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schedules)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ScheduleChangeset<'a> {
    pub subject_id: Uuid,
    pub lecturer_id: Uuid,
    pub classroom_id: Uuid,
    pub room: &'a str,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub semester: &'a str,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Grade models
// ---------------------------------------------------------------------------

/// Row struct for reading from the grades table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = grades)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GradeRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub score_attendance: f64,
    pub score_midterm: f64,
    pub score_final: f64,
    pub score_total: Option<f64>,
    pub semester: String,
    pub note: Option<String>,
}

/// Insertable struct for creating grade records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = grades)]
pub(crate) struct NewGradeRow<'a> {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub score_attendance: f64,
    pub score_midterm: f64,
    pub score_final: f64,
    pub score_total: Option<f64>,
    pub semester: &'a str,
    pub note: Option<&'a str>,
}

/// Changeset struct applied on the conflict arm of the grade upsert.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = grades)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct GradeChangeset<'a> {
    pub score_attendance: f64,
    pub score_midterm: f64,
    pub score_final: f64,
    pub score_total: Option<f64>,
    pub note: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Evaluation models
// ---------------------------------------------------------------------------

/// Row struct for reading from the evaluations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = evaluations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EvaluationRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub lecturer_id: Uuid,
    pub subject_id: Option<Uuid>,
    pub rating: i16,
    pub comment: Option<String>,
    pub semester: String,
    pub is_anonymous: bool,
}

/// Insertable struct for creating evaluation records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = evaluations)]
pub(crate) struct NewEvaluationRow<'a> {
    pub id: Uuid,
    pub student_id: Uuid,
    pub lecturer_id: Uuid,
    pub subject_id: Option<Uuid>,
    pub rating: i16,
    pub comment: Option<&'a str>,
    pub semester: &'a str,
    pub is_anonymous: bool,
}

// ---------------------------------------------------------------------------
// Material models
// ---------------------------------------------------------------------------

/// Row struct for reading from the materials table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = materials)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MaterialRow {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub uploaded_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub download_count: i64,
}

/// Insertable struct for creating material records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = materials)]
pub(crate) struct NewMaterialRow<'a> {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub uploaded_by: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub file_path: Option<&'a str>,
    pub file_type: Option<&'a str>,
    pub file_size: Option<i64>,
    pub download_count: i64,
}
