//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them
//! for compile-time query validation and type-safe SQL generation. When a
//! migration changes the schema, regenerate this file or update it by
//! hand (`diesel print-schema`).

diesel::table! {
    /// Login-capable identities with a fixed role.
    identities (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login handle.
        handle -> Varchar,
        /// Unique contact address.
        email -> Varchar,
        /// Salted one-way hash of the secret (`salt$digest`).
        password_hash -> Varchar,
        /// Role label: `admin`, `lecturer`, or `student`.
        role -> Varchar,
        /// Whether the identity may authenticate.
        is_active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Fields of study.
    majors (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique major code.
        code -> Varchar,
        /// Major name.
        name -> Varchar,
        /// Free-text description.
        description -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Lecturer profiles, owned 1:1 by an identity.
    lecturers (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning identity.
        identity_id -> Uuid,
        /// Unique lecturer code.
        code -> Varchar,
        /// Full display name.
        full_name -> Varchar,
        /// Department or faculty.
        department -> Nullable<Varchar>,
        /// Area of expertise.
        expertise -> Nullable<Varchar>,
        /// Phone number.
        phone -> Nullable<Varchar>,
        /// Academic degree label.
        degree -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Administrative classes grouping students.
    classrooms (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique classroom name.
        name -> Varchar,
        /// Major the classroom belongs to.
        major_id -> Nullable<Uuid>,
        /// Advising lecturer.
        advisor_id -> Nullable<Uuid>,
        /// Academic-year label.
        academic_year -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Student profiles, owned 1:1 by an identity.
    students (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning identity.
        identity_id -> Uuid,
        /// Unique student code.
        code -> Varchar,
        /// Full display name.
        full_name -> Varchar,
        /// Birth date.
        birth_date -> Nullable<Date>,
        /// Gender label.
        gender -> Nullable<Varchar>,
        /// Phone number.
        phone -> Nullable<Varchar>,
        /// Postal address.
        address -> Nullable<Varchar>,
        /// Classroom assignment; nulled when the classroom is deleted.
        classroom_id -> Nullable<Uuid>,
        /// Major assignment.
        major_id -> Nullable<Uuid>,
        /// Year the student enrolled.
        enrollment_year -> Nullable<Int4>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Taught subjects with credit weights.
    subjects (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique subject code.
        code -> Varchar,
        /// Subject name.
        name -> Varchar,
        /// Credit weight in 1..=10.
        credits -> Int4,
        /// Theory hour count.
        theory_hours -> Int4,
        /// Practice hour count.
        practice_hours -> Int4,
        /// Free-text description.
        description -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Weekly teaching slots.
    schedules (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Taught subject.
        subject_id -> Uuid,
        /// Teaching lecturer.
        lecturer_id -> Uuid,
        /// Attending classroom.
        classroom_id -> Uuid,
        /// Room label.
        room -> Varchar,
        /// Day of week, 0 = Monday through 6 = Sunday.
        day_of_week -> Int2,
        /// Slot start.
        start_time -> Time,
        /// Slot end.
        end_time -> Time,
        /// Term label.
        semester -> Varchar,
        /// First teaching day.
        start_date -> Nullable<Date>,
        /// Last teaching day.
        end_date -> Nullable<Date>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Grade ledger; unique on (student_id, subject_id, semester).
    grades (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Graded student.
        student_id -> Uuid,
        /// Graded subject.
        subject_id -> Uuid,
        /// Attendance component score.
        score_attendance -> Float8,
        /// Midterm component score.
        score_midterm -> Float8,
        /// Final-exam component score.
        score_final -> Float8,
        /// Derived weighted total; null while never graded.
        score_total -> Nullable<Float8>,
        /// Term label.
        semester -> Varchar,
        /// Free-text note.
        note -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Evaluation ledger; unique on (student_id, lecturer_id, subject_id,
    /// semester).
    evaluations (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Authoring student.
        student_id -> Uuid,
        /// Rated lecturer.
        lecturer_id -> Uuid,
        /// Subject context.
        subject_id -> Nullable<Uuid>,
        /// Star rating in 1..=5.
        rating -> Int2,
        /// Free-text comment.
        comment -> Nullable<Text>,
        /// Term label.
        semester -> Varchar,
        /// Whether the author is hidden.
        is_anonymous -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Material metadata with download counters.
    materials (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Subject the material belongs to.
        subject_id -> Uuid,
        /// Uploading lecturer.
        uploaded_by -> Uuid,
        /// Display title.
        title -> Varchar,
        /// Free-text description.
        description -> Nullable<Text>,
        /// Storage path of the file.
        file_path -> Nullable<Varchar>,
        /// File type label.
        file_type -> Nullable<Varchar>,
        /// Size of the stored bytes.
        file_size -> Nullable<Int8>,
        /// Successful downloads so far.
        download_count -> Int8,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(lecturers -> identities (identity_id));
diesel::joinable!(students -> identities (identity_id));
diesel::joinable!(students -> classrooms (classroom_id));
diesel::joinable!(students -> majors (major_id));
diesel::joinable!(classrooms -> majors (major_id));
diesel::joinable!(classrooms -> lecturers (advisor_id));
diesel::joinable!(schedules -> subjects (subject_id));
diesel::joinable!(schedules -> lecturers (lecturer_id));
diesel::joinable!(schedules -> classrooms (classroom_id));
diesel::joinable!(grades -> students (student_id));
diesel::joinable!(grades -> subjects (subject_id));
diesel::joinable!(evaluations -> students (student_id));
diesel::joinable!(evaluations -> lecturers (lecturer_id));
diesel::joinable!(evaluations -> subjects (subject_id));
diesel::joinable!(materials -> subjects (subject_id));
diesel::joinable!(materials -> lecturers (uploaded_by));

diesel::allow_tables_to_appear_in_same_query!(
    identities,
    majors,
    lecturers,
    classrooms,
    students,
    subjects,
    schedules,
    grades,
    evaluations,
    materials,
);
