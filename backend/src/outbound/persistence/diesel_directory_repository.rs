//! PostgreSQL-backed `DirectoryRepository` implementation using Diesel.
//!
//! Writes are keyed upserts on the primary key. Deletes rely on the
//! schema's referential actions: dependents raise foreign-key violations
//! that keep the delete from happening, while the classroom→student edge
//! is declared `ON DELETE SET NULL` so removing a classroom merely
//! unassigns its students.

use async_trait::async_trait;
use chrono::Weekday;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DirectoryRepository, DirectoryRepositoryError};
use crate::domain::{
    Classroom, ClassroomDraft, ClassroomId, Credits, LecturerId, Major, MajorDraft, MajorId,
    Schedule, ScheduleDraft, ScheduleId, SemesterLabel, Subject, SubjectDraft, SubjectId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    ClassroomChangeset, ClassroomRow, MajorChangeset, MajorRow, NewClassroomRow, NewMajorRow,
    NewScheduleRow, NewSubjectRow, ScheduleChangeset, ScheduleRow, SubjectChangeset, SubjectRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{classrooms, majors, schedules, subjects};

/// Diesel-backed implementation of the directory repository port.
#[derive(Clone)]
pub struct DieselDirectoryRepository {
    pool: DbPool,
}

impl DieselDirectoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> DirectoryRepositoryError {
    map_pool_error(error, DirectoryRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> DirectoryRepositoryError {
    map_diesel_error(
        error,
        DirectoryRepositoryError::query,
        DirectoryRepositoryError::connection,
        DirectoryRepositoryError::duplicate_key,
        DirectoryRepositoryError::foreign_key,
    )
}

fn weekday_to_i16(day: Weekday) -> i16 {
    // num_days_from_monday is 0..=6, which always fits.
    day.num_days_from_monday() as i16
}

fn weekday_from_i16(value: i16) -> Result<Weekday, DirectoryRepositoryError> {
    u8::try_from(value)
        .ok()
        .and_then(|day| Weekday::try_from(day).ok())
        .ok_or_else(|| {
            DirectoryRepositoryError::query(format!("corrupted day of week in database: {value}"))
        })
}

fn row_to_major(row: MajorRow) -> Result<Major, DirectoryRepositoryError> {
    Major::new(MajorDraft {
        id: MajorId::from_uuid(row.id),
        code: row.code,
        name: row.name,
        description: row.description,
    })
    .map_err(|err| DirectoryRepositoryError::query(err.to_string()))
}

fn row_to_classroom(row: ClassroomRow) -> Result<Classroom, DirectoryRepositoryError> {
    Classroom::new(ClassroomDraft {
        id: ClassroomId::from_uuid(row.id),
        name: row.name,
        major_id: row.major_id.map(MajorId::from_uuid),
        advisor_id: row.advisor_id.map(LecturerId::from_uuid),
        academic_year: row.academic_year,
    })
    .map_err(|err| DirectoryRepositoryError::query(err.to_string()))
}

fn row_to_subject(row: SubjectRow) -> Result<Subject, DirectoryRepositoryError> {
    let credits = Credits::try_new(row.credits)
        .map_err(|err| DirectoryRepositoryError::query(format!("corrupted credits: {err}")))?;
    Subject::new(SubjectDraft {
        id: SubjectId::from_uuid(row.id),
        code: row.code,
        name: row.name,
        credits,
        theory_hours: Some(row.theory_hours),
        practice_hours: Some(row.practice_hours),
        description: row.description,
    })
    .map_err(|err| DirectoryRepositoryError::query(err.to_string()))
}

fn row_to_schedule(row: ScheduleRow) -> Result<Schedule, DirectoryRepositoryError> {
    let semester = SemesterLabel::new(row.semester)
        .map_err(|err| DirectoryRepositoryError::query(format!("corrupted semester: {err}")))?;
    Schedule::new(ScheduleDraft {
        id: ScheduleId::from_uuid(row.id),
        subject_id: SubjectId::from_uuid(row.subject_id),
        lecturer_id: LecturerId::from_uuid(row.lecturer_id),
        classroom_id: ClassroomId::from_uuid(row.classroom_id),
        room: row.room,
        day_of_week: weekday_from_i16(row.day_of_week)?,
        start_time: row.start_time,
        end_time: row.end_time,
        semester,
        start_date: row.start_date,
        end_date: row.end_date,
    })
    .map_err(|err| DirectoryRepositoryError::query(err.to_string()))
}

#[async_trait]
impl DirectoryRepository for DieselDirectoryRepository {
    async fn upsert_major(&self, major: &Major) -> Result<(), DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewMajorRow {
            id: *major.id().as_uuid(),
            code: major.code(),
            name: major.name(),
            description: major.description(),
        };
        let changeset = MajorChangeset {
            code: major.code(),
            name: major.name(),
            description: major.description(),
        };

        diesel::insert_into(majors::table)
            .values(&new_row)
            .on_conflict(majors::id)
            .do_update()
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn find_major(&self, id: MajorId) -> Result<Option<Major>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = majors::table
            .filter(majors::id.eq(id.as_uuid()))
            .select(MajorRow::as_select())
            .first::<MajorRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_major).transpose()
    }

    async fn list_majors(&self) -> Result<Vec<Major>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<MajorRow> = majors::table
            .order(majors::name.asc())
            .select(MajorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_major).collect()
    }

    async fn delete_major(&self, id: MajorId) -> Result<bool, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let deleted = diesel::delete(majors::table.filter(majors::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(deleted > 0)
    }

    async fn upsert_classroom(
        &self,
        classroom: &Classroom,
    ) -> Result<(), DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewClassroomRow {
            id: *classroom.id().as_uuid(),
            name: classroom.name(),
            major_id: classroom.major_id().map(Into::into),
            advisor_id: classroom.advisor_id().map(Into::into),
            academic_year: classroom.academic_year(),
        };
        let changeset = ClassroomChangeset {
            name: classroom.name(),
            major_id: classroom.major_id().map(Into::into),
            advisor_id: classroom.advisor_id().map(Into::into),
            academic_year: classroom.academic_year(),
        };

        diesel::insert_into(classrooms::table)
            .values(&new_row)
            .on_conflict(classrooms::id)
            .do_update()
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn find_classroom(
        &self,
        id: ClassroomId,
    ) -> Result<Option<Classroom>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = classrooms::table
            .filter(classrooms::id.eq(id.as_uuid()))
            .select(ClassroomRow::as_select())
            .first::<ClassroomRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_classroom).transpose()
    }

    async fn list_classrooms(&self) -> Result<Vec<Classroom>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<ClassroomRow> = classrooms::table
            .order(classrooms::name.asc())
            .select(ClassroomRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_classroom).collect()
    }

    async fn delete_classroom(&self, id: ClassroomId) -> Result<bool, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let deleted = diesel::delete(classrooms::table.filter(classrooms::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(deleted > 0)
    }

    async fn upsert_subject(&self, subject: &Subject) -> Result<(), DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewSubjectRow {
            id: *subject.id().as_uuid(),
            code: subject.code(),
            name: subject.name(),
            credits: subject.credits().value(),
            theory_hours: subject.theory_hours(),
            practice_hours: subject.practice_hours(),
            description: subject.description(),
        };
        let changeset = SubjectChangeset {
            code: subject.code(),
            name: subject.name(),
            credits: subject.credits().value(),
            theory_hours: subject.theory_hours(),
            practice_hours: subject.practice_hours(),
            description: subject.description(),
        };

        diesel::insert_into(subjects::table)
            .values(&new_row)
            .on_conflict(subjects::id)
            .do_update()
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn find_subject(
        &self,
        id: SubjectId,
    ) -> Result<Option<Subject>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = subjects::table
            .filter(subjects::id.eq(id.as_uuid()))
            .select(SubjectRow::as_select())
            .first::<SubjectRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_subject).transpose()
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<SubjectRow> = subjects::table
            .order(subjects::name.asc())
            .select(SubjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_subject).collect()
    }

    async fn delete_subject(&self, id: SubjectId) -> Result<bool, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let deleted = diesel::delete(subjects::table.filter(subjects::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(deleted > 0)
    }

    async fn upsert_schedule(&self, schedule: &Schedule) -> Result<(), DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewScheduleRow {
            id: *schedule.id().as_uuid(),
            subject_id: *schedule.subject_id().as_uuid(),
            lecturer_id: *schedule.lecturer_id().as_uuid(),
            classroom_id: *schedule.classroom_id().as_uuid(),
            room: schedule.room(),
            day_of_week: weekday_to_i16(schedule.day_of_week()),
            start_time: schedule.start_time(),
            end_time: schedule.end_time(),
            semester: schedule.semester().as_str(),
            start_date: schedule.start_date(),
            end_date: schedule.end_date(),
        };
        let changeset = ScheduleChangeset {
            subject_id: *schedule.subject_id().as_uuid(),
            lecturer_id: *schedule.lecturer_id().as_uuid(),
            classroom_id: *schedule.classroom_id().as_uuid(),
            room: schedule.room(),
            day_of_week: weekday_to_i16(schedule.day_of_week()),
            start_time: schedule.start_time(),
            end_time: schedule.end_time(),
            semester: schedule.semester().as_str(),
            start_date: schedule.start_date(),
            end_date: schedule.end_date(),
        };

        diesel::insert_into(schedules::table)
            .values(&new_row)
            .on_conflict(schedules::id)
            .do_update()
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn find_schedule(
        &self,
        id: ScheduleId,
    ) -> Result<Option<Schedule>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = schedules::table
            .filter(schedules::id.eq(id.as_uuid()))
            .select(ScheduleRow::as_select())
            .first::<ScheduleRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_schedule).transpose()
    }

    async fn list_schedules_for_lecturer(
        &self,
        lecturer_id: LecturerId,
    ) -> Result<Vec<Schedule>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<ScheduleRow> = schedules::table
            .filter(schedules::lecturer_id.eq(lecturer_id.as_uuid()))
            .order((schedules::day_of_week.asc(), schedules::start_time.asc()))
            .select(ScheduleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_schedule).collect()
    }

    async fn list_schedules_for_classroom(
        &self,
        classroom_id: ClassroomId,
    ) -> Result<Vec<Schedule>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<ScheduleRow> = schedules::table
            .filter(schedules::classroom_id.eq(classroom_id.as_uuid()))
            .order((schedules::day_of_week.asc(), schedules::start_time.asc()))
            .select(ScheduleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_schedule).collect()
    }

    async fn delete_schedule(&self, id: ScheduleId) -> Result<bool, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let deleted = diesel::delete(schedules::table.filter(schedules::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion edge cases.
    use chrono::NaiveTime;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;

    #[fixture]
    fn valid_schedule_row() -> ScheduleRow {
        ScheduleRow {
            id: Uuid::new_v4(),
            subject_id: Uuid::new_v4(),
            lecturer_id: Uuid::new_v4(),
            classroom_id: Uuid::new_v4(),
            room: "A101".to_owned(),
            day_of_week: 0,
            start_time: NaiveTime::from_hms_opt(7, 30, 0).expect("valid time"),
            end_time: NaiveTime::from_hms_opt(9, 30, 0).expect("valid time"),
            semester: "HK2-2024".to_owned(),
            start_date: None,
            end_date: None,
        }
    }

    #[rstest]
    #[case(0, Weekday::Mon)]
    #[case(4, Weekday::Fri)]
    #[case(6, Weekday::Sun)]
    fn weekdays_round_trip_through_storage(#[case] stored: i16, #[case] day: Weekday) {
        assert_eq!(weekday_from_i16(stored).expect("valid day"), day);
        assert_eq!(weekday_to_i16(day), stored);
    }

    #[rstest]
    #[case(-1)]
    #[case(7)]
    fn corrupted_weekdays_are_rejected(#[case] stored: i16) {
        let err = weekday_from_i16(stored).expect_err("corrupt day fails");
        assert!(err.to_string().contains("corrupted day of week"));
    }

    #[rstest]
    fn valid_schedule_rows_convert(valid_schedule_row: ScheduleRow) {
        let schedule = row_to_schedule(valid_schedule_row).expect("valid row converts");
        assert_eq!(schedule.day_of_week(), Weekday::Mon);
        assert_eq!(schedule.semester().as_str(), "HK2-2024");
    }

    #[rstest]
    fn schedule_rows_with_inverted_times_are_rejected(mut valid_schedule_row: ScheduleRow) {
        valid_schedule_row.end_time = valid_schedule_row.start_time;
        let err = row_to_schedule(valid_schedule_row).expect_err("inverted slot fails");
        assert!(matches!(err, DirectoryRepositoryError::Query { .. }));
    }

    #[rstest]
    fn subject_rows_with_corrupt_credits_are_rejected() {
        let row = SubjectRow {
            id: Uuid::new_v4(),
            code: "INT1340".to_owned(),
            name: "Database Systems".to_owned(),
            credits: 42,
            theory_hours: 30,
            practice_hours: 15,
            description: None,
        };
        let err = row_to_subject(row).expect_err("corrupt credits fail");
        assert!(err.to_string().contains("corrupted credits"));
    }
}
