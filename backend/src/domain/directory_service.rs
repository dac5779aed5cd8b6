//! Academic directory CRUD behind the admin capability.
//!
//! Each mutation re-checks the capability on entry, builds the entity
//! through its validating constructor, and lets the storage constraints
//! arbitrate uniqueness and referential integrity.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Weekday};

use crate::domain::directory::{
    Classroom, ClassroomDraft, Credits, Major, MajorDraft, Schedule, ScheduleDraft, Subject,
    SubjectDraft,
};
use crate::domain::ports::{DirectoryRepository, DirectoryRepositoryError};
use crate::domain::{
    Capability, ClassroomId, DomainResult, Error, LecturerId, MajorId, Role, ScheduleId,
    SemesterLabel, SubjectId,
};

fn map_repo_error(error: DirectoryRepositoryError) -> Error {
    match error {
        DirectoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("directory repository unavailable: {message}"))
        }
        DirectoryRepositoryError::Query { message } => {
            Error::internal(format!("directory repository error: {message}"))
        }
        DirectoryRepositoryError::DuplicateKey { message } => {
            Error::conflict(format!("directory key already in use: {message}"))
        }
        DirectoryRepositoryError::ForeignKey { message } => {
            Error::conflict(format!("dependent records exist: {message}"))
        }
    }
}

/// Maps write errors where a foreign-key failure means the payload named
/// a record that does not exist rather than a dependent blocking a
/// delete.
fn map_reference_error(error: DirectoryRepositoryError) -> Error {
    match error {
        DirectoryRepositoryError::ForeignKey { message } => {
            Error::not_found(format!("referenced record does not exist: {message}"))
        }
        other => map_repo_error(other),
    }
}

/// Fields accepted when creating or updating a [`Major`].
#[derive(Debug, Clone)]
pub struct MajorFields {
    /// Unique major code.
    pub code: String,
    /// Major name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
}

/// Fields accepted when creating or updating a [`Classroom`].
#[derive(Debug, Clone)]
pub struct ClassroomFields {
    /// Unique classroom name.
    pub name: String,
    /// Major the classroom belongs to, if any.
    pub major_id: Option<MajorId>,
    /// Advising lecturer, if assigned.
    pub advisor_id: Option<LecturerId>,
    /// Academic-year label.
    pub academic_year: Option<String>,
}

/// Fields accepted when creating or updating a [`Subject`].
#[derive(Debug, Clone)]
pub struct SubjectFields {
    /// Unique subject code.
    pub code: String,
    /// Subject name.
    pub name: String,
    /// Credit weight in `1..=10`.
    pub credits: i32,
    /// Theory hour count; defaulted when omitted.
    pub theory_hours: Option<i32>,
    /// Practice hour count; defaulted when omitted.
    pub practice_hours: Option<i32>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Fields accepted when creating or updating a [`Schedule`].
#[derive(Debug, Clone)]
pub struct ScheduleFields {
    /// Taught subject.
    pub subject_id: SubjectId,
    /// Teaching lecturer.
    pub lecturer_id: LecturerId,
    /// Attending classroom.
    pub classroom_id: ClassroomId,
    /// Room label.
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

/// Directory reference-data service.
#[derive(Clone)]
pub struct DirectoryService<D> {
    directory: Arc<D>,
}

impl<D> DirectoryService<D> {
    /// Create a new service over the directory repository.
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }
}

impl<D> DirectoryService<D>
where
    D: DirectoryRepository,
{
    fn build_major(id: MajorId, fields: MajorFields) -> DomainResult<Major> {
        Major::new(MajorDraft {
            id,
            code: fields.code,
            name: fields.name,
            description: fields.description,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))
    }

    /// Create a major.
    pub async fn create_major(
        &self,
        capability: &Capability,
        fields: MajorFields,
    ) -> DomainResult<Major> {
        capability.require(Role::Admin)?;
        let major = Self::build_major(MajorId::random(), fields)?;
        self.directory
            .upsert_major(&major)
            .await
            .map_err(map_repo_error)?;
        Ok(major)
    }

    /// Update an existing major.
    pub async fn update_major(
        &self,
        capability: &Capability,
        id: MajorId,
        fields: MajorFields,
    ) -> DomainResult<Major> {
        capability.require(Role::Admin)?;
        self.directory
            .find_major(id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| Error::not_found(format!("major {id} not found")))?;
        let major = Self::build_major(id, fields)?;
        self.directory
            .upsert_major(&major)
            .await
            .map_err(map_repo_error)?;
        Ok(major)
    }

    /// Delete a major; fails with a conflict while dependents exist.
    pub async fn delete_major(&self, capability: &Capability, id: MajorId) -> DomainResult<()> {
        capability.require(Role::Admin)?;
        let deleted = self
            .directory
            .delete_major(id)
            .await
            .map_err(map_repo_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("major {id} not found")))
        }
    }

    /// List all majors.
    pub async fn majors(&self) -> DomainResult<Vec<Major>> {
        self.directory.list_majors().await.map_err(map_repo_error)
    }

    fn build_classroom(id: ClassroomId, fields: ClassroomFields) -> DomainResult<Classroom> {
        Classroom::new(ClassroomDraft {
            id,
            name: fields.name,
            major_id: fields.major_id,
            advisor_id: fields.advisor_id,
            academic_year: fields.academic_year,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))
    }

    /// Create a classroom.
    pub async fn create_classroom(
        &self,
        capability: &Capability,
        fields: ClassroomFields,
    ) -> DomainResult<Classroom> {
        capability.require(Role::Admin)?;
        let classroom = Self::build_classroom(ClassroomId::random(), fields)?;
        self.directory
            .upsert_classroom(&classroom)
            .await
            .map_err(map_reference_error)?;
        Ok(classroom)
    }

    /// Update an existing classroom.
    pub async fn update_classroom(
        &self,
        capability: &Capability,
        id: ClassroomId,
        fields: ClassroomFields,
    ) -> DomainResult<Classroom> {
        capability.require(Role::Admin)?;
        self.directory
            .find_classroom(id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| Error::not_found(format!("classroom {id} not found")))?;
        let classroom = Self::build_classroom(id, fields)?;
        self.directory
            .upsert_classroom(&classroom)
            .await
            .map_err(map_reference_error)?;
        Ok(classroom)
    }

    /// Delete a classroom.
    ///
    /// Enrolled students lose their classroom reference; schedules still
    /// referencing the classroom block the delete with a conflict.
    pub async fn delete_classroom(
        &self,
        capability: &Capability,
        id: ClassroomId,
    ) -> DomainResult<()> {
        capability.require(Role::Admin)?;
        let deleted = self
            .directory
            .delete_classroom(id)
            .await
            .map_err(map_repo_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("classroom {id} not found")))
        }
    }

    /// List all classrooms.
    pub async fn classrooms(&self) -> DomainResult<Vec<Classroom>> {
        self.directory
            .list_classrooms()
            .await
            .map_err(map_repo_error)
    }

    fn build_subject(id: SubjectId, fields: SubjectFields) -> DomainResult<Subject> {
        let credits =
            Credits::try_new(fields.credits).map_err(|err| Error::invalid_request(err.to_string()))?;
        Subject::new(SubjectDraft {
            id,
            code: fields.code,
            name: fields.name,
            credits,
            theory_hours: fields.theory_hours,
            practice_hours: fields.practice_hours,
            description: fields.description,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))
    }

    /// Create a subject.
    pub async fn create_subject(
        &self,
        capability: &Capability,
        fields: SubjectFields,
    ) -> DomainResult<Subject> {
        capability.require(Role::Admin)?;
        let subject = Self::build_subject(SubjectId::random(), fields)?;
        self.directory
            .upsert_subject(&subject)
            .await
            .map_err(map_repo_error)?;
        Ok(subject)
    }

    /// Update an existing subject.
    pub async fn update_subject(
        &self,
        capability: &Capability,
        id: SubjectId,
        fields: SubjectFields,
    ) -> DomainResult<Subject> {
        capability.require(Role::Admin)?;
        self.directory
            .find_subject(id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| Error::not_found(format!("subject {id} not found")))?;
        let subject = Self::build_subject(id, fields)?;
        self.directory
            .upsert_subject(&subject)
            .await
            .map_err(map_repo_error)?;
        Ok(subject)
    }

    /// Delete a subject; fails with a conflict while dependents exist.
    pub async fn delete_subject(
        &self,
        capability: &Capability,
        id: SubjectId,
    ) -> DomainResult<()> {
        capability.require(Role::Admin)?;
        let deleted = self
            .directory
            .delete_subject(id)
            .await
            .map_err(map_repo_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("subject {id} not found")))
        }
    }

    /// List all subjects.
    pub async fn subjects(&self) -> DomainResult<Vec<Subject>> {
        self.directory.list_subjects().await.map_err(map_repo_error)
    }

    fn build_schedule(id: ScheduleId, fields: ScheduleFields) -> DomainResult<Schedule> {
        Schedule::new(ScheduleDraft {
            id,
            subject_id: fields.subject_id,
            lecturer_id: fields.lecturer_id,
            classroom_id: fields.classroom_id,
            room: fields.room,
            day_of_week: fields.day_of_week,
            start_time: fields.start_time,
            end_time: fields.end_time,
            semester: fields.semester,
            start_date: fields.start_date,
            end_date: fields.end_date,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))
    }

    /// Create a schedule slot.
    ///
    /// Slots are stored as entered; overlapping slots for a lecturer or
    /// room are accepted.
    pub async fn create_schedule(
        &self,
        capability: &Capability,
        fields: ScheduleFields,
    ) -> DomainResult<Schedule> {
        capability.require(Role::Admin)?;
        let schedule = Self::build_schedule(ScheduleId::random(), fields)?;
        self.directory
            .upsert_schedule(&schedule)
            .await
            .map_err(map_reference_error)?;
        Ok(schedule)
    }

    /// Update an existing schedule slot.
    pub async fn update_schedule(
        &self,
        capability: &Capability,
        id: ScheduleId,
        fields: ScheduleFields,
    ) -> DomainResult<Schedule> {
        capability.require(Role::Admin)?;
        self.directory
            .find_schedule(id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| Error::not_found(format!("schedule {id} not found")))?;
        let schedule = Self::build_schedule(id, fields)?;
        self.directory
            .upsert_schedule(&schedule)
            .await
            .map_err(map_reference_error)?;
        Ok(schedule)
    }

    /// Delete a schedule slot.
    pub async fn delete_schedule(
        &self,
        capability: &Capability,
        id: ScheduleId,
    ) -> DomainResult<()> {
        capability.require(Role::Admin)?;
        let deleted = self
            .directory
            .delete_schedule(id)
            .await
            .map_err(map_repo_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("schedule {id} not found")))
        }
    }

    /// List the slots taught by a lecturer.
    pub async fn schedules_for_lecturer(
        &self,
        lecturer_id: LecturerId,
    ) -> DomainResult<Vec<Schedule>> {
        self.directory
            .list_schedules_for_lecturer(lecturer_id)
            .await
            .map_err(map_repo_error)
    }

    /// List the slots attended by a classroom.
    pub async fn schedules_for_classroom(
        &self,
        classroom_id: ClassroomId,
    ) -> DomainResult<Vec<Schedule>> {
        self.directory
            .list_schedules_for_classroom(classroom_id)
            .await
            .map_err(map_repo_error)
    }
}

#[cfg(test)]
#[path = "directory_service_tests.rs"]
mod tests;
