//! Material catalog operations: metadata registration, the download
//! counter, and uploader-only deletion.

use std::sync::Arc;

use crate::domain::material::{Material, MaterialDraft, NewMaterial};
use crate::domain::ports::{
    DirectoryRepository, DirectoryRepositoryError, EnrollmentRepository,
    EnrollmentRepositoryError, MaterialRepository, MaterialRepositoryError,
};
use crate::domain::{
    Capability, DomainResult, Error, LecturerId, MaterialId, Role, SubjectId,
};

fn map_material_repo_error(error: MaterialRepositoryError) -> Error {
    match error {
        MaterialRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("material repository unavailable: {message}"))
        }
        MaterialRepositoryError::Query { message } => {
            Error::internal(format!("material repository error: {message}"))
        }
        MaterialRepositoryError::ForeignKey { message } => {
            Error::not_found(format!("referenced record does not exist: {message}"))
        }
    }
}

fn map_enrollment_repo_error(error: EnrollmentRepositoryError) -> Error {
    match error {
        EnrollmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("enrollment repository unavailable: {message}"))
        }
        other => Error::internal(format!("enrollment repository error: {other}")),
    }
}

fn map_directory_repo_error(error: DirectoryRepositoryError) -> Error {
    match error {
        DirectoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("directory repository unavailable: {message}"))
        }
        other => Error::internal(format!("directory repository error: {other}")),
    }
}

/// Material catalog service.
#[derive(Clone)]
pub struct MaterialService<M, E, D> {
    materials: Arc<M>,
    enrollment: Arc<E>,
    directory: Arc<D>,
}

impl<M, E, D> MaterialService<M, E, D> {
    /// Create a new service over the material, enrollment, and directory
    /// repositories.
    pub fn new(materials: Arc<M>, enrollment: Arc<E>, directory: Arc<D>) -> Self {
        Self {
            materials,
            enrollment,
            directory,
        }
    }
}

impl<M, E, D> MaterialService<M, E, D>
where
    M: MaterialRepository,
    E: EnrollmentRepository,
    D: DirectoryRepository,
{
    /// Register material metadata for a subject.
    ///
    /// The bytes behind the stored file belong to the external storage
    /// collaborator; only `{path, type, size}` is recorded here.
    pub async fn register_material(
        &self,
        capability: &Capability,
        request: NewMaterial,
    ) -> DomainResult<Material> {
        capability.require(Role::Lecturer)?;
        self.directory
            .find_subject(request.subject_id)
            .await
            .map_err(map_directory_repo_error)?
            .ok_or_else(|| Error::not_found(format!("subject {} not found", request.subject_id)))?;
        self.enrollment
            .find_lecturer(request.uploaded_by)
            .await
            .map_err(map_enrollment_repo_error)?
            .ok_or_else(|| {
                Error::not_found(format!("lecturer {} not found", request.uploaded_by))
            })?;

        let material = Material::new(MaterialDraft {
            id: MaterialId::random(),
            subject_id: request.subject_id,
            uploaded_by: request.uploaded_by,
            title: request.title,
            description: request.description,
            file: request.file,
            download_count: 0,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.materials
            .insert(&material)
            .await
            .map_err(map_material_repo_error)?;
        Ok(material)
    }

    /// Count a successful download.
    pub async fn record_download(&self, id: MaterialId) -> DomainResult<()> {
        let bumped = self
            .materials
            .increment_download_count(id)
            .await
            .map_err(map_material_repo_error)?;
        if bumped {
            Ok(())
        } else {
            Err(Error::not_found(format!("material {id} not found")))
        }
    }

    /// Delete a material; only its uploader may do so.
    pub async fn delete_material(
        &self,
        capability: &Capability,
        id: MaterialId,
        requesting_lecturer: LecturerId,
    ) -> DomainResult<()> {
        capability.require(Role::Lecturer)?;
        let material = self
            .materials
            .find(id)
            .await
            .map_err(map_material_repo_error)?
            .ok_or_else(|| Error::not_found(format!("material {id} not found")))?;

        if material.uploaded_by() != requesting_lecturer {
            return Err(Error::forbidden("only the uploader may delete this material"));
        }

        let deleted = self
            .materials
            .delete(id)
            .await
            .map_err(map_material_repo_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("material {id} not found")))
        }
    }

    /// List the materials registered for a subject.
    pub async fn materials_for_subject(
        &self,
        subject_id: SubjectId,
    ) -> DomainResult<Vec<Material>> {
        self.materials
            .list_for_subject(subject_id)
            .await
            .map_err(map_material_repo_error)
    }
}

#[cfg(test)]
#[path = "material_service_tests.rs"]
mod tests;
