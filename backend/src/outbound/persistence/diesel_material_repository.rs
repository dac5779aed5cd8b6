//! PostgreSQL-backed `MaterialRepository` implementation using Diesel.
//!
//! The download counter is bumped with a single `SET download_count =
//! download_count + 1` so concurrent downloads never lose an increment.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MaterialRepository, MaterialRepositoryError};
use crate::domain::{
    LecturerId, Material, MaterialDraft, MaterialId, StoredFile, SubjectId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MaterialRow, NewMaterialRow};
use super::pool::{DbPool, PoolError};
use super::schema::materials;

/// Diesel-backed implementation of the material repository port.
#[derive(Clone)]
pub struct DieselMaterialRepository {
    pool: DbPool,
}

impl DieselMaterialRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> MaterialRepositoryError {
    map_pool_error(error, MaterialRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> MaterialRepositoryError {
    map_diesel_error(
        error,
        MaterialRepositoryError::query,
        MaterialRepositoryError::connection,
        MaterialRepositoryError::query,
        MaterialRepositoryError::foreign_key,
    )
}

/// Convert a database row into a validated domain material.
pub(crate) fn row_to_material(row: MaterialRow) -> Result<Material, MaterialRepositoryError> {
    let file = row
        .file_path
        .map(|path| {
            StoredFile::try_new(
                path,
                row.file_type.unwrap_or_default(),
                row.file_size.unwrap_or(0),
            )
        })
        .transpose()
        .map_err(|err| {
            MaterialRepositoryError::query(format!("corrupted file metadata in database: {err}"))
        })?;

    Material::new(MaterialDraft {
        id: MaterialId::from_uuid(row.id),
        subject_id: SubjectId::from_uuid(row.subject_id),
        uploaded_by: LecturerId::from_uuid(row.uploaded_by),
        title: row.title,
        description: row.description,
        file,
        download_count: row.download_count,
    })
    .map_err(|err| MaterialRepositoryError::query(err.to_string()))
}

#[async_trait]
impl MaterialRepository for DieselMaterialRepository {
    async fn insert(&self, material: &Material) -> Result<(), MaterialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewMaterialRow {
            id: *material.id().as_uuid(),
            subject_id: *material.subject_id().as_uuid(),
            uploaded_by: *material.uploaded_by().as_uuid(),
            title: material.title(),
            description: material.description(),
            file_path: material.file().map(StoredFile::path),
            file_type: material.file().map(StoredFile::file_type),
            file_size: material.file().map(StoredFile::size_bytes),
            download_count: material.download_count(),
        };

        diesel::insert_into(materials::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn find(&self, id: MaterialId) -> Result<Option<Material>, MaterialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = materials::table
            .filter(materials::id.eq(id.as_uuid()))
            .select(MaterialRow::as_select())
            .first::<MaterialRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_material).transpose()
    }

    async fn list_for_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<Material>, MaterialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<MaterialRow> = materials::table
            .filter(materials::subject_id.eq(subject_id.as_uuid()))
            .order(materials::title.asc())
            .select(MaterialRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_material).collect()
    }

    async fn increment_download_count(
        &self,
        id: MaterialId,
    ) -> Result<bool, MaterialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let updated = diesel::update(materials::table.filter(materials::id.eq(id.as_uuid())))
            .set(materials::download_count.eq(materials::download_count + 1_i64))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(updated > 0)
    }

    async fn delete(&self, id: MaterialId) -> Result<bool, MaterialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let deleted = diesel::delete(materials::table.filter(materials::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(deleted > 0)
    }
}
