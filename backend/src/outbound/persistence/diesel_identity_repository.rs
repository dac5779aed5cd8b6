//! PostgreSQL-backed `IdentityRepository` implementation using Diesel.
//!
//! Identity rows are written by the enrollment adapter as part of the
//! paired identity/profile lifecycle; this adapter covers authentication
//! reads and credential rotation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{IdentityRepository, IdentityRepositoryError};
use crate::domain::{Identity, IdentityDraft, IdentityId, PasswordHash, Role};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::IdentityRow;
use super::pool::{DbPool, PoolError};
use super::schema::identities;

/// Diesel-backed implementation of the identity repository port.
#[derive(Clone)]
pub struct DieselIdentityRepository {
    pool: DbPool,
}

impl DieselIdentityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> IdentityRepositoryError {
    map_pool_error(error, IdentityRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> IdentityRepositoryError {
    map_diesel_error(
        error,
        IdentityRepositoryError::query,
        IdentityRepositoryError::connection,
        IdentityRepositoryError::query,
        IdentityRepositoryError::query,
    )
}

/// Convert a database row into a validated domain identity.
pub(crate) fn row_to_identity(row: IdentityRow) -> Result<Identity, IdentityRepositoryError> {
    let role = row
        .role
        .parse::<Role>()
        .map_err(|err| IdentityRepositoryError::query(format!("corrupted role in database: {err}")))?;
    let password_hash = PasswordHash::from_stored(row.password_hash).map_err(|err| {
        IdentityRepositoryError::query(format!("corrupted credential hash in database: {err}"))
    })?;

    Identity::new(IdentityDraft {
        id: IdentityId::from_uuid(row.id),
        handle: row.handle,
        email: row.email,
        password_hash,
        role,
        is_active: row.is_active,
    })
    .map_err(|err| IdentityRepositoryError::query(err.to_string()))
}

#[async_trait]
impl IdentityRepository for DieselIdentityRepository {
    async fn find_by_id(
        &self,
        id: IdentityId,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = identities::table
            .filter(identities::id.eq(id.as_uuid()))
            .select(IdentityRow::as_select())
            .first::<IdentityRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_identity).transpose()
    }

    async fn find_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = identities::table
            .filter(identities::handle.eq(handle))
            .select(IdentityRow::as_select())
            .first::<IdentityRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_identity).transpose()
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Identity>, IdentityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = identities::table
            .filter(identities::email.eq(email))
            .select(IdentityRow::as_select())
            .first::<IdentityRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_identity).transpose()
    }

    async fn update_password(
        &self,
        id: IdentityId,
        hash: &PasswordHash,
    ) -> Result<bool, IdentityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let updated = diesel::update(identities::table.filter(identities::id.eq(id.as_uuid())))
            .set(identities::password_hash.eq(hash.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion.
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;

    #[fixture]
    fn valid_row() -> IdentityRow {
        IdentityRow {
            id: Uuid::new_v4(),
            handle: "nguyenvana".to_owned(),
            email: "nguyenvana@example.edu".to_owned(),
            password_hash: PasswordHash::derive("hunter22").as_str().to_owned(),
            role: "student".to_owned(),
            is_active: true,
        }
    }

    #[rstest]
    fn valid_rows_convert_to_identities(valid_row: IdentityRow) {
        let identity = row_to_identity(valid_row).expect("valid row converts");
        assert_eq!(identity.role(), Role::Student);
        assert!(identity.password_hash().verify("hunter22"));
    }

    #[rstest]
    fn corrupted_role_labels_are_rejected(mut valid_row: IdentityRow) {
        valid_row.role = "registrar".to_owned();
        let err = row_to_identity(valid_row).expect_err("corrupt role fails");
        assert!(matches!(err, IdentityRepositoryError::Query { .. }));
        assert!(err.to_string().contains("corrupted role"));
    }

    #[rstest]
    fn corrupted_hashes_are_rejected(mut valid_row: IdentityRow) {
        valid_row.password_hash = "not-a-hash".to_owned();
        let err = row_to_identity(valid_row).expect_err("corrupt hash fails");
        assert!(err.to_string().contains("corrupted credential hash"));
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool(PoolError::checkout("connection refused"));
        assert!(matches!(err, IdentityRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn diesel_not_found_maps_to_a_query_error() {
        let err = map_diesel(diesel::result::Error::NotFound);
        assert!(matches!(err, IdentityRepositoryError::Query { .. }));
    }
}
