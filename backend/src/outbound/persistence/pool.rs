//! Async connection pool for Diesel PostgreSQL connections.
//!
//! Wraps `diesel-async` and `bb8` so the repositories can check out
//! connections without blocking the runtime. The pool bounds how many
//! connections the crate holds; every core operation runs on one checked
//! out connection and returns it when done.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout {
        /// Underlying bb8 detail.
        message: String,
    },

    /// Failed to build the connection pool.
    #[error("failed to build connection pool: {message}")]
    Build {
        /// Underlying bb8 detail.
        message: String,
    },
}

impl PoolError {
    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Configuration for the database connection pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Create a new configuration with the given database URL.
    ///
    /// Defaults to 10 connections and a 30 second checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Set the maximum number of connections in the pool.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the connection checkout timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Get the database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Async connection pool for PostgreSQL via Diesel.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Create a new connection pool with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] if the pool cannot be constructed,
    /// for example on an invalid database URL.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner: pool })
    }

    /// Get a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] if a connection cannot be obtained
    /// within the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
