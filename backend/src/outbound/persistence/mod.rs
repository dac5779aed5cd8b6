//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL via Diesel with async support through `diesel-async` and
//! `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel rows and domain types; no business logic lives here.
//! - **Internal models**: the row structs in `models.rs` and the table
//!   definitions in `schema.rs` never leave this module.
//! - **Strongly typed errors**: every Diesel failure is mapped onto the
//!   owning port's error enum; uniqueness and referential violations keep
//!   their identity so services can report conflicts precisely.

mod diesel_directory_repository;
mod diesel_enrollment_repository;
mod diesel_error_mapping;
mod diesel_evaluation_repository;
mod diesel_grade_repository;
mod diesel_identity_repository;
mod diesel_material_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_directory_repository::DieselDirectoryRepository;
pub use diesel_enrollment_repository::DieselEnrollmentRepository;
pub use diesel_evaluation_repository::DieselEvaluationRepository;
pub use diesel_grade_repository::DieselGradeRepository;
pub use diesel_identity_repository::DieselIdentityRepository;
pub use diesel_material_repository::DieselMaterialRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
