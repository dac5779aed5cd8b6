//! Academic records core for a single-campus registrar.
//!
//! The crate is organised hexagonally: [`domain`] holds entities,
//! validation, services, and the ports they drive; [`outbound`] holds the
//! PostgreSQL adapters implementing those ports. Presentation concerns
//! (HTTP, rendering, file-upload byte storage) live outside this crate and
//! consume the domain services through their ports.

pub mod domain;
pub mod outbound;
