//! Outbound adapters implementing domain ports for external
//! infrastructure.
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations; they contain no business
//! logic. The only infrastructure this crate talks to is PostgreSQL.

pub mod persistence;
