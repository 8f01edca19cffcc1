//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod persistence;
