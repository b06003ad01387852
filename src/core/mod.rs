//! Core business logic - framework-agnostic hostel management operations.
//!
//! Each submodule owns the operations for one concern. Nothing in here knows
//! about HTTP or any UI; callers pass a `DatabaseConnection` and receive
//! typed results.

/// Room/bed assignment, moves, deactivation, and occupancy bookkeeping
pub mod allocation;
/// Persisted notifications and best-effort email delivery
pub mod notification;
/// Rent payment recording and paid/unpaid derivation
pub mod payment;
/// Registration submission, confirmation, and rejection workflow
pub mod registration;
/// Occupancy reporting and consistency auditing
pub mod report;
/// Resident lookups
pub mod resident;
/// Room CRUD and maintenance flagging
pub mod room;
