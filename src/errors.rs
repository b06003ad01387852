//! Unified error types for `HostelBuddy`.
//!
//! Every allocation, registration, and payment operation returns one of these
//! typed failures to its caller. Notification and email delivery failures are
//! deliberately absent: those are logged and recorded on the notification row,
//! never propagated as a failure of the triggering workflow step.

use thiserror::Error;

/// All errors produced by the hostel management core.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or parsing failed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// Input validation failed before touching the database
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the invalid input
        message: String,
    },

    /// A unique constraint would be violated (e.g. duplicate email)
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflicting record
        message: String,
    },

    /// No resident exists with the given identifier
    #[error("Resident not found: {id}")]
    ResidentNotFound {
        /// The identifier that failed to resolve
        id: String,
    },

    /// No room exists with the given identifier or number
    #[error("Room not found: {room}")]
    RoomNotFound {
        /// The identifier or room number that failed to resolve
        room: String,
    },

    /// The room has no free beds left
    #[error("Room {room_number} is full ({capacity} beds occupied)")]
    RoomFull {
        /// Number of the full room
        room_number: String,
        /// Bed capacity of that room
        capacity: i32,
    },

    /// The requested bed is already held by another active resident
    #[error("Bed {bed_number} in room {room_number} is already taken")]
    BedTaken {
        /// Number of the room
        room_number: String,
        /// The contested bed index
        bed_number: i32,
    },

    /// A room change was requested into the resident's current room
    #[error("Resident already lives in room {room_number}")]
    SameRoom {
        /// Number of the room the resident already occupies
        room_number: String,
    },

    /// Registration decision attempted on a non-pending resident
    #[error("Registration already decided: status is {status}")]
    AlreadyDecided {
        /// The resident's current (terminal) registration status
        status: String,
    },

    /// Room deletion attempted while residents are still assigned
    #[error("Room {room_number} still houses {occupancy} resident(s)")]
    RoomOccupied {
        /// Number of the occupied room
        room_number: String,
        /// Current occupancy preventing deletion
        occupancy: i32,
    },

    /// Password hashing or credential generation failed
    #[error("Credential error: {message}")]
    Credential {
        /// Description of the failure
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Integer conversion error
    #[error("Conversion error: {0}")]
    Conversion(#[from] std::num::TryFromIntError),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
