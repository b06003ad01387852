//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod notification;
pub mod payment;
pub mod resident;
pub mod room;

// Re-export specific types to avoid conflicts
pub use notification::{
    Column as NotificationColumn, Entity as Notification, Model as NotificationModel,
};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use resident::{Column as ResidentColumn, Entity as Resident, Model as ResidentModel};
pub use room::{Column as RoomColumn, Entity as Room, Model as RoomModel};
