//! In-app notification entities.

pub mod kind;
pub mod model;

pub use kind::NotificationKind;
pub use model::{NewNotification, Notification};
