//! In-app notifications and outbound message dispatch.

pub mod dispatcher;
pub mod service;

pub use dispatcher::{DeliveryOutcome, FanOutReport, NotificationDispatcher};
pub use service::NotificationService;
