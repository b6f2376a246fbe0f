//! # lifeshare-service
//!
//! Business services for LifeShare. Each service orchestrates the store
//! traits from `lifeshare-database` and the outbound [`Mailer`] to
//! implement one slice of the donation lifecycle.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references, and [`Services`] wires the whole
//! set from a [`Repositories`] bundle and the application config.
//!
//! [`Mailer`]: lifeshare_core::traits::Mailer
//! [`Repositories`]: lifeshare_database::Repositories

pub mod admin;
pub mod context;
pub mod donation;
pub mod hospital;
pub mod inventory;
pub mod lifecycle;
pub(crate) mod lookup;
pub mod matching;
pub mod notification;
pub mod registry;
pub mod reminder;

pub use admin::{AdminReadModels, AdminStats, ResponseMatch};
pub use context::RequestContext;
pub use donation::DonationService;
pub use hospital::HospitalService;
pub use inventory::{ExpiryReport, ExpiryService, InventoryService, StockAdjustment, StockView};
pub use lifecycle::{
    AppointmentService, CompletionService, MatchResult, RequestService, ResponseService,
};
pub use matching::{MatchReport, MatchingService};
pub use notification::{DeliveryOutcome, FanOutReport, NotificationDispatcher, NotificationService};
pub use registry::Services;
pub use reminder::{ReminderReport, ReminderService};
