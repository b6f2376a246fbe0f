//! PostgreSQL implementations of the store traits.

pub mod appointment;
pub mod audit;
pub mod donation;
pub mod hospital;
pub mod inventory;
pub mod ledger;
pub mod matching;
pub mod notification;
pub mod request;
pub mod response;
pub mod user;

pub use appointment::AppointmentRepository;
pub use audit::AuditLogRepository;
pub use donation::DonationRepository;
pub use hospital::HospitalRepository;
pub use inventory::InventoryRepository;
pub use ledger::DonationLedgerRepository;
pub use matching::MatchRepository;
pub use notification::NotificationRepository;
pub use request::RequestRepository;
pub use response::ResponseRepository;
pub use user::UserRepository;
