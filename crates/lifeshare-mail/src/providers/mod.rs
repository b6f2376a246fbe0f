//! Mail provider implementations.

pub mod http;
pub mod log;

pub use http::HttpMailer;
pub use log::LogMailer;
