//! Route handlers organized by domain.

pub mod admin;
pub mod appointment;
pub mod donation;
pub mod health;
pub mod hospital;
pub mod notification;
pub mod request;
pub mod response;
pub mod staff;
