//! # lifeshare-api
//!
//! HTTP API layer for LifeShare built on Axum.
//!
//! Provides the REST endpoints for the donation lifecycle, the `AuthUser`
//! extractor, DTOs with `validator` rules, middleware (CORS, request
//! logging) and the mapping from domain errors to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
