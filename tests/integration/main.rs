//! HTTP-level integration tests driving the full router over the in-memory store.

mod helpers;

mod admin_test;
mod auth_test;
mod inventory_test;
mod lifecycle_test;
mod notification_test;
