//! Route definitions for the LifeShare HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::Router;
use axum::routing::{get, patch, post, put};

use crate::handlers;
use crate::state::AppState;

/// Build the API router. Layers are added by [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(request_routes())
        .merge(response_routes())
        .merge(appointment_routes())
        .merge(staff_routes())
        .merge(hospital_routes())
        .merge(donation_routes())
        .merge(notification_routes())
        .merge(admin_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Blood requests: intake, feeds, direct accept, cancel
fn request_routes() -> Router<AppState> {
    use crate::handlers::request::*;
    Router::new()
        .route("/requests", post(create_request))
        .route("/requests/mine", get(my_requests))
        .route("/requests/pending", get(pending_requests))
        .route("/requests/feed", get(donor_feed))
        .route("/requests/{id}", get(get_request))
        .route("/requests/{id}/accept", post(accept_request))
        .route("/requests/{id}/cancel", post(cancel_request))
        .route("/requests/{id}/notify-donors", post(notify_donors))
}

fn response_routes() -> Router<AppState> {
    use crate::handlers::response::*;
    Router::new()
        .route("/responses", post(create_response))
        .route("/responses/mine", get(my_responses))
        .route("/responses/{id}", patch(decide_response))
}

fn appointment_routes() -> Router<AppState> {
    use crate::handlers::appointment::*;
    Router::new()
        .route("/appointments", post(book_appointment))
        .route("/appointments/mine", get(my_appointments))
        .route("/appointments/{id}", patch(update_appointment))
        .route("/appointments/{id}/confirm", post(confirm_appointment))
}

fn staff_routes() -> Router<AppState> {
    use crate::handlers::staff::*;
    Router::new()
        .route("/staff/appointments/upcoming", get(upcoming_appointments))
        .route("/staff/appointments/{id}/verify", post(verify_appointment))
        .route("/staff/stock", get(staff_stock))
        .route("/staff/stock/adjust", post(adjust_stock))
}

fn hospital_routes() -> Router<AppState> {
    use crate::handlers::hospital::*;
    Router::new()
        .route("/hospitals/verified", get(verified_hospitals))
        .route("/hospital/appointments", get(list_appointments))
        .route(
            "/hospital/appointments/{id}/status",
            patch(update_appointment_status),
        )
        .route("/hospital/requests/accepted", get(accepted_requests))
        .route("/hospital/requests/{id}/complete", post(complete_request))
        .route("/hospital/stock", get(hospital_stock))
}

fn donation_routes() -> Router<AppState> {
    use crate::handlers::donation::*;
    Router::new()
        .route("/donations/mine", get(my_donations))
        .route("/donations/mine/count", get(donation_count))
        .route("/donations/mine/latest", get(latest_donation))
}

fn notification_routes() -> Router<AppState> {
    use crate::handlers::notification::*;
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/{id}/read", patch(mark_read))
        .route("/notifications/{id}", axum::routing::delete(delete_notification))
}

/// Admin-only: stats, hospitals, stock overview, plasma, read models, manual sweeps
fn admin_routes() -> Router<AppState> {
    use crate::handlers::admin::*;
    Router::new()
        .route("/admin/stats", get(stats))
        .route("/admin/hospitals", get(list_hospitals).post(create_hospital))
        .route("/admin/hospitals/{id}", axum::routing::delete(delete_hospital))
        .route("/admin/hospitals/{id}/verify", patch(verify_hospital))
        .route("/admin/inventory", get(all_inventory))
        .route("/admin/plasma", post(register_plasma))
        .route(
            "/admin/plasma/{id}",
            put(update_plasma).delete(delete_plasma),
        )
        .route("/admin/matches/responses", get(matches_from_responses))
        .route("/admin/matches/requests", get(matches_from_requests))
        .route("/admin/matches/completed", get(completed_matches))
        .route("/admin/triggers/reminders", post(trigger_reminders))
        .route("/admin/triggers/expiry", post(trigger_expiry))
}
