use axum::routing::{get, post};
use axum::Router;
use http::header::{ACCEPT, CONTENT_TYPE, ORIGIN};
use http::Method;
use tower_http::cors::{Any, CorsLayer};

pub mod attendees;
pub mod client;
pub mod drive_preview;
pub mod envelope;
pub mod mark_attendance;
pub mod revoke_payment;

// Re-export for convenience
pub use attendees::AttendeesRequest;
pub use envelope::{AttendeesEnvelope, MessageEnvelope};
pub use mark_attendance::MarkAttendanceRequest;
pub use revoke_payment::RevokePaymentRequest;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST])
        .allow_headers(vec![ACCEPT, CONTENT_TYPE, ORIGIN])
        .allow_origin(Any)
        .allow_credentials(false);

    Router::new()
        .route("/attendees", get(attendees::handler))
        .route("/drive-preview", get(drive_preview::handler))
        .route("/mark-attendance", post(mark_attendance::handler))
        .route("/revoke-payment", post(revoke_payment::handler))
        .with_state(state)
        .layer(cors_layer)
}
