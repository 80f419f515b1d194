//! HTTP surface of the driving school back office.
//!
//! Admin pages live under `/admin`, the instructor dashboard under
//! `/instructor` and the student self-service pages under `/portal`.
//! A single [`middleware::session_guard`] layer enforces the role rules
//! for the whole router.

mod docs;
mod error;
mod middleware;
mod state;
mod util;

pub mod routes;
pub mod services;

pub use docs::ApiDoc;
pub use error::ApiError;
pub use state::AppState;
pub use util::SESSION_COOKIE;

use axum::{
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        // Login
        .route(
            "/login",
            get(routes::auth::admin_login_page).post(routes::auth::admin_login),
        )
        .route(
            "/instructor/login",
            get(routes::auth::instructor_login_page).post(routes::auth::instructor_login),
        )
        .route("/logout", post(routes::auth::logout))
        // Admin
        .route("/admin/dashboard", get(routes::dashboard::dashboard))
        .route(
            "/admin/settings",
            get(routes::dashboard::get_settings).put(routes::dashboard::update_settings),
        )
        .route(
            "/admin/students",
            get(routes::students::list_students).post(routes::students::create_student),
        )
        .route(
            "/admin/export/students",
            get(routes::export::export_students),
        )
        .route(
            "/admin/students/:student_id",
            get(routes::students::get_student).put(routes::students::update_student),
        )
        .route(
            "/admin/students/:student_id/exams",
            put(routes::students::update_exams),
        )
        .route(
            "/admin/students/:student_id/payments",
            get(routes::students::list_payments).post(routes::students::create_payment),
        )
        .route(
            "/admin/students/:student_id/documents",
            get(routes::documents::list_documents).put(routes::documents::save_documents),
        )
        .route(
            "/admin/students/:student_id/documents/upload",
            post(routes::documents::upload_document),
        )
        .route(
            "/admin/newsletters",
            get(routes::newsletters::list_newsletters)
                .post(routes::newsletters::create_newsletter),
        )
        .route(
            "/admin/newsletters/:newsletter_id",
            delete(routes::newsletters::delete_newsletter),
        )
        .route(
            "/admin/newsletters/:newsletter_id/publish",
            post(routes::newsletters::publish_newsletter),
        )
        .route(
            "/admin/newsletters/:newsletter_id/unpublish",
            post(routes::newsletters::unpublish_newsletter),
        )
        .route(
            "/admin/instructors",
            get(routes::instructors::list_instructors)
                .post(routes::instructors::create_instructor),
        )
        // Instructor
        .route("/instructor/data", get(routes::instructors::instructor_data))
        .route(
            "/instructor/schedules",
            get(routes::instructors::instructor_schedules),
        )
        .route(
            "/instructor/:instructor_id/schedule",
            put(routes::instructors::update_schedule),
        )
        .route(
            "/instructor/bookings/:booking_id/cancel",
            post(routes::bookings::cancel_booking),
        )
        .route(
            "/instructor/lessons/:booking_id/complete",
            post(routes::bookings::complete_lesson),
        )
        // Student portal
        .route("/portal", get(routes::portal::student_portal))
        .route(
            "/portal/newsletters",
            get(routes::newsletters::published_newsletters),
        )
        .route(
            "/portal/schedules",
            get(routes::instructors::portal_schedules),
        )
        .route("/portal/lessons/book", post(routes::bookings::book_lesson))
        .layer(from_fn_with_state(state.clone(), middleware::session_guard))
        .layer(cors_layer())
        .layer(from_fn(middleware::logging_middleware))
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
