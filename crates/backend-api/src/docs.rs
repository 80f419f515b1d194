use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::auth::admin_login_page,
        crate::routes::auth::admin_login,
        crate::routes::auth::instructor_login_page,
        crate::routes::auth::instructor_login,
        crate::routes::auth::logout,
        crate::routes::dashboard::dashboard,
        crate::routes::dashboard::get_settings,
        crate::routes::dashboard::update_settings,
        crate::routes::students::list_students,
        crate::routes::students::create_student,
        crate::routes::students::get_student,
        crate::routes::students::update_student,
        crate::routes::students::update_exams,
        crate::routes::students::list_payments,
        crate::routes::students::create_payment,
        crate::routes::export::export_students,
        crate::routes::documents::list_documents,
        crate::routes::documents::save_documents,
        crate::routes::documents::upload_document,
        crate::routes::newsletters::list_newsletters,
        crate::routes::newsletters::create_newsletter,
        crate::routes::newsletters::publish_newsletter,
        crate::routes::newsletters::unpublish_newsletter,
        crate::routes::newsletters::delete_newsletter,
        crate::routes::newsletters::published_newsletters,
        crate::routes::instructors::list_instructors,
        crate::routes::instructors::create_instructor,
        crate::routes::instructors::instructor_data,
        crate::routes::instructors::update_schedule,
        crate::routes::instructors::instructor_schedules,
        crate::routes::instructors::portal_schedules,
        crate::routes::bookings::book_lesson,
        crate::routes::bookings::cancel_booking,
        crate::routes::bookings::complete_lesson,
        crate::routes::portal::student_portal
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::models::LoginRequest,
            crate::routes::models::SessionResponse,
            crate::routes::models::LoginPageResponse,
            crate::routes::models::SuccessResponse,
            crate::routes::models::CreateStudentBody,
            crate::routes::models::UpdateStudentBody,
            crate::routes::models::ExamUpdateBody,
            crate::routes::models::StudentSummary,
            crate::routes::models::StudentsResponse,
            crate::routes::models::StudentDetailResponse,
            crate::routes::models::StudentResponse,
            crate::routes::models::PaymentBody,
            crate::routes::models::PaymentResponse,
            crate::routes::models::PaymentsResponse,
            crate::routes::models::DocumentChecklistItem,
            crate::routes::models::DocumentsResponse,
            crate::routes::models::DocumentSubmissionBody,
            crate::routes::models::SaveDocumentsBody,
            crate::routes::models::DashboardResponse,
            crate::routes::models::SettingsResponse,
            crate::routes::models::SettingsBody,
            crate::routes::models::NewsletterBody,
            crate::routes::models::NewsletterResponse,
            crate::routes::models::NewslettersResponse,
            crate::routes::models::InstructorBody,
            crate::routes::models::InstructorResponse,
            crate::routes::models::InstructorsResponse,
            crate::routes::models::InstructorStudent,
            crate::routes::models::InstructorDataResponse,
            crate::routes::models::ScheduleItemBody,
            crate::routes::models::ScheduleUpdateBody,
            crate::routes::models::SchedulesResponse,
            crate::routes::models::BookLessonBody,
            crate::routes::models::BookLessonResponse,
            crate::routes::models::BookingStatusResponse,
            crate::routes::models::PortalResponse
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Auth", description = "Admin and instructor login"),
        (name = "Dashboard", description = "Payment totals and school settings"),
        (name = "Students", description = "Student registrations and exam results"),
        (name = "Payments", description = "Per-student payment ledger"),
        (name = "Documents", description = "Required document checklist and uploads"),
        (name = "Newsletters", description = "News for students"),
        (name = "Instructors", description = "Instructors and weekly schedules"),
        (name = "Bookings", description = "Lesson booking, cancellation and completion"),
        (name = "Portal", description = "Student self-service lookup")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        let mut scheme = SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer));
        if let SecurityScheme::Http(http) = &mut scheme {
            http.bearer_format = Some("JWT".to_string());
        }

        components
            .security_schemes
            .insert("sessionToken".to_string(), scheme);
    }
}

#[utoipa::path(
    get,
    path = "/api-docs/openapi.json",
    tag = "Health",
    responses((status = 200, description = "OpenAPI document for this service"))
)]
pub async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}
