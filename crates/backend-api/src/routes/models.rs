//! Request and response bodies of the HTTP API.
//!
//! Storage entities are embedded as-is; their schemas are documented as
//! plain objects.

use chrono::{DateTime, NaiveDate, Utc};
use rijschool_database::{
    AvailableSchedule, BookingDetail, BookingStats, Instructor, LessonSchedule, Newsletter,
    Payment, Setting, Student, StudentRecord,
};
use rijschool_domain::{
    ExamStatus, LicenseCategories, LicenseCategory, NewsletterCategory, PaymentStatus, Role,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: String,
    #[schema(value_type = String)]
    pub role: Role,
    pub display_name: String,
    /// Landing page for the granted role.
    pub redirect_to: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginPageResponse {
    pub login_path: String,
    pub authenticated: bool,
    #[schema(value_type = Option<String>)]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct StudentListQuery {
    /// Name fragment, or a registration id.
    pub q: Option<String>,
    /// `paid` or `outstanding`.
    pub status: Option<String>,
    /// First registration day (YYYY-MM-DD), inclusive.
    pub from: Option<String>,
    /// Last registration day (YYYY-MM-DD), inclusive.
    pub to: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStudentBody {
    pub name: String,
    pub contact: String,
    pub address: String,
    pub id_card_number: String,
    #[schema(value_type = String, example = "B")]
    pub license_category: LicenseCategory,
    /// Falls back to the configured default price.
    pub agreed_price_cents: Option<i64>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub passed_exams: LicenseCategories,
    pub registered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStudentBody {
    pub name: String,
    pub contact: String,
    pub address: String,
    pub id_card_number: String,
    #[schema(value_type = String, example = "B")]
    pub license_category: LicenseCategory,
    pub agreed_price_cents: i64,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub passed_exams: LicenseCategories,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExamUpdateBody {
    #[schema(value_type = String, example = "GESLAAGD")]
    pub theory_status: ExamStatus,
    pub theory_date: Option<NaiveDate>,
    #[schema(value_type = String, example = "NIET_GEHAALD")]
    pub practical_status: ExamStatus,
    pub practical_date: Option<NaiveDate>,
}

/// A student with the reconciled ledger and the missing checklist entries.
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentSummary {
    #[schema(value_type = Object)]
    pub student: Student,
    pub registration_id: i64,
    pub paid_cents: i64,
    pub balance_cents: i64,
    #[schema(value_type = String, example = "outstanding")]
    pub payment_status: PaymentStatus,
    pub missing_documents: Vec<String>,
}

impl From<&StudentRecord> for StudentSummary {
    fn from(record: &StudentRecord) -> Self {
        let ledger = record.ledger();
        Self {
            registration_id: record.student.registration_id(),
            paid_cents: ledger.paid_cents,
            balance_cents: ledger.balance_cents,
            payment_status: ledger.status,
            missing_documents: record
                .missing_documents()
                .into_iter()
                .map(str::to_string)
                .collect(),
            student: record.student.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentsResponse {
    pub students: Vec<StudentSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDetailResponse {
    pub summary: StudentSummary,
    #[schema(value_type = Vec<Object>)]
    pub payments: Vec<Payment>,
    pub documents: Vec<DocumentChecklistItem>,
    #[schema(value_type = Vec<Object>)]
    pub bookings: Vec<BookingDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentResponse {
    #[schema(value_type = Object)]
    pub student: Student,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentBody {
    pub amount_cents: i64,
    pub method: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResponse {
    #[schema(value_type = Object)]
    pub payment: Payment,
    pub balance_cents: i64,
    #[schema(value_type = String)]
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentsResponse {
    #[schema(value_type = Vec<Object>)]
    pub payments: Vec<Payment>,
}

/// One line of a student's document checklist.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DocumentChecklistItem {
    pub doc_type: String,
    pub required: bool,
    pub is_submitted: bool,
    pub submitted_at: Option<DateTime<Utc>>,
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentsResponse {
    pub documents: Vec<DocumentChecklistItem>,
    pub missing_documents: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DocumentSubmissionBody {
    pub doc_type: String,
    pub is_submitted: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveDocumentsBody {
    pub documents: Vec<DocumentSubmissionBody>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DashboardQuery {
    /// Month (YYYY-MM) for the monthly received total.
    pub month: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub total_students: i64,
    pub total_received: i64,
    /// Received in `month`; equals `total_received` when no month is given.
    pub month_filtered_received: i64,
    pub total_outstanding: i64,
    pub month: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsResponse {
    #[schema(value_type = Object)]
    pub settings: Setting,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SettingsBody {
    pub default_price_cents: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewsletterBody {
    pub title: String,
    pub content: String,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "GENERAL")]
    pub category: Option<NewsletterCategory>,
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewsletterResponse {
    #[schema(value_type = Object)]
    pub newsletter: Newsletter,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewslettersResponse {
    #[schema(value_type = Vec<Object>)]
    pub newsletters: Vec<Newsletter>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InstructorBody {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstructorResponse {
    #[schema(value_type = Object)]
    pub instructor: Instructor,
    #[schema(value_type = Vec<Object>)]
    pub schedules: Vec<LessonSchedule>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstructorsResponse {
    #[schema(value_type = Vec<Object>)]
    pub instructors: Vec<Instructor>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstructorStudent {
    pub public_id: String,
    pub registration_id: i64,
    pub name: String,
    pub registered_at: DateTime<Utc>,
    #[schema(value_type = Vec<Object>)]
    pub bookings: Vec<BookingDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstructorDataResponse {
    #[schema(value_type = Object)]
    pub instructor: Instructor,
    #[schema(value_type = Vec<Object>)]
    pub schedules: Vec<LessonSchedule>,
    pub students: Vec<InstructorStudent>,
    #[schema(value_type = Object)]
    pub stats: BookingStats,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleItemBody {
    /// Schedule public id.
    pub id: String,
    pub is_available: bool,
    pub max_students: i64,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleUpdateBody {
    pub schedules: Vec<ScheduleItemBody>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SchedulesResponse {
    #[schema(value_type = Vec<Object>)]
    pub schedules: Vec<AvailableSchedule>,
    #[schema(value_type = Vec<Object>)]
    pub instructors: Vec<Instructor>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookLessonBody {
    /// Student public id.
    pub student_id: Option<String>,
    /// YYYY-MM-DD
    pub lesson_date: Option<String>,
    /// Book with this instructor only.
    pub instructor_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookLessonResponse {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub booking: BookingDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingStatusResponse {
    pub success: bool,
    pub message: String,
    /// False when the booking already had the requested status.
    pub changed: bool,
    #[schema(value_type = Object)]
    pub booking: BookingDetail,
    /// Whether the student was sent an SMS; only set for cancellations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_sent: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PortalQuery {
    /// ID card number of the student.
    pub id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PortalResponse {
    pub public_id: String,
    pub registration_id: i64,
    pub name: String,
    #[schema(value_type = String)]
    pub license_category: LicenseCategory,
    #[schema(value_type = String)]
    pub theory_status: ExamStatus,
    pub theory_date: Option<NaiveDate>,
    #[schema(value_type = String)]
    pub practical_status: ExamStatus,
    pub practical_date: Option<NaiveDate>,
    pub may_book_lessons: bool,
    pub agreed_price_cents: i64,
    pub paid_cents: i64,
    pub balance_cents: i64,
    pub completed_lessons: usize,
    #[schema(value_type = Vec<Object>)]
    pub upcoming_lessons: Vec<BookingDetail>,
}
