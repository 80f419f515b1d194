use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    routes::models::{
        CreateStudentBody, ExamUpdateBody, PaymentBody, PaymentResponse, PaymentsResponse,
        StudentDetailResponse, StudentListQuery, StudentResponse, StudentSummary,
        StudentsResponse, UpdateStudentBody,
    },
    services::{documents, payments as payment_service, students as student_service},
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/admin/students",
    tag = "Students",
    security(("sessionToken" = [])),
    params(StudentListQuery),
    responses(
        (status = 200, description = "Students matching the filters", body = StudentsResponse),
        (status = 303, description = "Not signed in as admin; redirected to /login"),
        (status = 400, description = "Malformed filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> Result<Json<StudentsResponse>, ApiError> {
    let filters = student_service::StudentFilters::parse(&query)?;
    let records = student_service::list_students(state.db_pool(), &filters)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list students: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(StudentsResponse {
        students: records.iter().map(StudentSummary::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/admin/students",
    tag = "Students",
    security(("sessionToken" = [])),
    request_body = CreateStudentBody,
    responses(
        (status = 200, description = "Student registered", body = StudentResponse),
        (status = 400, description = "Missing fields, duplicate ID card or license already passed", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_student(
    State(state): State<AppState>,
    Json(body): Json<CreateStudentBody>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = student_service::create_student(state.db_pool(), body).await?;
    Ok(Json(StudentResponse { student }))
}

#[utoipa::path(
    get,
    path = "/admin/students/{student_id}",
    tag = "Students",
    security(("sessionToken" = [])),
    params(("student_id" = String, Path, description = "Student public identifier")),
    responses(
        (status = 200, description = "Student with ledger, documents and lessons", body = StudentDetailResponse),
        (status = 404, description = "Student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentDetailResponse>, ApiError> {
    let (record, bookings) = student_service::get_student(state.db_pool(), &student_id).await?;

    Ok(Json(StudentDetailResponse {
        summary: StudentSummary::from(&record),
        documents: documents::checklist(&record.documents),
        payments: record.payments,
        bookings,
    }))
}

#[utoipa::path(
    put,
    path = "/admin/students/{student_id}",
    tag = "Students",
    security(("sessionToken" = [])),
    params(("student_id" = String, Path, description = "Student public identifier")),
    request_body = UpdateStudentBody,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Invalid profile", body = crate::error::ErrorResponse),
        (status = 404, description = "Student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(body): Json<UpdateStudentBody>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = student_service::update_student(state.db_pool(), &student_id, body).await?;
    Ok(Json(StudentResponse { student }))
}

#[utoipa::path(
    put,
    path = "/admin/students/{student_id}/exams",
    tag = "Students",
    security(("sessionToken" = [])),
    params(("student_id" = String, Path, description = "Student public identifier")),
    request_body = ExamUpdateBody,
    responses(
        (status = 200, description = "Exam results stored; a practical pass without theory is downgraded", body = StudentResponse),
        (status = 404, description = "Student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_exams(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(body): Json<ExamUpdateBody>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = student_service::update_exams(state.db_pool(), &student_id, body).await?;
    Ok(Json(StudentResponse { student }))
}

#[utoipa::path(
    get,
    path = "/admin/students/{student_id}/payments",
    tag = "Payments",
    security(("sessionToken" = [])),
    params(("student_id" = String, Path, description = "Student public identifier")),
    responses(
        (status = 200, description = "Payments, oldest first", body = PaymentsResponse),
        (status = 404, description = "Student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_payments(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<PaymentsResponse>, ApiError> {
    let payments = payment_service::list_payments(state.db_pool(), &student_id).await?;
    Ok(Json(PaymentsResponse { payments }))
}

#[utoipa::path(
    post,
    path = "/admin/students/{student_id}/payments",
    tag = "Payments",
    security(("sessionToken" = [])),
    params(("student_id" = String, Path, description = "Student public identifier")),
    request_body = PaymentBody,
    responses(
        (status = 200, description = "Payment recorded", body = PaymentResponse),
        (status = 400, description = "Amount must be positive", body = crate::error::ErrorResponse),
        (status = 404, description = "Student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_payment(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(body): Json<PaymentBody>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let (payment, ledger) =
        payment_service::record_payment(state.db_pool(), &student_id, body).await?;

    Ok(Json(PaymentResponse {
        payment,
        balance_cents: ledger.balance_cents,
        payment_status: ledger.status,
    }))
}
