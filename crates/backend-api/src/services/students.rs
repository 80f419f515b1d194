use chrono::NaiveDate;
use rijschool_database::{
    BookingDetail, BookingRepository, CreateStudentRequest, DatabaseError, SettingsRepository, Student,
    StudentQuery, StudentRecord, StudentRepository, UpdateStudentRequest,
};
use rijschool_domain::{ExamRecord, LicenseCategories, LicenseCategory, PaymentStatus};
use sqlx::SqlitePool;

use super::error::ServiceError;
use crate::routes::models::{CreateStudentBody, ExamUpdateBody, StudentListQuery, UpdateStudentBody};

/// Parsed form of the student list query string.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StudentFilters {
    pub query: StudentQuery,
    pub status: Option<PaymentStatus>,
}

impl StudentFilters {
    pub fn parse(raw: &StudentListQuery) -> Result<Self, ServiceError> {
        let status = match non_empty(&raw.status) {
            Some(value) => Some(PaymentStatus::parse(value).ok_or_else(|| {
                ServiceError::bad_request("Status must be 'paid' or 'outstanding'")
            })?),
            None => None,
        };

        Ok(Self {
            query: StudentQuery {
                text: non_empty(&raw.q).map(str::to_string),
                registered_from: parse_day(&raw.from, "from")?,
                registered_to: parse_day(&raw.to, "to")?,
            },
            status,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_day(value: &Option<String>, field: &str) -> Result<Option<NaiveDate>, ServiceError> {
    non_empty(value)
        .map(|day| {
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map_err(|_| ServiceError::bad_request(format!("Invalid '{field}' date, expected YYYY-MM-DD")))
        })
        .transpose()
}

pub async fn list_students(
    pool: &SqlitePool,
    filters: &StudentFilters,
) -> Result<Vec<StudentRecord>, ServiceError> {
    let records = StudentRepository::new(pool.clone())
        .list_records(&filters.query)
        .await?;

    Ok(records
        .into_iter()
        .filter(|record| match filters.status {
            Some(status) => record.ledger().status == status,
            None => true,
        })
        .collect())
}

fn require(value: &str, field: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::bad_request(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn check_license(
    category: LicenseCategory,
    passed_exams: &LicenseCategories,
) -> Result<(), ServiceError> {
    if passed_exams.contains(category) {
        return Err(ServiceError::bad_request(format!(
            "License category {category} is already listed as passed"
        )));
    }
    Ok(())
}

fn check_price(agreed_price_cents: i64) -> Result<(), ServiceError> {
    if agreed_price_cents < 0 {
        return Err(ServiceError::bad_request("Agreed price cannot be negative"));
    }
    Ok(())
}

pub async fn create_student(
    pool: &SqlitePool,
    body: CreateStudentBody,
) -> Result<Student, ServiceError> {
    let name = require(&body.name, "Name")?;
    let id_card_number = require(&body.id_card_number, "ID card number")?;
    let contact = require(&body.contact, "Contact")?;
    let address = require(&body.address, "Address")?;
    check_license(body.license_category, &body.passed_exams)?;

    let agreed_price_cents = match body.agreed_price_cents {
        Some(price) => price,
        None => {
            SettingsRepository::new(pool.clone())
                .get_or_create()
                .await?
                .default_price_cents
        }
    };
    check_price(agreed_price_cents)?;

    let request = CreateStudentRequest {
        name,
        contact,
        address,
        id_card_number,
        license_category: body.license_category,
        agreed_price_cents,
        passed_exams: LicenseCategories::new(body.passed_exams.as_slice().to_vec()),
        registered_at: body.registered_at,
    };

    StudentRepository::new(pool.clone())
        .create(&request)
        .await
        .map_err(duplicate_id_card)
}

pub async fn get_student(
    pool: &SqlitePool,
    public_id: &str,
) -> Result<(StudentRecord, Vec<BookingDetail>), ServiceError> {
    let record = StudentRepository::new(pool.clone())
        .find_record(public_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Student not found"))?;

    let bookings = BookingRepository::new(pool.clone())
        .list_for_student(record.student.id)
        .await?;

    Ok((record, bookings))
}

pub async fn update_student(
    pool: &SqlitePool,
    public_id: &str,
    body: UpdateStudentBody,
) -> Result<Student, ServiceError> {
    check_license(body.license_category, &body.passed_exams)?;
    check_price(body.agreed_price_cents)?;

    let request = UpdateStudentRequest {
        name: require(&body.name, "Name")?,
        contact: require(&body.contact, "Contact")?,
        address: require(&body.address, "Address")?,
        id_card_number: require(&body.id_card_number, "ID card number")?,
        license_category: body.license_category,
        agreed_price_cents: body.agreed_price_cents,
        passed_exams: LicenseCategories::new(body.passed_exams.as_slice().to_vec()),
    };

    StudentRepository::new(pool.clone())
        .update_profile(public_id, &request)
        .await
        .map_err(|err| match err {
            DatabaseError::NotFound(_) => {
                ServiceError::not_found("Student not found")
            }
            other => duplicate_id_card(other),
        })
}

/// Stores exam results; a practical pass without a theory pass is downgraded.
pub async fn update_exams(
    pool: &SqlitePool,
    public_id: &str,
    body: ExamUpdateBody,
) -> Result<Student, ServiceError> {
    let exams = ExamRecord {
        theory_status: body.theory_status,
        theory_date: body.theory_date,
        practical_status: body.practical_status,
        practical_date: body.practical_date,
    };

    StudentRepository::new(pool.clone())
        .update_exams(public_id, exams)
        .await
        .map_err(|err| match err {
            DatabaseError::NotFound(_) => {
                ServiceError::not_found("Student not found")
            }
            other => other.into(),
        })
}

fn duplicate_id_card(err: DatabaseError) -> ServiceError {
    match err {
        DatabaseError::Duplicate(_) => {
            ServiceError::bad_request("A student with this ID card number already exists")
        }
        other => other.into(),
    }
}
