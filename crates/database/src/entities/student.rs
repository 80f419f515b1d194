//! Student registrations and the records hanging off them.

use chrono::{DateTime, NaiveDate, Utc};
use rijschool_domain::compliance;
use rijschool_domain::ledger::LedgerEntry;
use rijschool_domain::{ExamRecord, ExamStatus, LicenseCategories, LicenseCategory, StudentLedger};
use serde::{Deserialize, Serialize};

use super::{Document, Payment};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    /// Also the registration number shown to staff.
    pub id: i64,
    pub public_id: String,
    pub name: String,
    pub contact: String,
    pub address: String,
    pub id_card_number: String,
    #[sqlx(try_from = "String")]
    pub license_category: LicenseCategory,
    pub agreed_price_cents: i64,
    #[sqlx(try_from = "String")]
    pub theory_status: ExamStatus,
    pub theory_date: Option<NaiveDate>,
    #[sqlx(try_from = "String")]
    pub practical_status: ExamStatus,
    pub practical_date: Option<NaiveDate>,
    #[sqlx(try_from = "String")]
    pub passed_exams: LicenseCategories,
    pub registered_at: DateTime<Utc>,
}

impl Student {
    pub fn registration_id(&self) -> i64 {
        self.id
    }

    pub fn exams(&self) -> ExamRecord {
        ExamRecord {
            theory_status: self.theory_status,
            theory_date: self.theory_date,
            practical_status: self.practical_status,
            practical_date: self.practical_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    pub contact: String,
    pub address: String,
    pub id_card_number: String,
    pub license_category: LicenseCategory,
    pub agreed_price_cents: i64,
    pub passed_exams: LicenseCategories,
    pub registered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: String,
    pub contact: String,
    pub address: String,
    pub id_card_number: String,
    pub license_category: LicenseCategory,
    pub agreed_price_cents: i64,
    pub passed_exams: LicenseCategories,
}

/// Storage-side part of the student list filters.
///
/// The paid/outstanding filter needs payments and is applied on
/// [`StudentRecord`]s afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentQuery {
    /// Case-insensitive name fragment; a number also matches the registration id.
    pub text: Option<String>,
    pub registered_from: Option<NaiveDate>,
    pub registered_to: Option<NaiveDate>,
}

/// A student together with payments and documents, ready for reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student: Student,
    pub payments: Vec<Payment>,
    pub documents: Vec<Document>,
}

impl StudentRecord {
    pub fn ledger_entries(&self) -> Vec<LedgerEntry> {
        self.payments
            .iter()
            .map(|p| LedgerEntry {
                amount_cents: p.amount_cents,
                paid_at: p.paid_at,
            })
            .collect()
    }

    pub fn ledger(&self) -> StudentLedger {
        StudentLedger::reconcile(self.student.agreed_price_cents, &self.ledger_entries())
    }

    pub fn missing_documents(&self) -> Vec<&'static str> {
        compliance::missing_documents(
            self.documents
                .iter()
                .filter(|d| d.is_submitted)
                .map(|d| d.doc_type.as_str()),
        )
    }
}
