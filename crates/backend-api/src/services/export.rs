//! CSV export of the student register.

use rijschool_database::{StudentQuery, StudentRecord, StudentRepository};
use sqlx::SqlitePool;

use super::error::ServiceError;

pub const CSV_HEADER: [&str; 9] = [
    "RegistrationId",
    "Name",
    "Contact",
    "Address",
    "License",
    "AgreedPriceSRD",
    "PaidSRD",
    "BalanceSRD",
    "MissingDocuments",
];

/// Quotes every field and doubles embedded quotes.
pub fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Cents as currency units with two decimals, e.g. `-1250` -> `-12.50`.
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

fn csv_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn render_students_csv(records: &[StudentRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(csv_row(&CSV_HEADER));

    for record in records {
        let student = &record.student;
        let ledger = record.ledger();
        lines.push(csv_row(&[
            student.registration_id().to_string(),
            student.name.clone(),
            student.contact.clone(),
            student.address.clone(),
            student.license_category.to_string(),
            format_amount(student.agreed_price_cents),
            format_amount(ledger.paid_cents),
            format_amount(ledger.balance_cents),
            record.missing_documents().join("; "),
        ]));
    }

    lines.join("\n")
}

pub async fn export_students(pool: &SqlitePool) -> Result<String, ServiceError> {
    let records = StudentRepository::new(pool.clone())
        .list_records(&StudentQuery::default())
        .await?;
    Ok(render_students_csv(&records))
}
