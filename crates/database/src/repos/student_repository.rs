//! Repository for student registrations.

use std::collections::HashMap;

use chrono::Utc;
use rijschool_domain::ExamRecord;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use crate::entities::{
    CreateStudentRequest, Document, Payment, Student, StudentQuery, StudentRecord,
    UpdateStudentRequest,
};
use crate::ids::new_public_id;
use crate::types::{DatabaseError, DatabaseResult};

const STUDENT_COLUMNS: &str = "id, public_id, name, contact, address, id_card_number, \
     license_category, agreed_price_cents, theory_status, theory_date, practical_status, \
     practical_date, passed_exams, registered_at";

pub struct StudentRepository {
    pool: SqlitePool,
}

impl StudentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreateStudentRequest) -> DatabaseResult<Student> {
        let public_id = new_public_id();
        let registered_at = request.registered_at.unwrap_or_else(Utc::now);

        let result = sqlx::query(
            "INSERT INTO students (public_id, name, contact, address, id_card_number, \
             license_category, agreed_price_cents, passed_exams, registered_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.name)
        .bind(&request.contact)
        .bind(&request.address)
        .bind(&request.id_card_number)
        .bind(request.license_category.as_str())
        .bind(request.agreed_price_cents)
        .bind(request.passed_exams.to_string())
        .bind(registered_at)
        .execute(&self.pool)
        .await?;

        let registration_id = result.last_insert_rowid();
        info!(
            registration_id,
            public_id = %public_id,
            license = %request.license_category,
            "registered new student"
        );

        self.find_by_id(registration_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("student {registration_id}")))
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?");
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> DatabaseResult<Option<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE public_id = ?");
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    /// Portal lookup; students identify themselves with their ID card number.
    pub async fn find_by_id_card(&self, id_card_number: &str) -> DatabaseResult<Option<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id_card_number = ?");
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(id_card_number.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    /// Students matching `query`, newest registration first.
    pub async fn list(&self, query: &StudentQuery) -> DatabaseResult<Vec<Student>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {STUDENT_COLUMNS} FROM students WHERE 1 = 1"));

        if let Some(text) = query.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            builder
                .push(" AND (name LIKE ")
                .push_bind(format!("%{}%", escape_like(text)))
                .push(" ESCAPE '\\'");
            if let Ok(registration_id) = text.parse::<i64>() {
                builder.push(" OR id = ").push_bind(registration_id);
            }
            builder.push(")");
        }
        if let Some(from) = query.registered_from {
            builder
                .push(" AND substr(registered_at, 1, 10) >= ")
                .push_bind(from.format("%Y-%m-%d").to_string());
        }
        if let Some(to) = query.registered_to {
            builder
                .push(" AND substr(registered_at, 1, 10) <= ")
                .push_bind(to.format("%Y-%m-%d").to_string());
        }
        builder.push(" ORDER BY registered_at DESC, id DESC");

        let students = builder
            .build_query_as::<Student>()
            .fetch_all(&self.pool)
            .await?;
        Ok(students)
    }

    /// Students matching `query` with their payments and documents attached.
    pub async fn list_records(&self, query: &StudentQuery) -> DatabaseResult<Vec<StudentRecord>> {
        let students = self.list(query).await?;
        if students.is_empty() {
            return Ok(Vec::new());
        }

        let mut payments: HashMap<i64, Vec<Payment>> = HashMap::new();
        for payment in sqlx::query_as::<_, Payment>(
            "SELECT id, student_id, amount_cents, method, paid_at FROM payments ORDER BY paid_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?
        {
            payments.entry(payment.student_id).or_default().push(payment);
        }

        let mut documents: HashMap<i64, Vec<Document>> = HashMap::new();
        for document in sqlx::query_as::<_, Document>(
            "SELECT id, student_id, doc_type, is_submitted, submitted_at, file_name FROM documents ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?
        {
            documents.entry(document.student_id).or_default().push(document);
        }

        Ok(students
            .into_iter()
            .map(|student| StudentRecord {
                payments: payments.remove(&student.id).unwrap_or_default(),
                documents: documents.remove(&student.id).unwrap_or_default(),
                student,
            })
            .collect())
    }

    pub async fn find_record(&self, public_id: &str) -> DatabaseResult<Option<StudentRecord>> {
        let Some(student) = self.find_by_public_id(public_id).await? else {
            return Ok(None);
        };

        let payments = sqlx::query_as::<_, Payment>(
            "SELECT id, student_id, amount_cents, method, paid_at FROM payments \
             WHERE student_id = ? ORDER BY paid_at ASC, id ASC",
        )
        .bind(student.id)
        .fetch_all(&self.pool)
        .await?;

        let documents = sqlx::query_as::<_, Document>(
            "SELECT id, student_id, doc_type, is_submitted, submitted_at, file_name FROM documents \
             WHERE student_id = ? ORDER BY id ASC",
        )
        .bind(student.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(StudentRecord {
            student,
            payments,
            documents,
        }))
    }

    pub async fn update_profile(
        &self,
        public_id: &str,
        request: &UpdateStudentRequest,
    ) -> DatabaseResult<Student> {
        let result = sqlx::query(
            "UPDATE students SET name = ?, contact = ?, address = ?, id_card_number = ?, \
             license_category = ?, agreed_price_cents = ?, passed_exams = ? WHERE public_id = ?",
        )
        .bind(&request.name)
        .bind(&request.contact)
        .bind(&request.address)
        .bind(&request.id_card_number)
        .bind(request.license_category.as_str())
        .bind(request.agreed_price_cents)
        .bind(request.passed_exams.to_string())
        .bind(public_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("student {public_id}")));
        }
        info!(public_id, "updated student profile");

        self.find_by_public_id(public_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("student {public_id}")))
    }

    /// Stores exam results after applying the practical-needs-theory rule.
    pub async fn update_exams(&self, public_id: &str, exams: ExamRecord) -> DatabaseResult<Student> {
        let mut exams = exams;
        if exams.reconcile() {
            info!(public_id, "practical exam downgraded, theory not passed");
        }

        let result = sqlx::query(
            "UPDATE students SET theory_status = ?, theory_date = ?, practical_status = ?, \
             practical_date = ? WHERE public_id = ?",
        )
        .bind(exams.theory_status.as_str())
        .bind(exams.theory_date)
        .bind(exams.practical_status.as_str())
        .bind(exams.practical_date)
        .bind(public_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("student {public_id}")));
        }
        info!(
            public_id,
            theory = exams.theory_status.as_str(),
            practical = exams.practical_status.as_str(),
            "updated exam results"
        );

        self.find_by_public_id(public_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("student {public_id}")))
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Escapes `LIKE` wildcards so free text only matches itself.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
