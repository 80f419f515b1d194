use std::path::Path;

use chrono::Utc;
use rijschool_database::{Document, DocumentRepository, DocumentSubmission, StudentRepository};
use rijschool_domain::compliance::{self, REQUIRED_DOCUMENTS};
use sqlx::SqlitePool;
use tracing::info;

use super::error::ServiceError;
use crate::routes::models::{DocumentChecklistItem, SaveDocumentsBody};

/// The required documents in checklist order, followed by any other stored types.
pub fn checklist(documents: &[Document]) -> Vec<DocumentChecklistItem> {
    let item = |doc_type: &str, required: bool| {
        let stored = documents.iter().find(|d| d.doc_type == doc_type);
        DocumentChecklistItem {
            doc_type: doc_type.to_string(),
            required,
            is_submitted: stored.is_some_and(|d| d.is_submitted),
            submitted_at: stored.and_then(|d| d.submitted_at),
            file_name: stored.and_then(|d| d.file_name.clone()),
        }
    };

    REQUIRED_DOCUMENTS
        .iter()
        .map(|doc_type| item(doc_type, true))
        .chain(
            documents
                .iter()
                .filter(|d| !compliance::is_required(&d.doc_type))
                .map(|d| item(&d.doc_type, false)),
        )
        .collect()
}

async fn student_id(pool: &SqlitePool, public_id: &str) -> Result<i64, ServiceError> {
    StudentRepository::new(pool.clone())
        .find_by_public_id(public_id)
        .await?
        .map(|student| student.id)
        .ok_or_else(|| ServiceError::not_found("Student not found"))
}

pub async fn list_documents(
    pool: &SqlitePool,
    student_public_id: &str,
) -> Result<Vec<Document>, ServiceError> {
    let student_id = student_id(pool, student_public_id).await?;
    Ok(DocumentRepository::new(pool.clone())
        .list_for_student(student_id)
        .await?)
}

pub async fn save_documents(
    pool: &SqlitePool,
    student_public_id: &str,
    body: SaveDocumentsBody,
) -> Result<Vec<Document>, ServiceError> {
    let submissions = body
        .documents
        .into_iter()
        .map(|entry| {
            let doc_type = entry.doc_type.trim().to_string();
            if doc_type.is_empty() {
                return Err(ServiceError::bad_request("Document type is required"));
            }
            Ok(DocumentSubmission {
                doc_type,
                is_submitted: entry.is_submitted,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let student_id = student_id(pool, student_public_id).await?;
    Ok(DocumentRepository::new(pool.clone())
        .save_submissions(student_id, &submissions)
        .await?)
}

/// Keeps letters, digits, `_`, `.` and `-`; everything else becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// An uploaded file waiting to be stored.
pub struct Upload {
    pub doc_type: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Writes the file under `uploads_dir` with a timestamped, sanitized name
/// and marks the document type as submitted.
pub async fn store_upload(
    pool: &SqlitePool,
    uploads_dir: &Path,
    student_public_id: &str,
    upload: Upload,
) -> Result<Document, ServiceError> {
    let doc_type = upload.doc_type.trim();
    if doc_type.is_empty() {
        return Err(ServiceError::bad_request("Document type is required"));
    }
    if upload.bytes.is_empty() {
        return Err(ServiceError::bad_request("No file"));
    }

    let student_id = student_id(pool, student_public_id).await?;

    let stored_name = format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_file_name(&upload.file_name)
    );
    tokio::fs::create_dir_all(uploads_dir).await?;
    tokio::fs::write(uploads_dir.join(&stored_name), &upload.bytes).await?;
    info!(
        student_id,
        doc_type,
        file = %stored_name,
        size = upload.bytes.len(),
        "stored uploaded document"
    );

    Ok(DocumentRepository::new(pool.clone())
        .attach_file(student_id, doc_type, &stored_name)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(doc_type: &str, is_submitted: bool) -> Document {
        Document {
            id: 1,
            student_id: 1,
            doc_type: doc_type.to_string(),
            is_submitted,
            submitted_at: is_submitted.then(Utc::now),
            file_name: None,
        }
    }

    #[test]
    fn checklist_keeps_required_order_and_appends_extras() {
        let stored = vec![
            document("Medical note", true),
            document("Plakzegels", true),
            document("Pasfoto", false),
        ];
        let items = checklist(&stored);

        let types: Vec<&str> = items.iter().map(|i| i.doc_type.as_str()).collect();
        assert_eq!(
            types,
            [
                "Pasfoto",
                "Rijbewijsuittreksel",
                "Leges bewijs",
                "Plakzegels",
                "Doktersverklaring",
                "Kopie ID/Rijbewijs",
                "Medical note",
            ]
        );
        assert!(!items[0].is_submitted);
        assert!(items[3].is_submitted && items[3].submitted_at.is_some());
        assert!(!items[6].required);
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("pas foto (1).jpg"), "pas_foto__1_.jpg");
        assert_eq!(sanitize_file_name("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_file_name("scan_2024-01.pdf"), "scan_2024-01.pdf");
    }
}
