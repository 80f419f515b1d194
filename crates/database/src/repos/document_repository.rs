//! Student paperwork, saved per document type.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use crate::entities::{Document, DocumentSubmission};
use crate::types::DatabaseResult;

pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_student(&self, student_id: i64) -> DatabaseResult<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT id, student_id, doc_type, is_submitted, submitted_at, file_name \
             FROM documents WHERE student_id = ? ORDER BY id ASC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(documents)
    }

    /// Replaces the student's checklist with `submissions`.
    ///
    /// A type that was already submitted keeps its original `submitted_at`;
    /// a type marked as not submitted loses its timestamp. Rows for types
    /// missing from `submissions` are reset to not submitted.
    pub async fn save_submissions(
        &self,
        student_id: i64,
        submissions: &[DocumentSubmission],
    ) -> DatabaseResult<Vec<Document>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for submission in submissions {
            let submitted_at: Option<DateTime<Utc>> = submission.is_submitted.then_some(now);
            sqlx::query(
                "INSERT INTO documents (student_id, doc_type, is_submitted, submitted_at) \
                 VALUES (?, ?, ?, ?) \
                 ON CONFLICT (student_id, doc_type) DO UPDATE SET \
                   is_submitted = excluded.is_submitted, \
                   submitted_at = CASE \
                     WHEN excluded.is_submitted = 0 THEN NULL \
                     WHEN documents.is_submitted = 1 AND documents.submitted_at IS NOT NULL \
                       THEN documents.submitted_at \
                     ELSE excluded.submitted_at \
                   END",
            )
            .bind(student_id)
            .bind(&submission.doc_type)
            .bind(submission.is_submitted)
            .bind(submitted_at)
            .execute(&mut *tx)
            .await?;
        }

        let mut reset: QueryBuilder<Sqlite> = QueryBuilder::new(
            "UPDATE documents SET is_submitted = 0, submitted_at = NULL WHERE student_id = ",
        );
        reset.push_bind(student_id);
        if !submissions.is_empty() {
            reset.push(" AND doc_type NOT IN (");
            let mut types = reset.separated(", ");
            for submission in submissions {
                types.push_bind(submission.doc_type.clone());
            }
            types.push_unseparated(")");
        }
        reset.build().execute(&mut *tx).await?;

        tx.commit().await?;
        info!(student_id, count = submissions.len(), "saved document checklist");

        self.list_for_student(student_id).await
    }

    /// Records an uploaded file for `doc_type` and marks the type as submitted.
    pub async fn attach_file(
        &self,
        student_id: i64,
        doc_type: &str,
        file_name: &str,
    ) -> DatabaseResult<Document> {
        let document = sqlx::query_as::<_, Document>(
            "INSERT INTO documents (student_id, doc_type, is_submitted, submitted_at, file_name) \
             VALUES (?, ?, 1, ?, ?) \
             ON CONFLICT (student_id, doc_type) DO UPDATE SET \
               file_name = excluded.file_name, \
               submitted_at = CASE \
                 WHEN documents.is_submitted = 1 AND documents.submitted_at IS NOT NULL \
                   THEN documents.submitted_at \
                 ELSE excluded.submitted_at \
               END, \
               is_submitted = 1 \
             RETURNING id, student_id, doc_type, is_submitted, submitted_at, file_name",
        )
        .bind(student_id)
        .bind(doc_type)
        .bind(Utc::now())
        .bind(file_name)
        .fetch_one(&self.pool)
        .await?;

        info!(student_id, doc_type, file_name, "attached uploaded document");
        Ok(document)
    }
}
