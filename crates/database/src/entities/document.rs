use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: i64,
    pub student_id: i64,
    pub doc_type: String,
    pub is_submitted: bool,
    pub submitted_at: Option<DateTime<Utc>>,
    pub file_name: Option<String>,
}

/// Desired state of one checklist entry when saving a student's documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSubmission {
    pub doc_type: String,
    pub is_submitted: bool,
}
