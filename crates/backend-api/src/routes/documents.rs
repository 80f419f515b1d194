use axum::{
    extract::{Multipart, Path, State},
    Json,
};

use crate::{
    routes::models::{DocumentsResponse, SaveDocumentsBody},
    services::documents::{self as document_service, Upload},
    ApiError, AppState,
};

fn documents_response(documents: &[rijschool_database::Document]) -> DocumentsResponse {
    let documents = document_service::checklist(documents);
    let missing_documents = documents
        .iter()
        .filter(|item| item.required && !item.is_submitted)
        .map(|item| item.doc_type.clone())
        .collect();
    DocumentsResponse {
        documents,
        missing_documents,
    }
}

#[utoipa::path(
    get,
    path = "/admin/students/{student_id}/documents",
    tag = "Documents",
    security(("sessionToken" = [])),
    params(("student_id" = String, Path, description = "Student public identifier")),
    responses(
        (status = 200, description = "Document checklist in display order", body = DocumentsResponse),
        (status = 404, description = "Student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_documents(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<DocumentsResponse>, ApiError> {
    let documents = document_service::list_documents(state.db_pool(), &student_id).await?;
    Ok(Json(documents_response(&documents)))
}

#[utoipa::path(
    put,
    path = "/admin/students/{student_id}/documents",
    tag = "Documents",
    security(("sessionToken" = [])),
    params(("student_id" = String, Path, description = "Student public identifier")),
    request_body = SaveDocumentsBody,
    responses(
        (status = 200, description = "Checklist saved", body = DocumentsResponse),
        (status = 400, description = "Missing document type", body = crate::error::ErrorResponse),
        (status = 404, description = "Student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_documents(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(body): Json<SaveDocumentsBody>,
) -> Result<Json<DocumentsResponse>, ApiError> {
    let documents = document_service::save_documents(state.db_pool(), &student_id, body).await?;
    Ok(Json(documents_response(&documents)))
}

#[utoipa::path(
    post,
    path = "/admin/students/{student_id}/documents/upload",
    tag = "Documents",
    security(("sessionToken" = [])),
    params(("student_id" = String, Path, description = "Student public identifier")),
    request_body(content = String, content_type = "multipart/form-data", description = "Fields `type` and `file`"),
    responses(
        (status = 200, description = "File stored and document marked as submitted", body = DocumentsResponse),
        (status = 400, description = "No file or no document type", body = crate::error::ErrorResponse),
        (status = 404, description = "Student not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<DocumentsResponse>, ApiError> {
    let mut doc_type = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid upload: {e}")))?
    {
        match field.name() {
            Some("type") => {
                doc_type = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Invalid upload: {e}")))?,
                );
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid upload: {e}")))?;
                file = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or_else(|| ApiError::bad_request("No file"))?;
    let upload = Upload {
        doc_type: doc_type.unwrap_or_default(),
        file_name,
        bytes,
    };

    document_service::store_upload(state.db_pool(), state.uploads_dir(), &student_id, upload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store upload: {}", e);
            ApiError::from(e)
        })?;

    let documents = document_service::list_documents(state.db_pool(), &student_id).await?;
    Ok(Json(documents_response(&documents)))
}
