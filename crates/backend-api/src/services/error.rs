use rijschool_auth::AuthError;
use rijschool_database::{BookingError, DatabaseError};
use rijschool_domain::{BookingRejection, DomainError};

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    BadRequest(String),
    /// A booking rule said no; the message goes back to the caller verbatim.
    Rejected(BookingRejection),
    Database(DatabaseError),
    Auth(AuthError),
    Storage(std::io::Error),
    Internal(String),
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(msg) | Self::BadRequest(msg) | Self::Internal(msg) => f.write_str(msg),
            Self::Rejected(reason) => write!(f, "{reason}"),
            Self::Database(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl From<ServiceError> for crate::ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => crate::ApiError::not_found(msg),
            ServiceError::BadRequest(msg) => crate::ApiError::bad_request(msg),
            ServiceError::Rejected(reason) if reason.is_not_found() => {
                crate::ApiError::not_found(reason.to_string())
            }
            ServiceError::Rejected(reason) => crate::ApiError::bad_request(reason.to_string()),
            ServiceError::Database(DatabaseError::NotFound(msg)) => {
                tracing::debug!("Not found: {}", msg);
                crate::ApiError::not_found("Resource not found")
            }
            ServiceError::Database(DatabaseError::ValidationError(msg)) => {
                crate::ApiError::bad_request(msg)
            }
            ServiceError::Database(db_err) => {
                tracing::error!("Database error: {}", db_err);
                crate::ApiError::internal_server_error("Database operation failed")
            }
            ServiceError::Auth(auth_err) => crate::ApiError::from(auth_err),
            ServiceError::Storage(io_err) => {
                tracing::error!("Storage error: {}", io_err);
                crate::ApiError::internal_server_error("Failed to store file")
            }
            ServiceError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                crate::ApiError::internal_server_error(msg)
            }
        }
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        Self::Database(err)
    }
}

impl From<BookingError> for ServiceError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Rejected(reason) => Self::Rejected(reason),
            BookingError::DatabaseError(msg) => Self::Internal(msg),
        }
    }
}

impl From<BookingRejection> for ServiceError {
    fn from(reason: BookingRejection) -> Self {
        Self::Rejected(reason)
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err)
    }
}
