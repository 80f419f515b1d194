//! Shared types and result types for the database layer

pub mod errors;

pub use errors::{BookingError, DatabaseError};

pub type DatabaseResult<T> = Result<T, DatabaseError>;
pub type BookingResult<T> = Result<T, BookingError>;
