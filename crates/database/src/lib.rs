//! Rijschool Database Crate
//!
//! Connection management, migrations and repositories for the driving
//! school backend. Business rules come from `rijschool-domain`; this crate
//! applies them where they need to be atomic with the write.

use rijschool_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod ids;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::{run_migrations, MIGRATOR};

pub use repos::{
    BookingRepository, DocumentRepository, InstructorRepository, NewsletterRepository,
    PaymentRepository, SettingsRepository, StudentRepository, UserRepository,
};

pub use entities::{
    AvailableSchedule, BookingDetail, BookingRequest, BookingStats, CreateInstructorRequest,
    CreateNewsletterRequest, CreatePaymentRequest, CreateStudentRequest, CreateUserRequest,
    Document, DocumentSubmission, Instructor, LessonBooking, LessonSchedule, Newsletter, Payment,
    ScheduleUpdate, Setting, StatusChange, Student, StudentQuery, StudentRecord,
    UpdateStudentRequest, User, DEFAULT_PRICE_CENTS,
};

pub use types::{BookingError, BookingResult, DatabaseError, DatabaseResult};

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(pool)
}
