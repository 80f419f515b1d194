//! Database repository implementations

pub mod booking_repository;
pub mod document_repository;
pub mod instructor_repository;
pub mod newsletter_repository;
pub mod payment_repository;
pub mod settings_repository;
pub mod student_repository;
pub mod user_repository;

mod transaction;

pub use booking_repository::*;
pub use document_repository::*;
pub use instructor_repository::*;
pub use newsletter_repository::*;
pub use payment_repository::*;
pub use settings_repository::*;
pub use student_repository::*;
pub use user_repository::*;
