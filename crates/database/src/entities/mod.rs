//! Row types for the database layer

pub mod booking;
pub mod document;
pub mod instructor;
pub mod newsletter;
pub mod payment;
pub mod settings;
pub mod student;
pub mod user;

pub use booking::{BookingDetail, BookingRequest, BookingStats, LessonBooking, StatusChange};
pub use document::{Document, DocumentSubmission};
pub use instructor::{
    AvailableSchedule, CreateInstructorRequest, Instructor, LessonSchedule, ScheduleUpdate,
};
pub use newsletter::{CreateNewsletterRequest, Newsletter};
pub use payment::{CreatePaymentRequest, Payment};
pub use settings::{Setting, DEFAULT_PRICE_CENTS};
pub use student::{
    CreateStudentRequest, Student, StudentQuery, StudentRecord, UpdateStudentRequest,
};
pub use user::{CreateUserRequest, User};
