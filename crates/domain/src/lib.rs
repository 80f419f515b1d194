//! Pure domain rules for the driving school backend.
//!
//! Nothing in this crate touches storage or the network; the database and
//! API crates feed it plain values and act on the answers.

pub mod admission;
pub mod calendar;
pub mod compliance;
pub mod error;
pub mod exams;
pub mod ledger;
pub mod types;

pub use admission::BookingRejection;
pub use calendar::YearMonth;
pub use error::DomainError;
pub use exams::ExamRecord;
pub use ledger::{PaymentStatus, StudentLedger};
pub use types::{
    BookingStatus, ExamStatus, LicenseCategories, LicenseCategory, NewsletterCategory, Role, Weekday,
};
