pub mod bookings;
pub mod dashboard;
pub mod documents;
pub mod error;
pub mod export;
pub mod instructors;
pub mod newsletters;
pub mod payments;
pub mod portal;
pub mod students;

pub use error::*;
