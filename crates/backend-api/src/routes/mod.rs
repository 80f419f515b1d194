pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod documents;
pub mod export;
pub mod health;
pub mod instructors;
pub mod models;
pub mod newsletters;
pub mod portal;
pub mod students;
