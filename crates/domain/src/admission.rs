//! Rules deciding whether a lesson booking may be created or changed.
//!
//! Admission runs the checks in a fixed order and stops at the first
//! failure: student exists, theory passed, weekday, schedule available,
//! seats left, no other booking that day. Storage performs the lookups and
//! feeds the answers through these functions so the order and the
//! messages live in one place.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::types::{BookingStatus, ExamStatus, Weekday};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingRejection {
    #[error("Student not found")]
    StudentNotFound,

    #[error("Student must pass theory exam before booking practical lessons")]
    TheoryNotPassed,

    #[error("Lessons can only be booked on weekdays (Monday-Friday)")]
    WeekendDate,

    #[error("No instructor available on this day")]
    NoInstructorAvailable,

    #[error("Maximum number of students already booked for this day")]
    SlotFull,

    #[error("Student already has a lesson booked on this date")]
    AlreadyBooked,

    #[error("Booking not found")]
    BookingNotFound,

    #[error("Cannot cancel completed lessons")]
    CompletedLessonCannotBeCancelled,

    #[error("Cannot complete cancelled lessons")]
    CancelledLessonCannotBeCompleted,
}

impl BookingRejection {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BookingRejection::StudentNotFound | BookingRejection::BookingNotFound
        )
    }
}

pub fn check_theory(theory_status: ExamStatus) -> Result<(), BookingRejection> {
    if theory_status.is_passed() {
        Ok(())
    } else {
        Err(BookingRejection::TheoryNotPassed)
    }
}

/// Returns the bookable weekday of `lesson_date`.
pub fn check_weekday(lesson_date: NaiveDate) -> Result<Weekday, BookingRejection> {
    Weekday::from_calendar(lesson_date.weekday()).ok_or(BookingRejection::WeekendDate)
}

pub fn check_capacity(active_bookings: i64, max_students: i64) -> Result<(), BookingRejection> {
    if active_bookings >= max_students {
        Err(BookingRejection::SlotFull)
    } else {
        Ok(())
    }
}

pub fn check_not_double_booked(active_bookings_that_day: i64) -> Result<(), BookingRejection> {
    if active_bookings_that_day > 0 {
        Err(BookingRejection::AlreadyBooked)
    } else {
        Ok(())
    }
}

/// What applying a status change to a booking amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Apply(BookingStatus),
    Unchanged,
}

/// Any booking except a completed one can be cancelled; cancelling twice is a no-op.
pub fn cancellation(current: BookingStatus) -> Result<Transition, BookingRejection> {
    match current {
        BookingStatus::Scheduled => Ok(Transition::Apply(BookingStatus::Cancelled)),
        BookingStatus::Cancelled => Ok(Transition::Unchanged),
        BookingStatus::Completed => Err(BookingRejection::CompletedLessonCannotBeCancelled),
    }
}

/// Only scheduled lessons can be completed; completing twice is a no-op.
pub fn completion(current: BookingStatus) -> Result<Transition, BookingRejection> {
    match current {
        BookingStatus::Scheduled => Ok(Transition::Apply(BookingStatus::Completed)),
        BookingStatus::Completed => Ok(Transition::Unchanged),
        BookingStatus::Cancelled => Err(BookingRejection::CancelledLessonCannotBeCompleted),
    }
}
