use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Outcome of a theory or practical exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExamStatus {
    #[serde(rename = "GESLAAGD")]
    Passed,
    #[default]
    #[serde(rename = "NIET_GEHAALD")]
    NotPassed,
}

impl ExamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamStatus::Passed => "GESLAAGD",
            ExamStatus::NotPassed => "NIET_GEHAALD",
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, ExamStatus::Passed)
    }
}

impl FromStr for ExamStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GESLAAGD" => Ok(ExamStatus::Passed),
            "NIET_GEHAALD" => Ok(ExamStatus::NotPassed),
            other => Err(DomainError::unknown("exam status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LicenseCategory {
    A,
    B,
    BE,
    C,
    D,
}

impl LicenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseCategory::A => "A",
            LicenseCategory::B => "B",
            LicenseCategory::BE => "BE",
            LicenseCategory::C => "C",
            LicenseCategory::D => "D",
        }
    }
}

impl FromStr for LicenseCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(LicenseCategory::A),
            "B" => Ok(LicenseCategory::B),
            "BE" => Ok(LicenseCategory::BE),
            "C" => Ok(LicenseCategory::C),
            "D" => Ok(LicenseCategory::D),
            other => Err(DomainError::unknown("license category", other)),
        }
    }
}

impl fmt::Display for LicenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookable day. Weekends are not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "MONDAY",
            Weekday::Tuesday => "TUESDAY",
            Weekday::Wednesday => "WEDNESDAY",
            Weekday::Thursday => "THURSDAY",
            Weekday::Friday => "FRIDAY",
        }
    }

    /// Position within the working week, Monday = 1.
    pub fn number(&self) -> i64 {
        match self {
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
        }
    }

    /// Maps a calendar weekday onto a bookable day; `None` for Saturday and Sunday.
    pub fn from_calendar(day: chrono::Weekday) -> Option<Self> {
        match day {
            chrono::Weekday::Mon => Some(Weekday::Monday),
            chrono::Weekday::Tue => Some(Weekday::Tuesday),
            chrono::Weekday::Wed => Some(Weekday::Wednesday),
            chrono::Weekday::Thu => Some(Weekday::Thursday),
            chrono::Weekday::Fri => Some(Weekday::Friday),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }
}

impl FromStr for Weekday {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| DomainError::unknown("weekday", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "SCHEDULED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
        }
    }

    /// Active bookings occupy a seat and block a second booking on the same day.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(BookingStatus::Scheduled),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            "COMPLETED" => Ok(BookingStatus::Completed),
            other => Err(DomainError::unknown("booking status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NewsletterCategory {
    #[default]
    General,
    Important,
}

impl NewsletterCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsletterCategory::General => "GENERAL",
            NewsletterCategory::Important => "IMPORTANT",
        }
    }
}

impl FromStr for NewsletterCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GENERAL" => Ok(NewsletterCategory::General),
            "IMPORTANT" => Ok(NewsletterCategory::Important),
            other => Err(DomainError::unknown("newsletter category", other)),
        }
    }
}

/// Role carried by an authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Instructor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Instructor => "INSTRUCTOR",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "INSTRUCTOR" => Ok(Role::Instructor),
            other => Err(DomainError::unknown("role", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lets stored text columns decode straight into the enums.
macro_rules! try_from_text {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = DomainError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }
        )+
    };
}

try_from_text!(
    ExamStatus,
    LicenseCategory,
    Weekday,
    BookingStatus,
    NewsletterCategory,
    Role,
    LicenseCategories,
);

/// Categories a student already holds, stored as a comma separated column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseCategories(Vec<LicenseCategory>);

impl LicenseCategories {
    pub fn new(categories: impl IntoIterator<Item = LicenseCategory>) -> Self {
        let mut unique = Vec::new();
        for category in categories {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        Self(unique)
    }

    pub fn contains(&self, category: LicenseCategory) -> bool {
        self.0.contains(&category)
    }

    pub fn as_slice(&self) -> &[LicenseCategory] {
        &self.0
    }
}

impl fmt::Display for LicenseCategories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.0.iter().map(|c| c.as_str()).collect();
        f.write_str(&joined.join(","))
    }
}

impl FromStr for LicenseCategories {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let categories = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<LicenseCategory>, _>>()?;
        Ok(Self::new(categories))
    }
}
