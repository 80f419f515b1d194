use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::ExamStatus;

/// Theory and practical exam state of one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExamRecord {
    pub theory_status: ExamStatus,
    pub theory_date: Option<NaiveDate>,
    pub practical_status: ExamStatus,
    pub practical_date: Option<NaiveDate>,
}

impl ExamRecord {
    /// Enforces that a practical pass needs a theory pass.
    ///
    /// A practical pass without a theory pass is downgraded to not passed,
    /// which also covers reverting theory on a student who had passed both.
    /// Returns true when the practical status was changed.
    pub fn reconcile(&mut self) -> bool {
        if self.practical_status.is_passed() && !self.theory_status.is_passed() {
            self.practical_status = ExamStatus::NotPassed;
            return true;
        }
        false
    }

    pub fn reconciled(mut self) -> Self {
        self.reconcile();
        self
    }

    pub fn may_book_practical_lessons(&self) -> bool {
        self.theory_status.is_passed()
    }
}
