//! Balance reconciliation between a student's agreed price and their payments.
//!
//! All amounts are integer minor currency units (cents).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::YearMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Outstanding,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Outstanding => "outstanding",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paid" => Some(PaymentStatus::Paid),
            "outstanding" => Some(PaymentStatus::Outstanding),
            _ => None,
        }
    }
}

/// A single received payment as far as reconciliation is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    pub amount_cents: i64,
    pub paid_at: DateTime<Utc>,
}

pub fn balance(agreed_price_cents: i64, payments: &[LedgerEntry]) -> i64 {
    agreed_price_cents - total_paid(payments)
}

pub fn total_paid(payments: &[LedgerEntry]) -> i64 {
    payments.iter().map(|p| p.amount_cents).sum()
}

/// Overpayment counts as paid.
pub fn payment_status(balance: i64) -> PaymentStatus {
    if balance <= 0 {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Outstanding
    }
}

pub fn received_in_month(payments: &[LedgerEntry], month: YearMonth) -> i64 {
    let (start, end) = month.bounds();
    payments
        .iter()
        .filter(|p| {
            let at = p.paid_at.naive_utc();
            at >= start && at < end
        })
        .map(|p| p.amount_cents)
        .sum()
}

/// Per-student reconciliation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentLedger {
    pub agreed_price_cents: i64,
    pub paid_cents: i64,
    pub balance_cents: i64,
    pub status: PaymentStatus,
}

impl StudentLedger {
    pub fn reconcile(agreed_price_cents: i64, payments: &[LedgerEntry]) -> Self {
        let paid_cents = total_paid(payments);
        let balance_cents = agreed_price_cents - paid_cents;
        Self {
            agreed_price_cents,
            paid_cents,
            balance_cents,
            status: payment_status(balance_cents),
        }
    }

    /// The part of the balance still owed; overpayments contribute nothing.
    pub fn outstanding_cents(&self) -> i64 {
        self.balance_cents.max(0)
    }
}

/// School-wide payment totals for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub total_students: i64,
    pub total_received_cents: i64,
    pub month_received_cents: i64,
    pub total_outstanding_cents: i64,
}

impl LedgerTotals {
    /// Folds every student's agreed price and payments into dashboard totals.
    ///
    /// Without a month filter `month_received_cents` equals the overall total.
    pub fn collect<'a, I>(students: I, month: Option<YearMonth>) -> Self
    where
        I: IntoIterator<Item = (i64, &'a [LedgerEntry])>,
    {
        let mut totals = LedgerTotals::default();
        for (agreed, payments) in students {
            let ledger = StudentLedger::reconcile(agreed, payments);
            totals.total_students += 1;
            totals.total_received_cents += ledger.paid_cents;
            totals.total_outstanding_cents += ledger.outstanding_cents();
            totals.month_received_cents += match month {
                Some(month) => received_in_month(payments, month),
                None => ledger.paid_cents,
            };
        }
        totals
    }
}
