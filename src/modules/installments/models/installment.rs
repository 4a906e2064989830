use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{calendar, AppError, Result};

/// One scheduled partial payment within a sale's payment plan.
///
/// Due dates and payment timestamps are kept as stored TEXT values: the
/// scheduling logic parses them defensively rather than trusting every row
/// in the database to be well formed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    pub id: String,
    pub sale_id: String,
    /// 1-based position within the sale's installment sequence; defines
    /// payment order
    pub installment_number: i64,
    /// Calendar due date as `YYYY-MM-DD`
    pub due_date: String,
    /// Total amount owed for this installment, fixed at creation
    pub amount: Decimal,
    /// Cumulative amount paid so far
    pub paid_amount: Decimal,
    /// `amount - paid_amount`, recomputed on every payment
    pub balance: Decimal,
    pub status: InstallmentStatus,
    /// Timestamp of the most recent payment event, null until first payment
    pub paid_date: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Installment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    /// No payment recorded yet
    Pending,
    /// Partially paid, balance outstanding
    Partial,
    /// Fully settled
    Paid,
    /// Past due without full payment; blocks successors exactly like pending
    Overdue,
}

impl InstallmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for InstallmentStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            _ => Err(format!("Invalid installment status: {}", value)),
        }
    }
}

impl Installment {
    /// Create a new pending installment
    pub fn new(
        sale_id: String,
        installment_number: i64,
        amount: Decimal,
        due_date: NaiveDate,
    ) -> Result<Self> {
        if installment_number < 1 {
            return Err(AppError::validation(format!(
                "Installment number must be at least 1, got {}",
                installment_number
            )));
        }

        if amount <= Decimal::ZERO {
            return Err(AppError::validation("Installment amount must be positive"));
        }

        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            sale_id,
            installment_number,
            due_date: due_date.format("%Y-%m-%d").to_string(),
            amount,
            paid_amount: Decimal::ZERO,
            balance: amount,
            status: InstallmentStatus::Pending,
            paid_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether this installment is fully settled
    pub fn is_settled(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    /// Record a payment against this installment.
    ///
    /// Recomputes `paid_amount`, `balance`, `status`, and `paid_date`. Becomes
    /// `paid` when the balance reaches zero, `partial` otherwise.
    pub fn apply_payment(&mut self, payment: Decimal, paid_at: NaiveDateTime) -> Result<()> {
        if self.is_settled() {
            return Err(AppError::validation(format!(
                "Installment {} is already paid",
                self.installment_number
            )));
        }

        if payment <= Decimal::ZERO {
            return Err(AppError::validation("Payment amount must be positive"));
        }

        if payment > self.balance {
            return Err(AppError::validation(format!(
                "Payment {} exceeds outstanding balance {}",
                payment, self.balance
            )));
        }

        self.paid_amount += payment;
        self.balance = self.amount - self.paid_amount;
        self.status = if self.balance <= Decimal::ZERO {
            InstallmentStatus::Paid
        } else {
            InstallmentStatus::Partial
        };
        self.paid_date = Some(paid_at.format("%Y-%m-%d %H:%M:%S").to_string());
        self.updated_at = chrono::Utc::now().naive_utc();

        Ok(())
    }

    /// Reverse all recorded payments, returning the installment to pending
    pub fn revert_payments(&mut self) -> Result<()> {
        if self.paid_amount == Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Installment {} has no payments to revert",
                self.installment_number
            )));
        }

        self.paid_amount = Decimal::ZERO;
        self.balance = self.amount;
        self.status = InstallmentStatus::Pending;
        self.paid_date = None;
        self.updated_at = chrono::Utc::now().naive_utc();

        Ok(())
    }

    /// Flag an unsettled installment as overdue
    pub fn mark_overdue(&mut self) -> Result<()> {
        if self.is_settled() {
            return Err(AppError::validation(
                "Cannot mark a paid installment as overdue",
            ));
        }

        self.status = InstallmentStatus::Overdue;
        self.updated_at = chrono::Utc::now().naive_utc();

        Ok(())
    }

    /// Whether the due date has passed without full payment.
    ///
    /// `today` is supplied by the caller; nothing in this module reads the
    /// wall clock. An unparseable due date is never considered past due.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        if self.is_settled() {
            return false;
        }

        match calendar::parse_calendar_date(&self.due_date) {
            Some(due) => due < today,
            None => false,
        }
    }
}
