use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::core::{calendar, AppError, Result};
use crate::modules::installments::models::{BillingPeriod, Installment, InstallmentStatus};

/// Anchor day used when a pending installment's stored due date cannot be
/// parsed
const FALLBACK_ANCHOR_DAY: u32 = 15;

/// Due-date update produced by the rescheduler; the caller persists it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueDateChange {
    pub installment_id: String,
    /// ISO calendar date, `YYYY-MM-DD`
    pub new_due_date: String,
}

/// Scheduling rules for installment plans.
///
/// Everything here is a pure computation over an in-memory snapshot of one
/// sale's installments. No state, no I/O, no wall-clock reads; persistence of
/// the results belongs to the service layer.
pub struct PaymentScheduler;

impl PaymentScheduler {
    /// Whether the installment numbered `target_number` may be paid.
    ///
    /// Sequential-payment policy: true iff every installment earlier in the
    /// sequence is already settled. Anything not `paid` blocks, whether it is
    /// flagged `pending`, `partial`, or `overdue`. The target's own status is
    /// not inspected, and no constraint is placed on later installments.
    /// An empty list never blocks.
    pub fn can_pay(installments: &[Installment], target_number: i64) -> bool {
        !installments
            .iter()
            .any(|inst| inst.installment_number < target_number && !inst.is_settled())
    }

    /// Earliest unsettled installment ahead of `target_number`, for reporting
    /// why a payment attempt was rejected
    pub fn blocking_installment(
        installments: &[Installment],
        target_number: i64,
    ) -> Option<&Installment> {
        installments
            .iter()
            .filter(|inst| inst.installment_number < target_number && !inst.is_settled())
            .min_by_key(|inst| inst.installment_number)
    }

    /// Compute a new due date for the next pending installment of a monthly
    /// plan, one calendar month after the most recent payment.
    ///
    /// The day-of-month is anchored to the pending installment's original due
    /// date and clamped to the length of the target month, so a day-31 anchor
    /// lands on Feb 29 rather than an invalid date. Unparseable paid dates
    /// are ignored; with no parseable payment to anchor to, or nothing left
    /// unpaid, there is nothing to reschedule and the result is `None`.
    pub fn reschedule_next_pending(installments: &[Installment]) -> Option<DueDateChange> {
        let last_paid: NaiveDate = installments
            .iter()
            .filter(|inst| inst.is_settled())
            .filter_map(|inst| inst.paid_date.as_deref())
            .filter_map(calendar::parse_calendar_date)
            .max()?;

        let next_pending = installments
            .iter()
            .filter(|inst| !inst.is_settled())
            .min_by_key(|inst| inst.installment_number)?;

        let anchor_day = calendar::parse_calendar_date(&next_pending.due_date)
            .map(|due| due.day())
            .unwrap_or(FALLBACK_ANCHOR_DAY);

        let (year, month) = calendar::following_month(last_paid.year(), last_paid.month());
        let day = anchor_day.min(calendar::days_in_month(year, month));

        Some(DueDateChange {
            installment_id: next_pending.id.clone(),
            new_due_date: calendar::format_calendar_date(year, month, day),
        })
    }

    /// Build the installment plan for a new sale: `count` rows with the total
    /// divided evenly (the last row absorbs the rounding remainder) and due
    /// dates spaced by `period`, starting one period after the sale date.
    pub fn build_plan(
        sale_id: &str,
        total: Decimal,
        count: u32,
        period: BillingPeriod,
        sale_date: NaiveDate,
    ) -> Result<Vec<Installment>> {
        if count == 0 {
            return Err(AppError::validation("Installment count cannot be zero"));
        }

        if total <= Decimal::ZERO {
            return Err(AppError::validation("Sale total must be positive"));
        }

        let amounts = Self::split_evenly(total, count)?;

        let mut plan = Vec::with_capacity(count as usize);
        for (i, amount) in amounts.into_iter().enumerate() {
            let number = i as u32 + 1;
            let due_date = period.nth_due_date(sale_date, number).ok_or_else(|| {
                AppError::validation(format!(
                    "Due date out of range for installment {}",
                    number
                ))
            })?;

            plan.push(Installment::new(
                sale_id.to_string(),
                i64::from(number),
                amount,
                due_date,
            )?);
        }

        Ok(plan)
    }

    /// Divide `total` into `count` amounts rounded to 2 decimal places, with
    /// the last amount absorbing the rounding difference so the sum is exact
    fn split_evenly(total: Decimal, count: u32) -> Result<Vec<Decimal>> {
        let base = (total / Decimal::from(count)).round_dp(2);

        let mut amounts = Vec::with_capacity(count as usize);
        let mut distributed = Decimal::ZERO;

        for i in 0..count {
            let amount = if i == count - 1 {
                total - distributed
            } else {
                base
            };

            if amount <= Decimal::ZERO {
                return Err(AppError::validation(
                    "Calculated installment amount must be positive",
                ));
            }

            amounts.push(amount);
            distributed += amount;
        }

        Ok(amounts)
    }
}

/// Sum of the balances still owed across a plan's unsettled installments
pub fn outstanding_balance(installments: &[Installment]) -> Decimal {
    installments
        .iter()
        .filter(|inst| !inst.is_settled())
        .map(|inst| inst.balance)
        .sum()
}
