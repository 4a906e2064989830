use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::installments::{
    models::{BillingPeriod, Installment, InstallmentStatus},
    repositories::InstallmentRepository,
    services::{outstanding_balance, PaymentScheduler},
};
use crate::modules::sales::repositories::SaleRepository;

/// Business logic for recording and reversing installment payments.
///
/// Owns the read-modify-write around the pure scheduling functions: it loads
/// a point-in-time snapshot of the sale's plan, lets `PaymentScheduler`
/// decide, and persists the outcome.
pub struct InstallmentService {
    installments: InstallmentRepository,
    sales: SaleRepository,
}

impl InstallmentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            installments: InstallmentRepository::new(pool.clone()),
            sales: SaleRepository::new(pool),
        }
    }

    /// Full installment plan for a sale, ordered by installment number
    pub async fn get_plan(&self, sale_id: &str) -> Result<Vec<Installment>> {
        self.installments.find_by_sale(sale_id).await
    }

    /// Amount still owed across a sale's unsettled installments
    pub async fn outstanding_balance(&self, sale_id: &str) -> Result<Decimal> {
        let plan = self.installments.find_by_sale(sale_id).await?;
        Ok(outstanding_balance(&plan))
    }

    pub async fn get_installment(&self, id: &str) -> Result<Installment> {
        self.installments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Installment not found"))
    }

    /// Record a payment against an installment.
    ///
    /// Enforces the sequential-payment policy: an installment can only be
    /// paid once every earlier installment in the same sale is settled. On a
    /// monthly plan, a successful payment also pushes the next pending
    /// installment's due date one calendar month past this payment.
    pub async fn record_payment(
        &self,
        installment_id: &str,
        amount: Decimal,
        paid_at: NaiveDateTime,
    ) -> Result<Installment> {
        let mut installment = self.get_installment(installment_id).await?;
        let plan = self.installments.find_by_sale(&installment.sale_id).await?;

        if !PaymentScheduler::can_pay(&plan, installment.installment_number) {
            warn!(
                installment_id = installment_id,
                installment_number = installment.installment_number,
                "Payment rejected: earlier installments outstanding"
            );

            let message = match PaymentScheduler::blocking_installment(
                &plan,
                installment.installment_number,
            ) {
                Some(blocking) => format!(
                    "Cannot pay installment {} until installment {} is settled",
                    installment.installment_number, blocking.installment_number
                ),
                None => format!(
                    "Cannot pay installment {}: earlier installments outstanding",
                    installment.installment_number
                ),
            };
            return Err(AppError::validation(message));
        }

        installment.apply_payment(amount, paid_at)?;
        self.installments.update(&installment).await?;

        info!(
            installment_id = installment_id,
            installment_number = installment.installment_number,
            status = %installment.status,
            balance = %installment.balance,
            "Payment recorded"
        );

        self.reschedule_if_monthly(&installment.sale_id).await?;

        Ok(installment)
    }

    /// For monthly plans, recompute the next pending due date from a fresh
    /// snapshot and persist it
    async fn reschedule_if_monthly(&self, sale_id: &str) -> Result<()> {
        let sale = self
            .sales
            .find_by_id(sale_id)
            .await?
            .ok_or_else(|| AppError::not_found("Sale not found"))?;

        if sale.period != Some(BillingPeriod::Monthly) {
            return Ok(());
        }

        let plan = self.installments.find_by_sale(sale_id).await?;
        if let Some(change) = PaymentScheduler::reschedule_next_pending(&plan) {
            self.installments
                .update_due_date(&change.installment_id, &change.new_due_date)
                .await?;

            info!(
                sale_id = sale_id,
                installment_id = change.installment_id.as_str(),
                new_due_date = change.new_due_date.as_str(),
                "Next pending installment rescheduled"
            );
        }

        Ok(())
    }

    /// Reverse every payment recorded against an installment, returning it
    /// to pending
    pub async fn revert_payment(&self, installment_id: &str) -> Result<Installment> {
        let mut installment = self.get_installment(installment_id).await?;
        installment.revert_payments()?;
        self.installments.update(&installment).await?;

        info!(
            installment_id = installment_id,
            installment_number = installment.installment_number,
            "Payments reverted"
        );

        Ok(installment)
    }

    /// Flag a sale's past-due unsettled installments as overdue.
    ///
    /// `today` comes from the caller; the engine itself never reads the
    /// clock, and an overdue flag changes nothing about payment ordering.
    pub async fn flag_overdue(&self, sale_id: &str, today: NaiveDate) -> Result<Vec<Installment>> {
        let plan = self.installments.find_by_sale(sale_id).await?;

        let mut flagged = Vec::new();
        for mut installment in plan {
            if installment.status != InstallmentStatus::Overdue && installment.is_past_due(today) {
                installment.mark_overdue()?;
                self.installments.update(&installment).await?;
                flagged.push(installment);
            }
        }

        if !flagged.is_empty() {
            info!(
                sale_id = sale_id,
                overdue_count = flagged.len(),
                "Installments flagged overdue"
            );
        }

        Ok(flagged)
    }
}
