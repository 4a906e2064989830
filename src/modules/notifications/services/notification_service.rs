use chrono::{Days, NaiveDate};
use sqlx::SqlitePool;
use tracing::info;

use crate::core::{calendar, Result};
use crate::modules::installments::repositories::InstallmentRepository;
use crate::modules::notifications::models::{
    InstallmentAlert, InstallmentAlertKind, StockAlert,
};
use crate::modules::products::repositories::ProductRepository;

/// Read-only alert queries for the notification bell.
///
/// Computes what needs attention from current data; it stores nothing and
/// delivers nothing. `today` is always an explicit argument so callers stay
/// in control of the clock.
pub struct NotificationService {
    installments: InstallmentRepository,
    products: ProductRepository,
}

impl NotificationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            installments: InstallmentRepository::new(pool.clone()),
            products: ProductRepository::new(pool),
        }
    }

    /// Unsettled installments whose due date is before `today`.
    ///
    /// Works off the due date itself, not the stored status, so an
    /// installment nobody has flagged `overdue` yet still shows up.
    pub async fn overdue_installments(&self, today: NaiveDate) -> Result<Vec<InstallmentAlert>> {
        let unsettled = self.installments.find_unsettled().await?;

        let alerts: Vec<InstallmentAlert> = unsettled
            .iter()
            .filter(|inst| inst.is_past_due(today))
            .map(|inst| InstallmentAlert {
                kind: InstallmentAlertKind::Overdue,
                installment_id: inst.id.clone(),
                sale_id: inst.sale_id.clone(),
                installment_number: inst.installment_number,
                due_date: inst.due_date.clone(),
                balance: inst.balance,
            })
            .collect();

        if !alerts.is_empty() {
            info!(count = alerts.len(), "Overdue installments found");
        }

        Ok(alerts)
    }

    /// Unsettled installments due within `window_days` of `today` (inclusive
    /// of both ends). Unparseable due dates are skipped.
    pub async fn upcoming_installments(
        &self,
        today: NaiveDate,
        window_days: u32,
    ) -> Result<Vec<InstallmentAlert>> {
        let horizon = today
            .checked_add_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MAX);

        let unsettled = self.installments.find_unsettled().await?;

        let alerts = unsettled
            .iter()
            .filter(|inst| {
                matches!(
                    calendar::parse_calendar_date(&inst.due_date),
                    Some(due) if due >= today && due <= horizon
                )
            })
            .map(|inst| InstallmentAlert {
                kind: InstallmentAlertKind::DueSoon,
                installment_id: inst.id.clone(),
                sale_id: inst.sale_id.clone(),
                installment_number: inst.installment_number,
                due_date: inst.due_date.clone(),
                balance: inst.balance,
            })
            .collect();

        Ok(alerts)
    }

    /// Products at or below their low-stock threshold
    pub async fn low_stock_products(&self) -> Result<Vec<StockAlert>> {
        let products = self.products.find_low_stock().await?;

        Ok(products
            .into_iter()
            .map(|product| StockAlert {
                product_id: product.id,
                name: product.name,
                stock_quantity: product.stock_quantity,
                low_stock_threshold: product.low_stock_threshold,
            })
            .collect())
    }
}
