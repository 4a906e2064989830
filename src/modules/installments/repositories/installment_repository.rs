use rust_decimal::Decimal;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;

use crate::core::{AppError, Result};
use crate::modules::installments::models::{Installment, InstallmentStatus};

/// Repository for installment database operations.
///
/// Monetary columns are stored as TEXT (SQLite has no decimal type) and
/// converted to `Decimal` on read; date columns stay TEXT end to end.
pub struct InstallmentRepository {
    pool: SqlitePool,
}

impl InstallmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a sale's full installment plan within a caller-owned
    /// transaction, so the plan commits together with the sale itself
    pub async fn create_batch_with_tx(
        tx: &mut Transaction<'_, Sqlite>,
        installments: &[Installment],
    ) -> Result<()> {
        for installment in installments {
            Self::insert_with_tx(tx, installment).await?;
        }

        Ok(())
    }

    async fn insert_with_tx(
        tx: &mut Transaction<'_, Sqlite>,
        installment: &Installment,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO installments (
                id, sale_id, installment_number, due_date, amount,
                paid_amount, balance, status, paid_date, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&installment.id)
        .bind(&installment.sale_id)
        .bind(installment.installment_number)
        .bind(&installment.due_date)
        .bind(installment.amount.to_string())
        .bind(installment.paid_amount.to_string())
        .bind(installment.balance.to_string())
        .bind(installment.status.to_string())
        .bind(&installment.paid_date)
        .bind(installment.created_at)
        .bind(installment.updated_at)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    /// All installments for one sale, ordered by installment number
    pub async fn find_by_sale(&self, sale_id: &str) -> Result<Vec<Installment>> {
        let rows = sqlx::query_as::<_, InstallmentRow>(
            r#"
            SELECT
                id, sale_id, installment_number, due_date, amount,
                paid_amount, balance, status, paid_date, created_at, updated_at
            FROM installments
            WHERE sale_id = ?
            ORDER BY installment_number ASC
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Installment>> {
        let row = sqlx::query_as::<_, InstallmentRow>(
            r#"
            SELECT
                id, sale_id, installment_number, due_date, amount,
                paid_amount, balance, status, paid_date, created_at, updated_at
            FROM installments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(r.try_into()?)),
            None => Ok(None),
        }
    }

    /// Every unsettled installment across all sales, ordered by due date.
    /// Feeds the overdue/upcoming alert queries.
    pub async fn find_unsettled(&self) -> Result<Vec<Installment>> {
        let rows = sqlx::query_as::<_, InstallmentRow>(
            r#"
            SELECT
                id, sale_id, installment_number, due_date, amount,
                paid_amount, balance, status, paid_date, created_at, updated_at
            FROM installments
            WHERE status != 'paid'
            ORDER BY due_date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    /// Persist payment state (paid_amount, balance, status, paid_date)
    pub async fn update(&self, installment: &Installment) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE installments
            SET
                paid_amount = ?,
                balance = ?,
                status = ?,
                paid_date = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(installment.paid_amount.to_string())
        .bind(installment.balance.to_string())
        .bind(installment.status.to_string())
        .bind(&installment.paid_date)
        .bind(installment.updated_at)
        .bind(&installment.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Installment not found"));
        }

        Ok(())
    }

    /// Persist a rescheduled due date; the only mutation the scheduler output
    /// ever drives
    pub async fn update_due_date(&self, id: &str, new_due_date: &str) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE installments
            SET due_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(new_due_date)
        .bind(chrono::Utc::now().naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Installment not found"));
        }

        Ok(())
    }

    /// Delete a sale's installments within a caller-owned transaction; part
    /// of the sale deletion cascade
    pub async fn delete_by_sale_with_tx(
        tx: &mut Transaction<'_, Sqlite>,
        sale_id: &str,
    ) -> Result<u64> {
        let rows_affected = sqlx::query("DELETE FROM installments WHERE sale_id = ?")
            .bind(sale_id)
            .execute(tx.as_mut())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

/// Database row for the installments table
#[derive(sqlx::FromRow)]
struct InstallmentRow {
    id: String,
    sale_id: String,
    installment_number: i64,
    due_date: String,
    amount: String,
    paid_amount: String,
    balance: String,
    status: String,
    paid_date: Option<String>,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

fn parse_decimal(raw: &str, column: &str) -> Result<Decimal> {
    Decimal::from_str(raw)
        .map_err(|e| AppError::Internal(format!("Invalid {} value '{}': {}", column, raw, e)))
}

impl TryFrom<InstallmentRow> for Installment {
    type Error = AppError;

    fn try_from(row: InstallmentRow) -> Result<Self> {
        let status = InstallmentStatus::try_from(row.status).map_err(AppError::Internal)?;

        Ok(Installment {
            id: row.id,
            sale_id: row.sale_id,
            installment_number: row.installment_number,
            due_date: row.due_date,
            amount: parse_decimal(&row.amount, "amount")?,
            paid_amount: parse_decimal(&row.paid_amount, "paid_amount")?,
            balance: parse_decimal(&row.balance, "balance")?,
            status,
            paid_date: row.paid_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
