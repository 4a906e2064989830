use rust_decimal::Decimal;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;

use crate::core::{AppError, Result};
use crate::modules::installments::models::BillingPeriod;
use crate::modules::sales::models::{PaymentType, Sale, SaleItem};

/// Repository for sale and sale-item database operations
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a sale and its items within a caller-owned transaction
    pub async fn create_with_tx(tx: &mut Transaction<'_, Sqlite>, sale: &Sale) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sales (
                id, customer_id, total, payment_type, period,
                installment_count, sale_date, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.customer_id)
        .bind(sale.total.to_string())
        .bind(sale.payment_type.to_string())
        .bind(sale.period.map(|p| p.to_string()))
        .bind(sale.installment_count)
        .bind(&sale.sale_date)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(tx.as_mut())
        .await?;

        for item in &sale.items {
            Self::insert_item_with_tx(tx, item).await?;
        }

        Ok(())
    }

    async fn insert_item_with_tx(
        tx: &mut Transaction<'_, Sqlite>,
        item: &SaleItem,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sale_items (id, sale_id, product_id, quantity, unit_price, subtotal)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price.to_string())
        .bind(item.subtotal.to_string())
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    /// Fetch a sale with its items
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, customer_id, total, payment_type, period,
                   installment_count, sale_date, created_at, updated_at
            FROM sales
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.find_items(id).await?;
        Ok(Some(row.into_sale(items)?))
    }

    /// All sales for a customer, newest first, items included
    pub async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, customer_id, total, payment_type, period,
                   installment_count, sale_date, created_at, updated_at
            FROM sales
            WHERE customer_id = ?
            ORDER BY sale_date DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        let mut sales = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.find_items(&row.id).await?;
            sales.push(row.into_sale(items)?);
        }

        Ok(sales)
    }

    async fn find_items(&self, sale_id: &str) -> Result<Vec<SaleItem>> {
        let rows = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price, subtotal
            FROM sale_items
            WHERE sale_id = ?
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    /// Delete a sale and its items within a caller-owned transaction.
    /// Installment rows are removed separately by the deletion cascade in
    /// the sales service.
    pub async fn delete_with_tx(tx: &mut Transaction<'_, Sqlite>, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM sale_items WHERE sale_id = ?")
            .bind(id)
            .execute(tx.as_mut())
            .await?;

        let rows_affected = sqlx::query("DELETE FROM sales WHERE id = ?")
            .bind(id)
            .execute(tx.as_mut())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Sale not found"));
        }

        Ok(())
    }
}

/// Database row for the sales table
#[derive(sqlx::FromRow)]
struct SaleRow {
    id: String,
    customer_id: String,
    total: String,
    payment_type: String,
    period: Option<String>,
    installment_count: Option<i64>,
    sale_date: String,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

impl SaleRow {
    fn into_sale(self, items: Vec<SaleItem>) -> Result<Sale> {
        let total = Decimal::from_str(&self.total)
            .map_err(|e| AppError::Internal(format!("Invalid total value '{}': {}", self.total, e)))?;
        let payment_type = PaymentType::try_from(self.payment_type).map_err(AppError::Internal)?;
        let period = self
            .period
            .map(BillingPeriod::try_from)
            .transpose()
            .map_err(AppError::Internal)?;

        Ok(Sale {
            id: self.id,
            customer_id: self.customer_id,
            items,
            total,
            payment_type,
            period,
            installment_count: self.installment_count,
            sale_date: self.sale_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database row for the sale_items table
#[derive(sqlx::FromRow)]
struct SaleItemRow {
    id: String,
    sale_id: String,
    product_id: String,
    quantity: i64,
    unit_price: String,
    subtotal: String,
}

impl TryFrom<SaleItemRow> for SaleItem {
    type Error = AppError;

    fn try_from(row: SaleItemRow) -> Result<Self> {
        let unit_price = Decimal::from_str(&row.unit_price).map_err(|e| {
            AppError::Internal(format!("Invalid unit_price value '{}': {}", row.unit_price, e))
        })?;
        let subtotal = Decimal::from_str(&row.subtotal).map_err(|e| {
            AppError::Internal(format!("Invalid subtotal value '{}': {}", row.subtotal, e))
        })?;

        Ok(SaleItem {
            id: row.id,
            sale_id: row.sale_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price,
            subtotal,
        })
    }
}
