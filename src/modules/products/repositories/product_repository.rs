use rust_decimal::Decimal;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;

use crate::core::{AppError, Result};
use crate::modules::products::models::Product;

/// Repository for product database operations. Prices are stored as TEXT.
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, price, stock_quantity, low_stock_threshold,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price.to_string())
        .bind(product.stock_quantity)
        .bind(product.low_stock_threshold)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price, stock_quantity, low_stock_threshold,
                   created_at, updated_at
            FROM products
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

    pub async fn list(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price, stock_quantity, low_stock_threshold,
                   created_at, updated_at
            FROM products
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    /// Products at or below their low-stock threshold
    pub async fn find_low_stock(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price, stock_quantity, low_stock_threshold,
                   created_at, updated_at
            FROM products
            WHERE stock_quantity <= low_stock_threshold
            ORDER BY stock_quantity ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    pub async fn update(&self, product: &Product) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, price = ?, stock_quantity = ?, low_stock_threshold = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(product.price.to_string())
        .bind(product.stock_quantity)
        .bind(product.low_stock_threshold)
        .bind(product.updated_at)
        .bind(&product.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Product not found"));
        }

        Ok(())
    }

    /// Same update within a caller-owned transaction; used by the sales
    /// service so stock changes commit together with the sale
    pub async fn update_with_tx(
        tx: &mut Transaction<'_, Sqlite>,
        product: &Product,
    ) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, price = ?, stock_quantity = ?, low_stock_threshold = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(product.price.to_string())
        .bind(product.stock_quantity)
        .bind(product.low_stock_threshold)
        .bind(product.updated_at)
        .bind(&product.id)
        .execute(tx.as_mut())
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Product not found"));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Product not found"));
        }

        Ok(())
    }
}

/// Database row for the products table
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price: String,
    stock_quantity: i64,
    low_stock_threshold: i64,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self> {
        let price = Decimal::from_str(&row.price)
            .map_err(|e| AppError::Internal(format!("Invalid price value '{}': {}", row.price, e)))?;

        Ok(Product {
            id: row.id,
            name: row.name,
            price,
            stock_quantity: row.stock_quantity,
            low_stock_threshold: row.low_stock_threshold,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
