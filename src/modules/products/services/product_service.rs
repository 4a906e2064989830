use sqlx::SqlitePool;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::products::{
    models::{Product, ProductInput},
    repositories::ProductRepository,
};

/// Stock level applied to products created without a threshold of their own
/// when no configured value is supplied
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Service over product CRUD and stock adjustments
pub struct ProductService {
    repository: ProductRepository,
    default_low_stock_threshold: i64,
}

impl ProductService {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_default_threshold(pool, DEFAULT_LOW_STOCK_THRESHOLD)
    }

    /// Same service with the configured default threshold
    /// (`AppConfig::default_low_stock_threshold`)
    pub fn with_default_threshold(pool: SqlitePool, threshold: i64) -> Self {
        Self {
            repository: ProductRepository::new(pool),
            default_low_stock_threshold: threshold,
        }
    }

    pub async fn create_product(&self, input: ProductInput) -> Result<Product> {
        let product = Product::new(input, self.default_low_stock_threshold)?;
        self.repository.create(&product).await?;

        info!(
            product_id = product.id.as_str(),
            stock = product.stock_quantity,
            "Product created"
        );

        Ok(product)
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.repository.list().await
    }

    pub async fn update_product(&self, id: &str, input: ProductInput) -> Result<Product> {
        let mut product = self.get_product(id).await?;
        product.apply(input)?;
        self.repository.update(&product).await?;

        Ok(product)
    }

    /// Adjust a product's stock by a signed delta (restock or correction).
    /// Sale-driven decrements go through the sales service instead.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> Result<Product> {
        let mut product = self.get_product(id).await?;
        product.adjust_stock(delta)?;
        self.repository.update(&product).await?;

        info!(
            product_id = id,
            delta = delta,
            stock = product.stock_quantity,
            "Stock adjusted"
        );

        Ok(product)
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await?;

        info!(product_id = id, "Product deleted");

        Ok(())
    }
}
