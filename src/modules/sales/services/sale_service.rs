use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::installments::{
    repositories::InstallmentRepository, services::PaymentScheduler,
};
use crate::modules::products::repositories::ProductRepository;
use crate::modules::sales::{
    models::{CreateSaleRequest, PaymentType, Sale, SaleItem},
    repositories::SaleRepository,
};

/// Business logic for creating and deleting sales.
///
/// A sale captures product prices at sale time, decrements stock, and for
/// installment sales builds the payment plan in the same operation. Deleting
/// a sale restores stock and cascades to its installments. Every mutation
/// runs in a single transaction: stock changes, the sale with its items, and
/// the installment plan commit together or not at all.
pub struct SaleService {
    pool: SqlitePool,
    sales: SaleRepository,
    products: ProductRepository,
}

impl SaleService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            sales: SaleRepository::new(pool.clone()),
            products: ProductRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create_sale(&self, request: CreateSaleRequest) -> Result<Sale> {
        if request.items.is_empty() {
            return Err(AppError::validation("A sale needs at least one item"));
        }

        // Resolve items against the catalog and reserve stock
        let mut items = Vec::with_capacity(request.items.len());
        let mut reserved = Vec::with_capacity(request.items.len());
        for line in &request.items {
            if line.quantity < 1 {
                return Err(AppError::validation("Item quantity must be at least 1"));
            }

            let mut product = self
                .products
                .find_by_id(&line.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Product {} not found", line.product_id))
                })?;

            product.adjust_stock(-line.quantity)?;

            items.push(SaleItem::new(
                String::new(),
                product.id.clone(),
                line.quantity,
                product.price,
            ));
            reserved.push(product);
        }

        let total: Decimal = items.iter().map(|item| item.subtotal).sum();

        let sale = Sale::new(
            request.customer_id,
            items,
            total,
            request.payment_type,
            request.period,
            request.installment_count,
            request.sale_date,
        )?;

        // Build the plan before touching the database so a bad request
        // leaves stock untouched
        let plan = if sale.payment_type == PaymentType::Installments {
            let period = sale.period.ok_or_else(|| {
                AppError::internal("Installment sale without a billing period")
            })?;
            let count = sale.installment_count.unwrap_or_default();

            Some(PaymentScheduler::build_plan(
                &sale.id,
                sale.total,
                u32::try_from(count)
                    .map_err(|_| AppError::validation("Invalid installment count"))?,
                period,
                request.sale_date,
            )?)
        } else {
            None
        };

        let mut tx = self.pool.begin().await?;

        for product in &reserved {
            ProductRepository::update_with_tx(&mut tx, product).await?;
        }

        SaleRepository::create_with_tx(&mut tx, &sale).await?;

        if let Some(plan) = &plan {
            InstallmentRepository::create_batch_with_tx(&mut tx, plan).await?;
        }

        tx.commit().await?;

        info!(
            sale_id = sale.id.as_str(),
            customer_id = sale.customer_id.as_str(),
            total = %sale.total,
            payment_type = %sale.payment_type,
            installments = plan.as_ref().map(|p| p.len()).unwrap_or(0),
            "Sale created"
        );

        Ok(sale)
    }

    pub async fn get_sale(&self, id: &str) -> Result<Sale> {
        self.sales
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Sale not found"))
    }

    pub async fn list_sales_for_customer(&self, customer_id: &str) -> Result<Vec<Sale>> {
        self.sales.find_by_customer(customer_id).await
    }

    /// Delete a sale: restores stock for its items and removes the sale,
    /// its items, and its installment plan
    pub async fn delete_sale(&self, id: &str) -> Result<()> {
        let sale = self.get_sale(id).await?;

        let mut restored = Vec::with_capacity(sale.items.len());
        for item in &sale.items {
            // Product may have been deleted since the sale; skip silently
            if let Some(mut product) = self.products.find_by_id(&item.product_id).await? {
                product.adjust_stock(item.quantity)?;
                restored.push(product);
            }
        }

        let mut tx = self.pool.begin().await?;

        for product in &restored {
            ProductRepository::update_with_tx(&mut tx, product).await?;
        }

        let removed_installments = InstallmentRepository::delete_by_sale_with_tx(&mut tx, id).await?;
        SaleRepository::delete_with_tx(&mut tx, id).await?;

        tx.commit().await?;

        info!(
            sale_id = id,
            removed_installments = removed_installments,
            "Sale deleted"
        );

        Ok(())
    }
}
