use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};

/// A product the merchant stocks and sells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Unit sale price
    pub price: Decimal,
    pub stock_quantity: i64,
    /// Stock level at or below which the product is considered low on stock
    pub low_stock_threshold: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: i64,
    /// Omitted on create means "use the configured default"; omitted on
    /// update means "keep the current threshold"
    pub low_stock_threshold: Option<i64>,
}

impl Product {
    pub fn new(input: ProductInput, fallback_threshold: i64) -> Result<Self> {
        Self::validate(&input)?;

        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            price: input.price,
            stock_quantity: input.stock_quantity,
            low_stock_threshold: input.low_stock_threshold.unwrap_or(fallback_threshold),
            created_at: now,
            updated_at: now,
        })
    }

    fn validate(input: &ProductInput) -> Result<()> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("Product name cannot be empty"));
        }

        if input.price < Decimal::ZERO {
            return Err(AppError::validation("Product price cannot be negative"));
        }

        if input.stock_quantity < 0 {
            return Err(AppError::validation("Stock quantity cannot be negative"));
        }

        if matches!(input.low_stock_threshold, Some(t) if t < 0) {
            return Err(AppError::validation("Low stock threshold cannot be negative"));
        }

        Ok(())
    }

    pub fn apply(&mut self, input: ProductInput) -> Result<()> {
        Self::validate(&input)?;

        self.name = input.name.trim().to_string();
        self.price = input.price;
        self.stock_quantity = input.stock_quantity;
        if let Some(threshold) = input.low_stock_threshold {
            self.low_stock_threshold = threshold;
        }
        self.updated_at = chrono::Utc::now().naive_utc();

        Ok(())
    }

    /// Adjust stock by a signed delta; never allows stock below zero
    pub fn adjust_stock(&mut self, delta: i64) -> Result<()> {
        let updated = self.stock_quantity + delta;
        if updated < 0 {
            return Err(AppError::validation(format!(
                "Insufficient stock for '{}': have {}, requested {}",
                self.name, self.stock_quantity, -delta
            )));
        }

        self.stock_quantity = updated;
        self.updated_at = chrono::Utc::now().naive_utc();

        Ok(())
    }

    pub fn is_low_on_stock(&self) -> bool {
        self.stock_quantity <= self.low_stock_threshold
    }
}
