use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::installments::models::BillingPeriod;
use crate::modules::sales::models::SaleItem;

/// How a sale is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Settled in full at sale time
    Cash,
    /// Settled through an installment plan
    Installments,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Installments => "installments",
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for PaymentType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "cash" => Ok(Self::Cash),
            "installments" => Ok(Self::Installments),
            _ => Err(format!("Invalid payment type: {}", value)),
        }
    }
}

/// A transaction for one or more products.
///
/// An installment sale owns an ordered sequence of installments; those rows
/// live in the installments module and are deleted with the sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub customer_id: String,
    pub items: Vec<SaleItem>,
    pub total: Decimal,
    pub payment_type: PaymentType,
    /// Installment spacing; only present for installment sales
    pub period: Option<BillingPeriod>,
    pub installment_count: Option<i64>,
    /// Calendar date of the sale as `YYYY-MM-DD`
    pub sale_date: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload for creating a sale; unit prices come from the product catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSaleRequest {
    pub customer_id: String,
    pub items: Vec<crate::modules::sales::models::SaleItemRequest>,
    pub payment_type: PaymentType,
    pub period: Option<BillingPeriod>,
    pub installment_count: Option<i64>,
    pub sale_date: NaiveDate,
}

impl Sale {
    pub fn new(
        customer_id: String,
        items: Vec<SaleItem>,
        total: Decimal,
        payment_type: PaymentType,
        period: Option<BillingPeriod>,
        installment_count: Option<i64>,
        sale_date: NaiveDate,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(AppError::validation("A sale needs at least one item"));
        }

        if total <= Decimal::ZERO {
            return Err(AppError::validation("Sale total must be positive"));
        }

        if payment_type == PaymentType::Installments {
            if period.is_none() {
                return Err(AppError::validation(
                    "Installment sales require a billing period",
                ));
            }
            match installment_count {
                Some(count) if count >= 1 => {}
                _ => {
                    return Err(AppError::validation(
                        "Installment sales require an installment count of at least 1",
                    ))
                }
            }
        }

        let now = chrono::Utc::now().naive_utc();
        let id = Uuid::new_v4().to_string();

        // Items are built before the sale id exists; stamp it on
        let mut items = items;
        for item in &mut items {
            item.sale_id = id.clone();
        }

        Ok(Self {
            id,
            customer_id,
            items,
            total,
            payment_type,
            period,
            installment_count,
            sale_date: sale_date.format("%Y-%m-%d").to_string(),
            created_at: now,
            updated_at: now,
        })
    }
}
