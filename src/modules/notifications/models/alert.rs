use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why an installment is being surfaced to the merchant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentAlertKind {
    /// Due date has passed without full payment
    Overdue,
    /// Due within the configured upcoming window
    DueSoon,
}

/// An installment that needs the merchant's attention
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentAlert {
    pub kind: InstallmentAlertKind,
    pub installment_id: String,
    pub sale_id: String,
    pub installment_number: i64,
    pub due_date: String,
    pub balance: Decimal,
}

/// A product at or below its low-stock threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAlert {
    pub product_id: String,
    pub name: String,
    pub stock_quantity: i64,
    pub low_stock_threshold: i64,
}
