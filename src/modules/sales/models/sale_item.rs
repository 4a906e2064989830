use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One product line within a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Product price captured at sale time
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl SaleItem {
    pub fn new(sale_id: String, product_id: String, quantity: i64, unit_price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sale_id,
            product_id,
            quantity,
            unit_price,
            subtotal: unit_price * Decimal::from(quantity),
        }
    }
}

/// One requested line in a sale-creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItemRequest {
    pub product_id: String,
    pub quantity: i64,
}
