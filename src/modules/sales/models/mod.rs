mod sale;
mod sale_item;

pub use sale::{CreateSaleRequest, PaymentType, Sale};
pub use sale_item::{SaleItem, SaleItemRequest};
