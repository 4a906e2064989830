// Sales module

pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CreateSaleRequest, PaymentType, Sale, SaleItem, SaleItemRequest};
pub use repositories::SaleRepository;
pub use services::SaleService;
