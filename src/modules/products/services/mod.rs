mod product_service;

pub use product_service::{ProductService, DEFAULT_LOW_STOCK_THRESHOLD};
