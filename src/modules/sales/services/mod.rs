mod sale_service;

pub use sale_service::SaleService;
