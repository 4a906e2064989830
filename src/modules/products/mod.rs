// Products module

pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Product, ProductInput};
pub use repositories::ProductRepository;
pub use services::ProductService;
