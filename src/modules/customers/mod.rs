// Customers module

pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Customer, CustomerInput};
pub use repositories::CustomerRepository;
pub use services::CustomerService;
