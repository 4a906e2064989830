//! Tallybook sales and installment tracking library
//!
//! Backend domain for a small-business sales/inventory application:
//! customers, products, sales, installment payment plans, and the alert
//! queries that feed overdue/upcoming-payment and low-stock notifications.
//! Persistence is a local SQLite database; there is no network or UI surface
//! here, only the services a desktop shell embeds.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::customers;
pub use modules::installments;
pub use modules::notifications;
pub use modules::products;
pub use modules::sales;
