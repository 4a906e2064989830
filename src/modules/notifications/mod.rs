// Notifications module: alert queries, no delivery

pub mod models;
pub mod services;

pub use models::{InstallmentAlert, InstallmentAlertKind, StockAlert};
pub use services::NotificationService;
