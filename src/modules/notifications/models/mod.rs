mod alert;

pub use alert::{InstallmentAlert, InstallmentAlertKind, StockAlert};
