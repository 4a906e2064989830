mod installment_service;
mod payment_scheduler;

pub use installment_service::InstallmentService;
pub use payment_scheduler::{outstanding_balance, DueDateChange, PaymentScheduler};
