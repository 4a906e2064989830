// Installment plans: scheduling rules, payment recording, rescheduling

pub mod models;
pub mod repositories;
pub mod services;

pub use models::{BillingPeriod, Installment, InstallmentStatus};
pub use repositories::InstallmentRepository;
pub use services::{DueDateChange, InstallmentService, PaymentScheduler};
