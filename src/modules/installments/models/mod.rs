mod billing_period;
mod installment;

pub use billing_period::BillingPeriod;
pub use installment::{Installment, InstallmentStatus};
