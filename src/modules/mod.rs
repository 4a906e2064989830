pub mod customers;
pub mod installments;
pub mod notifications;
pub mod products;
pub mod sales;
