use sqlx::SqlitePool;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::customers::{
    models::{Customer, CustomerInput},
    repositories::CustomerRepository,
};

/// Thin service over customer CRUD
pub struct CustomerService {
    repository: CustomerRepository,
}

impl CustomerService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: CustomerRepository::new(pool),
        }
    }

    pub async fn create_customer(&self, input: CustomerInput) -> Result<Customer> {
        let customer = Customer::new(input)?;
        self.repository.create(&customer).await?;

        info!(customer_id = customer.id.as_str(), "Customer created");

        Ok(customer)
    }

    pub async fn get_customer(&self, id: &str) -> Result<Customer> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer not found"))
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.repository.list().await
    }

    pub async fn update_customer(&self, id: &str, input: CustomerInput) -> Result<Customer> {
        let mut customer = self.get_customer(id).await?;
        customer.apply(input)?;
        self.repository.update(&customer).await?;

        Ok(customer)
    }

    pub async fn delete_customer(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await?;

        info!(customer_id = id, "Customer deleted");

        Ok(())
    }
}
