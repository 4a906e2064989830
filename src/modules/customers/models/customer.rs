use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};

/// A customer the merchant sells to
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fields accepted when creating or updating a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Customer {
    pub fn new(input: CustomerInput) -> Result<Self> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("Customer name cannot be empty"));
        }

        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            phone: input.phone,
            email: input.email,
            address: input.address,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, input: CustomerInput) -> Result<()> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("Customer name cannot be empty"));
        }

        self.name = input.name.trim().to_string();
        self.phone = input.phone;
        self.email = input.email;
        self.address = input.address;
        self.updated_at = chrono::Utc::now().naive_utc();

        Ok(())
    }
}
