use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Spacing between the installments of a payment plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Monthly,
    Biweekly,
    Weekly,
}

impl BillingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Biweekly => "biweekly",
            Self::Weekly => "weekly",
        }
    }

    /// Due date of the n-th installment for a plan opened on `sale_date`.
    ///
    /// The first installment falls one period after the sale date, so `n` is
    /// 1-based. Monthly spacing clamps to month end (Jan 31 -> Feb 28/29).
    pub fn nth_due_date(&self, sale_date: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self {
            Self::Monthly => sale_date.checked_add_months(Months::new(n)),
            Self::Biweekly => sale_date.checked_add_days(Days::new(u64::from(n) * 14)),
            Self::Weekly => sale_date.checked_add_days(Days::new(u64::from(n) * 7)),
        }
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for BillingPeriod {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "monthly" => Ok(Self::Monthly),
            "biweekly" => Ok(Self::Biweekly),
            "weekly" => Ok(Self::Weekly),
            _ => Err(format!("Invalid billing period: {}", value)),
        }
    }
}
