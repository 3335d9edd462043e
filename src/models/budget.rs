//! Budget model
//!
//! Budgets are fetched alongside expenses so the presentation layer can show
//! them next to a report. Aggregation does not read them.

use serde::{Deserialize, Serialize};

use super::expense::RawAmount;
use super::ids::BudgetId;

/// A spending limit for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    /// Category key the limit applies to
    pub category: String,

    /// Limit as delivered by the source
    pub amount: RawAmount,

    /// Period label, e.g. "monthly"
    #[serde(default = "default_budget_period")]
    pub period: String,
}

fn default_budget_period() -> String {
    "monthly".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_defaults_to_monthly() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "category": "food",
            "amount": 400
        }"#;
        let budget: Budget = serde_json::from_str(json).unwrap();
        assert_eq!(budget.period, "monthly");
        assert_eq!(budget.amount.parse().unwrap().cents(), 40000);
    }
}
