//! Expense record model
//!
//! Expense records are read-only snapshots delivered by the ledger service.
//! The amount is kept exactly as the source sent it; it is only parsed when a
//! report is aggregated, so one bad value cannot stop the rest of a dataset
//! from loading.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::ids::ExpenseId;
use super::money::{Money, MoneyParseError};

/// An amount exactly as the source delivered it
///
/// Sources send either JSON numbers or decimal strings; both deserialize here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawAmount(String);

impl RawAmount {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into an exact amount
    pub fn parse(&self) -> Result<Money, MoneyParseError> {
        Money::parse(&self.0)
    }
}

impl From<Money> for RawAmount {
    fn from(money: Money) -> Self {
        Self(money.to_string())
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RawAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Text(s) => Self(s),
            Wire::Number(n) => Self(n.to_string()),
        })
    }
}

/// A single expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Unique identifier
    pub id: ExpenseId,

    /// Amount as delivered; non-negative by convention but not enforced
    pub amount: RawAmount,

    /// Category key into the category catalog
    pub category: String,

    /// Calendar date of the expense
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExpenseRecord {
    /// Create a new expense with a fresh ID
    pub fn new(
        amount: impl Into<RawAmount>,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: ExpenseId::generate(),
            amount: amount.into(),
            category: category.into(),
            date,
            description: None,
            notes: None,
        }
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder-style notes setter
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Description or empty string
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Notes or empty string
    pub fn notes_or_empty(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

impl From<&str> for RawAmount {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_accepts_number_and_string() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "amount": 12.5,
            "category": "food",
            "date": "2024-03-01"
        }"#;
        let record: ExpenseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.amount.parse().unwrap().cents(), 1250);
        assert!(record.description.is_none());

        let json = json.replace("12.5", "\"7.25\"");
        let record: ExpenseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.amount.as_str(), "7.25");
    }

    #[test]
    fn test_malformed_amount_still_loads() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "amount": "n/a",
            "category": "food",
            "date": "2024-03-01"
        }"#;
        let record: ExpenseRecord = serde_json::from_str(json).unwrap();
        assert!(record.amount.parse().is_err());
    }

    #[test]
    fn test_builder() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let record = ExpenseRecord::new(Money::from_cents(999), "food", date)
            .with_description("Lunch")
            .with_notes("team");
        assert_eq!(record.amount.as_str(), "9.99");
        assert_eq!(record.description_or_empty(), "Lunch");
        assert_eq!(record.notes_or_empty(), "team");
    }
}
