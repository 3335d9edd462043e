//! Record identifiers
//!
//! Ids are assigned by whatever ledger owns the records and are treated as
//! opaque strings. Locally created records get a random UUID. Separate
//! newtypes keep expense and budget ids from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// A fresh random id
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(ExpenseId);
define_id!(BudgetId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let a = ExpenseId::generate();
        let b = ExpenseId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_foreign_ids_pass_through() {
        let id: ExpenseId = serde_json::from_str(r#""aB3xY9kLm2""#).unwrap();
        assert_eq!(id.to_string(), "aB3xY9kLm2");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""aB3xY9kLm2""#);
    }
}
