//! Strongly-typed document ID wrappers
//!
//! Document ids come from the remote database as opaque strings. Newtype
//! wrappers keep a sale's product reference from being mixed up with, say,
//! an expense id.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Fresh random id for an imported document that has none
pub fn new_document_id() -> String {
    Uuid::new_v4().to_string()
}

/// Fallback id for a document converted without one: its collection and
/// position, so repeated runs name it the same way
pub fn positional_id(collection: impl fmt::Display, index: usize) -> String {
    format!("{}#{}", collection, index)
}

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing document id
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
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

define_id!(PaymentId);
define_id!(SaleId);
define_id!(ExpenseId);
define_id!(AssetId);
define_id!(LiabilityId);
define_id!(ProductId);
define_id!(EquityEntryId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_ids_are_unique() {
        let a = new_document_id();
        let b = new_document_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_positional_id() {
        assert_eq!(positional_id("sales", 3), "sales#3");
    }

    #[test]
    fn test_display_is_raw_id() {
        let id = ProductId::new("Xk29fLq0aB77");
        assert_eq!(id.to_string(), "Xk29fLq0aB77");
        assert_eq!(SaleId::from("a1").as_str(), "a1");
    }

    #[test]
    fn test_id_serialization() {
        let id = ExpenseId::new("doc-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"doc-42\"");
        let back: ExpenseId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
