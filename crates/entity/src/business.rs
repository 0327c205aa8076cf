//! Business scope enumeration shared across entities.
//!
//! GCMC is the tax/accounting practice, KAJ the training/consulting arm.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One of the two affiliated businesses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Business {
    #[sea_orm(string_value = "gcmc")]
    Gcmc,
    #[sea_orm(string_value = "kaj")]
    Kaj,
}

impl std::fmt::Display for Business {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Business::Gcmc => write!(f, "gcmc"),
            Business::Kaj => write!(f, "kaj"),
        }
    }
}

impl Business {
    /// Human-readable name for display surfaces.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Business::Gcmc => "GCMC Tax & Accounting",
            Business::Kaj => "KAJ Training & Consulting",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_display() {
        assert_eq!(Business::Gcmc.to_string(), "gcmc");
        assert_eq!(Business::Kaj.to_string(), "kaj");
    }

    #[test]
    fn test_business_serde_roundtrip() {
        let json = serde_json::to_string(&vec![Business::Gcmc, Business::Kaj]).unwrap();
        assert_eq!(json, r#"["gcmc","kaj"]"#);
        let parsed: Vec<Business> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![Business::Gcmc, Business::Kaj]);
    }
}
