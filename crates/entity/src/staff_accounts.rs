//! Staff Accounts Entity
//!
//! Back-office staff identity: role, business scope, and credential state.
//! Accounts are deactivated, never hard-deleted. `password_hash` stays null
//! until either an admin sets a local password or the account owner consumes
//! a password setup token.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::business::Business;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:                  Uuid,
    pub name:                String,
    #[sea_orm(unique)]
    pub email:               String,
    #[serde(skip_serializing)]
    pub password_hash:       Option<String>,
    pub role:                StaffRole,
    /// JSON array of business codes; non-empty, consistent with `role`.
    pub businesses:          Json,
    pub is_active:           bool,
    pub can_view_financials: bool,
    pub created_at:          DateTimeUtc,
    pub updated_at:          DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::password_setup_tokens::Entity")]
    PasswordSetupTokens,
}

impl Related<super::password_setup_tokens::Entity> for Entity {
    fn to() -> RelationDef { Relation::PasswordSetupTokens.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Decode the stored business-scope set. An unreadable column yields an
    /// empty set, which every access check treats as "no access".
    #[must_use]
    pub fn business_set(&self) -> Vec<Business> {
        serde_json::from_value(self.businesses.clone()).unwrap_or_default()
    }
}

/// Staff role taxonomy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    #[sea_orm(string_value = "owner")]
    Owner,
    #[sea_orm(string_value = "gcmc_manager")]
    GcmcManager,
    #[sea_orm(string_value = "kaj_manager")]
    KajManager,
    #[sea_orm(string_value = "staff_gcmc")]
    StaffGcmc,
    #[sea_orm(string_value = "staff_kaj")]
    StaffKaj,
    #[sea_orm(string_value = "staff_both")]
    StaffBoth,
    #[sea_orm(string_value = "receptionist")]
    Receptionist,
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            StaffRole::Owner => "owner",
            StaffRole::GcmcManager => "gcmc_manager",
            StaffRole::KajManager => "kaj_manager",
            StaffRole::StaffGcmc => "staff_gcmc",
            StaffRole::StaffKaj => "staff_kaj",
            StaffRole::StaffBoth => "staff_both",
            StaffRole::Receptionist => "receptionist",
        };
        write!(f, "{}", code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_set_decodes_json() {
        let model = Model {
            id:                  Uuid::new_v4(),
            name:                "Ana".to_string(),
            email:               "ana@example.com".to_string(),
            password_hash:       None,
            role:                StaffRole::StaffBoth,
            businesses:          serde_json::json!(["gcmc", "kaj"]),
            is_active:           true,
            can_view_financials: false,
            created_at:          chrono::Utc::now(),
            updated_at:          chrono::Utc::now(),
        };
        assert_eq!(model.business_set(), vec![Business::Gcmc, Business::Kaj]);
    }

    #[test]
    fn test_business_set_tolerates_garbage() {
        let model = Model {
            id:                  Uuid::new_v4(),
            name:                "Ana".to_string(),
            email:               "ana@example.com".to_string(),
            password_hash:       None,
            role:                StaffRole::Receptionist,
            businesses:          serde_json::json!("not-an-array"),
            is_active:           true,
            can_view_financials: false,
            created_at:          chrono::Utc::now(),
            updated_at:          chrono::Utc::now(),
        };
        assert!(model.business_set().is_empty());
    }
}
