//! Role and business-scope access control for staff accounts.
//!
//! Two layers of checks live here:
//! - `validate_business_access` enforces the role-to-business pairing
//!   invariant when an account or invite is created or updated.
//! - `require_business` / `accessible_businesses` gate individual requests;
//!   they run against the account as currently stored, so a role or scope
//!   change takes effect on the next request.

use entity::{staff_accounts, Business, StaffRole};
use error::{AppError, Result};

/// Business scope a role demands of its account's business set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessRequirement {
    /// The set must contain both businesses.
    Both,
    /// The set must contain this business.
    One(Business),
    /// Any non-empty set is acceptable.
    Any,
}

/// The pairing each role demands.
#[must_use]
pub fn business_requirement(role: StaffRole) -> BusinessRequirement {
    match role {
        StaffRole::Owner | StaffRole::StaffBoth => BusinessRequirement::Both,
        StaffRole::GcmcManager | StaffRole::StaffGcmc => {
            BusinessRequirement::One(Business::Gcmc)
        },
        StaffRole::KajManager | StaffRole::StaffKaj => BusinessRequirement::One(Business::Kaj),
        StaffRole::Receptionist => BusinessRequirement::Any,
    }
}

/// Human-readable role label.
#[must_use]
pub fn role_display_name(role: StaffRole) -> &'static str {
    match role {
        StaffRole::Owner => "Owner",
        StaffRole::GcmcManager => "GCMC Manager",
        StaffRole::KajManager => "KAJ Manager",
        StaffRole::StaffGcmc => "GCMC Staff",
        StaffRole::StaffKaj => "KAJ Staff",
        StaffRole::StaffBoth => "Staff (Both)",
        StaffRole::Receptionist => "Receptionist",
    }
}

/// Validates that a business set is consistent with a role.
///
/// The requirement is a subset condition: the set must contain every
/// business the role demands. Extra businesses are accepted here;
/// `accessible_businesses` intersects them away at request time.
///
/// # Errors
///
/// Returns `BadRequest` naming exactly what is wrong: an empty set or a
/// missing business.
pub fn validate_business_access(role: StaffRole, businesses: &[Business]) -> Result<()> {
    if businesses.is_empty() {
        return Err(AppError::bad_request("At least one business is required"));
    }

    match business_requirement(role) {
        BusinessRequirement::Both => {
            for business in [Business::Gcmc, Business::Kaj] {
                if !businesses.contains(&business) {
                    return Err(AppError::bad_request(format!(
                        "Role {} requires access to {}",
                        role_display_name(role),
                        business.display_name()
                    )));
                }
            }
        },
        BusinessRequirement::One(required) => {
            if !businesses.contains(&required) {
                return Err(AppError::bad_request(format!(
                    "Role {} requires access to {}",
                    role_display_name(role),
                    required.display_name()
                )));
            }
        },
        BusinessRequirement::Any => {},
    }

    Ok(())
}

/// The businesses a role can ever be scoped to.
#[must_use]
pub fn role_businesses(role: StaffRole) -> Vec<Business> {
    match business_requirement(role) {
        BusinessRequirement::Both | BusinessRequirement::Any => {
            vec![Business::Gcmc, Business::Kaj]
        },
        BusinessRequirement::One(business) => vec![business],
    }
}

/// Effective business scope of an account: the stored set intersected with
/// what its role permits. A stale stored set can narrow access but never
/// widen it past the role.
#[must_use]
pub fn accessible_businesses(account: &staff_accounts::Model) -> Vec<Business> {
    let allowed = role_businesses(account.role);
    account
        .business_set()
        .into_iter()
        .filter(|b| allowed.contains(b))
        .collect()
}

/// Gates a request that touches a single business.
///
/// # Errors
///
/// Returns `Forbidden` naming the missing business when the account's
/// effective scope does not cover it.
pub fn require_business(account: &staff_accounts::Model, business: Business) -> Result<()> {
    if accessible_businesses(account).contains(&business) {
        Ok(())
    }
    else {
        Err(AppError::forbidden(format!(
            "Access to {} required",
            business.display_name()
        )))
    }
}

/// Owner and the two managers can administer staff and invites.
#[must_use]
pub fn is_admin(role: StaffRole) -> bool {
    matches!(
        role,
        StaffRole::Owner | StaffRole::GcmcManager | StaffRole::KajManager
    )
}

#[must_use]
pub fn is_owner(role: StaffRole) -> bool { role == StaffRole::Owner }

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn account(role: StaffRole, businesses: &[&str]) -> staff_accounts::Model {
        staff_accounts::Model {
            id:                  Uuid::new_v4(),
            name:                "Test".to_string(),
            email:               "test@example.com".to_string(),
            password_hash:       None,
            role,
            businesses:          serde_json::json!(businesses),
            is_active:           true,
            can_view_financials: false,
            created_at:          Utc::now(),
            updated_at:          Utc::now(),
        }
    }

    #[test]
    fn test_pairing_invariant_table() {
        // Role/business pairs that must hold.
        let valid: &[(StaffRole, &[Business])] = &[
            (StaffRole::Owner, &[Business::Gcmc, Business::Kaj]),
            (StaffRole::GcmcManager, &[Business::Gcmc]),
            (StaffRole::KajManager, &[Business::Kaj]),
            (StaffRole::StaffGcmc, &[Business::Gcmc]),
            (StaffRole::StaffKaj, &[Business::Kaj]),
            (StaffRole::StaffBoth, &[Business::Gcmc, Business::Kaj]),
            (StaffRole::GcmcManager, &[Business::Gcmc, Business::Kaj]),
            (StaffRole::StaffKaj, &[Business::Kaj, Business::Gcmc]),
            (StaffRole::Receptionist, &[Business::Gcmc]),
            (StaffRole::Receptionist, &[Business::Gcmc, Business::Kaj]),
        ];
        for (role, businesses) in valid {
            assert!(
                validate_business_access(*role, businesses).is_ok(),
                "expected valid: {:?} {:?}",
                role,
                businesses
            );
        }

        let invalid: &[(StaffRole, &[Business])] = &[
            (StaffRole::Owner, &[Business::Gcmc]),
            (StaffRole::GcmcManager, &[Business::Kaj]),
            (StaffRole::StaffKaj, &[Business::Gcmc]),
            (StaffRole::StaffBoth, &[Business::Kaj]),
            (StaffRole::Receptionist, &[]),
            (StaffRole::Owner, &[]),
        ];
        for (role, businesses) in invalid {
            assert!(
                validate_business_access(*role, businesses).is_err(),
                "expected invalid: {:?} {:?}",
                role,
                businesses
            );
        }
    }

    #[test]
    fn test_pairing_error_names_missing_business() {
        let err = validate_business_access(StaffRole::KajManager, &[Business::Gcmc]).unwrap_err();
        assert!(err.message().contains("KAJ"));

        let err = validate_business_access(StaffRole::StaffBoth, &[Business::Gcmc]).unwrap_err();
        assert!(err.message().contains("KAJ"));
    }

    #[test]
    fn test_single_business_roles_accept_supersets() {
        assert!(
            validate_business_access(StaffRole::GcmcManager, &[Business::Gcmc, Business::Kaj])
                .is_ok()
        );
        assert!(
            validate_business_access(StaffRole::StaffKaj, &[Business::Kaj, Business::Gcmc])
                .is_ok()
        );

        // The stored extras still do not widen effective access past the role.
        let manager = account(StaffRole::GcmcManager, &["gcmc", "kaj"]);
        assert_eq!(accessible_businesses(&manager), vec![Business::Gcmc]);
        assert!(require_business(&manager, Business::Kaj).is_err());
    }

    #[test]
    fn test_single_business_staff_cannot_cross_over() {
        let gcmc_staff = account(StaffRole::StaffGcmc, &["gcmc"]);
        assert!(require_business(&gcmc_staff, Business::Gcmc).is_ok());
        assert!(require_business(&gcmc_staff, Business::Kaj).is_err());
    }

    #[test]
    fn test_stored_set_cannot_widen_past_role() {
        // Stored set claims both businesses, but the role only permits GCMC.
        let staff = account(StaffRole::StaffGcmc, &["gcmc", "kaj"]);
        assert_eq!(accessible_businesses(&staff), vec![Business::Gcmc]);
        assert!(require_business(&staff, Business::Kaj).is_err());
    }

    #[test]
    fn test_forbidden_names_missing_business() {
        let kaj_staff = account(StaffRole::StaffKaj, &["kaj"]);
        let err = require_business(&kaj_staff, Business::Gcmc).unwrap_err();
        assert!(err.message().contains("GCMC"));
    }

    #[test]
    fn test_admin_predicates() {
        assert!(is_admin(StaffRole::Owner));
        assert!(is_admin(StaffRole::GcmcManager));
        assert!(is_admin(StaffRole::KajManager));
        assert!(!is_admin(StaffRole::StaffBoth));
        assert!(!is_admin(StaffRole::Receptionist));
        assert!(is_owner(StaffRole::Owner));
        assert!(!is_owner(StaffRole::GcmcManager));
    }

    #[test]
    fn test_every_role_renders() {
        let roles = [
            StaffRole::Owner,
            StaffRole::GcmcManager,
            StaffRole::KajManager,
            StaffRole::StaffGcmc,
            StaffRole::StaffKaj,
            StaffRole::StaffBoth,
            StaffRole::Receptionist,
        ];
        for role in roles {
            assert!(!role_display_name(role).is_empty());
        }
    }
}
