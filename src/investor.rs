use crate::permission::{Action, PermissionMatrix, ResourcePermission, ResourceTag};
use crate::types::{CompanyId, InvestorId};

/// Ownership-share row linking an investor to one company.
///
/// A share is not a grant: holding an active share implies the fixed
/// [`INVESTOR_ACCESS`] profile for that company's data, never a stored
/// matrix of its own.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvestorShare {
    pub investor: InvestorId,
    pub company: CompanyId,
    /// Ownership share, 0–100.
    pub ownership_percentage: f64,
    pub is_primary_contact: bool,
    /// Revenue share, when it differs from the ownership share.
    pub profit_share_percentage: Option<f64>,
}

/// Fixed access profile implied by holding a share.
///
/// Deliberately hard-coded: every investor gets the same profile. Should a
/// per-investor matrix ever be needed, this constant is the single place to
/// replace.
pub const INVESTOR_ACCESS: PermissionMatrix = PermissionMatrix {
    vehicles: ResourcePermission::read_only(),
    rentals: ResourcePermission::read_write(),
    customers: ResourcePermission::read_only(),
    expenses: ResourcePermission::read_write(),
    insurances: ResourcePermission::read_only(),
    companies: ResourcePermission::read_write(),
    users: ResourcePermission::none(),
    settlements: ResourcePermission::full(),
    protocols: ResourcePermission::read_only(),
    statistics: ResourcePermission::none(),
    maintenance: ResourcePermission::none(),
    finances: ResourcePermission::read_only(),
    pricing: ResourcePermission::none(),
};

/// Resources whose company-scoped reads additionally require an owning
/// share in the target company.
pub const INVESTOR_SCOPED_RESOURCES: [ResourceTag; 2] =
    [ResourceTag::Companies, ResourceTag::Settlements];

/// Whether the fixed investor profile permits an action.
pub const fn share_allows(resource: ResourceTag, action: Action) -> bool {
    INVESTOR_ACCESS.allows(resource, action)
}

#[cfg(test)]
mod tests {
    use super::share_allows;
    use crate::permission::{Action, ResourceTag};

    #[test]
    fn investors_read_operational_resources() {
        for resource in [
            ResourceTag::Vehicles,
            ResourceTag::Rentals,
            ResourceTag::Expenses,
            ResourceTag::Insurances,
            ResourceTag::Companies,
            ResourceTag::Finances,
            ResourceTag::Protocols,
            ResourceTag::Settlements,
            ResourceTag::Customers,
        ] {
            assert!(share_allows(resource, Action::Read), "{resource}");
        }
        for resource in [ResourceTag::Users, ResourceTag::Statistics, ResourceTag::Maintenance] {
            assert!(!share_allows(resource, Action::Read), "{resource}");
        }
    }

    #[test]
    fn investors_write_a_narrow_subset() {
        for resource in [
            ResourceTag::Rentals,
            ResourceTag::Expenses,
            ResourceTag::Companies,
            ResourceTag::Settlements,
        ] {
            assert!(share_allows(resource, Action::Write), "{resource}");
        }
        for resource in [ResourceTag::Vehicles, ResourceTag::Customers, ResourceTag::Finances] {
            assert!(!share_allows(resource, Action::Write), "{resource}");
        }
    }

    #[test]
    fn investors_delete_settlements_only() {
        for resource in ResourceTag::ALL {
            let expected = resource == ResourceTag::Settlements;
            assert_eq!(share_allows(resource, Action::Delete), expected, "{resource}");
        }
    }
}
