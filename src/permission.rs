use crate::types::{CompanyId, UserId};
use std::fmt;
use std::time::SystemTime;

/// Action requested against a resource.
///
/// Callers that think in CRUD terms map `create` and `update` to
/// [`Action::Write`] before calling into the engine; the engine performs no
/// implicit mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    /// Read access.
    Read,
    /// Create or update access.
    Write,
    /// Delete access.
    Delete,
}

impl Action {
    /// Every action, for exhaustive table checks.
    pub const ALL: [Action; 3] = [Action::Read, Action::Write, Action::Delete];

    /// Stable snake_case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protected business-data category.
///
/// Closed enumeration: a new resource kind extends [`PermissionMatrix`] and
/// every match over this type, checked at compile time. There is no wildcard
/// variant; bypass roles short-circuit the engine before any matrix lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResourceTag {
    Vehicles,
    Rentals,
    Customers,
    Expenses,
    Insurances,
    Companies,
    Users,
    Settlements,
    Protocols,
    Statistics,
    Maintenance,
    Finances,
    Pricing,
}

impl ResourceTag {
    /// Every known resource kind, for exhaustive table checks.
    pub const ALL: [ResourceTag; 13] = [
        ResourceTag::Vehicles,
        ResourceTag::Rentals,
        ResourceTag::Customers,
        ResourceTag::Expenses,
        ResourceTag::Insurances,
        ResourceTag::Companies,
        ResourceTag::Users,
        ResourceTag::Settlements,
        ResourceTag::Protocols,
        ResourceTag::Statistics,
        ResourceTag::Maintenance,
        ResourceTag::Finances,
        ResourceTag::Pricing,
    ];

    /// Stable snake_case name, matching the persisted matrix key.
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceTag::Vehicles => "vehicles",
            ResourceTag::Rentals => "rentals",
            ResourceTag::Customers => "customers",
            ResourceTag::Expenses => "expenses",
            ResourceTag::Insurances => "insurances",
            ResourceTag::Companies => "companies",
            ResourceTag::Users => "users",
            ResourceTag::Settlements => "settlements",
            ResourceTag::Protocols => "protocols",
            ResourceTag::Statistics => "statistics",
            ResourceTag::Maintenance => "maintenance",
            ResourceTag::Finances => "finances",
            ResourceTag::Pricing => "pricing",
        }
    }
}

impl fmt::Display for ResourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-resource permission leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ResourcePermission {
    pub read: bool,
    pub write: bool,
    pub delete: bool,
}

impl ResourcePermission {
    /// No access.
    pub const fn none() -> Self {
        Self {
            read: false,
            write: false,
            delete: false,
        }
    }

    /// Read-only access.
    pub const fn read_only() -> Self {
        Self {
            read: true,
            write: false,
            delete: false,
        }
    }

    /// Read and write access.
    pub const fn read_write() -> Self {
        Self {
            read: true,
            write: true,
            delete: false,
        }
    }

    /// Full access.
    pub const fn full() -> Self {
        Self {
            read: true,
            write: true,
            delete: true,
        }
    }

    /// Whether this leaf permits an action.
    pub const fn allows(self, action: Action) -> bool {
        match action {
            Action::Read => self.read,
            Action::Write => self.write,
            Action::Delete => self.delete,
        }
    }
}

/// Fixed-shape permission matrix with one leaf per [`ResourceTag`].
///
/// Every known resource is always present, so a lookup can never fall
/// through to an "undefined means deny" hole. The persisted JSON form omits
/// nothing the type does not: a missing key deserializes to an all-false
/// leaf, while an unknown key is rejected on the write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PermissionMatrix {
    pub vehicles: ResourcePermission,
    pub rentals: ResourcePermission,
    pub customers: ResourcePermission,
    pub expenses: ResourcePermission,
    pub insurances: ResourcePermission,
    pub companies: ResourcePermission,
    pub users: ResourcePermission,
    pub settlements: ResourcePermission,
    pub protocols: ResourcePermission,
    pub statistics: ResourcePermission,
    pub maintenance: ResourcePermission,
    pub finances: ResourcePermission,
    pub pricing: ResourcePermission,
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        Self::empty()
    }
}

impl PermissionMatrix {
    /// Matrix denying every action on every resource.
    pub const fn empty() -> Self {
        Self {
            vehicles: ResourcePermission::none(),
            rentals: ResourcePermission::none(),
            customers: ResourcePermission::none(),
            expenses: ResourcePermission::none(),
            insurances: ResourcePermission::none(),
            companies: ResourcePermission::none(),
            users: ResourcePermission::none(),
            settlements: ResourcePermission::none(),
            protocols: ResourcePermission::none(),
            statistics: ResourcePermission::none(),
            maintenance: ResourcePermission::none(),
            finances: ResourcePermission::none(),
            pricing: ResourcePermission::none(),
        }
    }

    /// Matrix allowing every action on every resource.
    pub const fn full() -> Self {
        Self {
            vehicles: ResourcePermission::full(),
            rentals: ResourcePermission::full(),
            customers: ResourcePermission::full(),
            expenses: ResourcePermission::full(),
            insurances: ResourcePermission::full(),
            companies: ResourcePermission::full(),
            users: ResourcePermission::full(),
            settlements: ResourcePermission::full(),
            protocols: ResourcePermission::full(),
            statistics: ResourcePermission::full(),
            maintenance: ResourcePermission::full(),
            finances: ResourcePermission::full(),
            pricing: ResourcePermission::full(),
        }
    }

    /// Returns the leaf for a resource.
    pub const fn get(&self, resource: ResourceTag) -> ResourcePermission {
        match resource {
            ResourceTag::Vehicles => self.vehicles,
            ResourceTag::Rentals => self.rentals,
            ResourceTag::Customers => self.customers,
            ResourceTag::Expenses => self.expenses,
            ResourceTag::Insurances => self.insurances,
            ResourceTag::Companies => self.companies,
            ResourceTag::Users => self.users,
            ResourceTag::Settlements => self.settlements,
            ResourceTag::Protocols => self.protocols,
            ResourceTag::Statistics => self.statistics,
            ResourceTag::Maintenance => self.maintenance,
            ResourceTag::Finances => self.finances,
            ResourceTag::Pricing => self.pricing,
        }
    }

    /// Replaces the leaf for a resource.
    pub fn set(&mut self, resource: ResourceTag, permission: ResourcePermission) {
        match resource {
            ResourceTag::Vehicles => self.vehicles = permission,
            ResourceTag::Rentals => self.rentals = permission,
            ResourceTag::Customers => self.customers = permission,
            ResourceTag::Expenses => self.expenses = permission,
            ResourceTag::Insurances => self.insurances = permission,
            ResourceTag::Companies => self.companies = permission,
            ResourceTag::Users => self.users = permission,
            ResourceTag::Settlements => self.settlements = permission,
            ResourceTag::Protocols => self.protocols = permission,
            ResourceTag::Statistics => self.statistics = permission,
            ResourceTag::Maintenance => self.maintenance = permission,
            ResourceTag::Finances => self.finances = permission,
            ResourceTag::Pricing => self.pricing = permission,
        }
    }

    /// Returns a copy with one leaf replaced.
    pub fn with(mut self, resource: ResourceTag, permission: ResourcePermission) -> Self {
        self.set(resource, permission);
        self
    }

    /// Whether the matrix permits an action on a resource.
    pub const fn allows(&self, resource: ResourceTag, action: Action) -> bool {
        self.get(resource).allows(action)
    }
}

#[cfg(feature = "serde")]
impl PermissionMatrix {
    /// Parses a persisted matrix column.
    ///
    /// Missing resource keys default to all-false leaves; an unknown key or
    /// a non-boolean leaf is a validation error.
    pub fn from_json(value: &str) -> crate::error::Result<Self> {
        serde_json::from_str(value).map_err(|err| crate::error::Error::Validation(err.to_string()))
    }

    /// Serializes the matrix for its persisted column.
    pub fn to_json(&self) -> crate::error::Result<String> {
        serde_json::to_string(self).map_err(|err| crate::error::Error::Validation(err.to_string()))
    }
}

/// Persisted unit: one user's permission matrix within one company.
///
/// Unique per `(user, company)`; absence of a grant means default-deny for
/// that company.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grant {
    pub user: UserId,
    pub company: CompanyId,
    pub matrix: PermissionMatrix,
    pub updated_at: SystemTime,
}

#[cfg(test)]
mod tests {
    use super::{Action, PermissionMatrix, ResourcePermission, ResourceTag};

    #[test]
    fn empty_matrix_denies_everything() {
        let matrix = PermissionMatrix::empty();
        for resource in ResourceTag::ALL {
            for action in Action::ALL {
                assert!(!matrix.allows(resource, action), "{resource}/{action}");
            }
        }
    }

    #[test]
    fn with_replaces_a_single_leaf() {
        let matrix =
            PermissionMatrix::empty().with(ResourceTag::Rentals, ResourcePermission::read_only());
        assert!(matrix.allows(ResourceTag::Rentals, Action::Read));
        assert!(!matrix.allows(ResourceTag::Rentals, Action::Write));
        assert!(!matrix.allows(ResourceTag::Vehicles, Action::Read));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_resource_keys_default_to_all_false() {
        let matrix = PermissionMatrix::from_json(
            r#"{"vehicles":{"read":true,"write":false,"delete":false}}"#,
        )
        .expect("matrix");
        assert!(matrix.allows(ResourceTag::Vehicles, Action::Read));
        assert!(!matrix.allows(ResourceTag::Settlements, Action::Read));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn unknown_resource_key_is_rejected() {
        let err = PermissionMatrix::from_json(
            r#"{"invoices":{"read":true,"write":false,"delete":false}}"#,
        )
        .expect_err("must reject");
        assert!(err.to_string().contains("invalid permission matrix"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn non_boolean_leaf_is_rejected() {
        let err = PermissionMatrix::from_json(r#"{"vehicles":{"read":"yes"}}"#)
            .expect_err("must reject");
        assert!(err.to_string().contains("invalid permission matrix"));
    }
}
