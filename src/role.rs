use std::fmt;

/// Role carried by a principal's verified claims.
///
/// The enumeration is closed: adding a role forces every match in this
/// module to be extended before the crate compiles again, so a new role can
/// never silently default to allow or deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoleTag {
    /// Platform owner; bypasses all permission checks.
    SuperAdmin,
    /// Platform operator; relies on grants like any employee role.
    PlatformAdmin,
    /// Company operator; bypasses checks within its company scope.
    CompanyAdmin,
    /// Platform-level staff.
    PlatformEmployee,
    /// Company staff.
    Employee,
    /// Sales staff.
    SalesRep,
    /// Maintenance staff.
    Mechanic,
    /// Short-term staff.
    TempWorker,
    /// Vehicle owner; access is derived from ownership shares, not grants.
    Investor,
}

impl RoleTag {
    /// Every known role, for exhaustive table checks.
    pub const ALL: [RoleTag; 9] = [
        RoleTag::SuperAdmin,
        RoleTag::PlatformAdmin,
        RoleTag::CompanyAdmin,
        RoleTag::PlatformEmployee,
        RoleTag::Employee,
        RoleTag::SalesRep,
        RoleTag::Mechanic,
        RoleTag::TempWorker,
        RoleTag::Investor,
    ];

    /// Privilege tier; a higher tier outranks a lower one.
    pub const fn tier(self) -> u8 {
        match self {
            RoleTag::SuperAdmin => 90,
            RoleTag::PlatformAdmin => 80,
            RoleTag::CompanyAdmin => 70,
            RoleTag::PlatformEmployee => 50,
            RoleTag::Employee => 40,
            RoleTag::SalesRep => 35,
            RoleTag::Mechanic => 30,
            RoleTag::TempWorker => 20,
            RoleTag::Investor => 10,
        }
    }

    /// Whether the role short-circuits every permission check, in every
    /// company.
    pub const fn is_global_bypass(self) -> bool {
        matches!(self, RoleTag::SuperAdmin)
    }

    /// Whether the role short-circuits permission checks within its company
    /// scope.
    pub const fn is_scoped_bypass(self) -> bool {
        matches!(self, RoleTag::CompanyAdmin)
    }

    /// Stable snake_case name, matching the persisted claim value.
    pub const fn as_str(self) -> &'static str {
        match self {
            RoleTag::SuperAdmin => "super_admin",
            RoleTag::PlatformAdmin => "platform_admin",
            RoleTag::CompanyAdmin => "company_admin",
            RoleTag::PlatformEmployee => "platform_employee",
            RoleTag::Employee => "employee",
            RoleTag::SalesRep => "sales_rep",
            RoleTag::Mechanic => "mechanic",
            RoleTag::TempWorker => "temp_worker",
            RoleTag::Investor => "investor",
        }
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
