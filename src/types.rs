use crate::error::{Error, Result};
use crate::role::RoleTag;
use std::fmt;

const MAX_ID_LEN: usize = 128;

fn validate_id(value: &str, kind: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidId(format!("{kind} must not be empty")));
    }
    if trimmed.len() > MAX_ID_LEN {
        return Err(Error::InvalidId(format!(
            "{kind} length must be <= {MAX_ID_LEN}"
        )));
    }
    if !trimmed.chars().all(is_allowed_id_char) {
        return Err(Error::InvalidId(format!("{kind} contains invalid characters")));
    }
    Ok(trimmed.to_string())
}

fn is_allowed_id_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-')
}

macro_rules! define_id_type {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Eq, PartialEq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            /// Creates a validated identifier.
            pub fn new(value: impl AsRef<str>) -> Result<Self> {
                validate_id(value.as_ref(), $kind).map(Self)
            }

            /// Creates an identifier from a trusted string without validation.
            pub fn from_string(value: String) -> Self {
                Self(value)
            }

            /// Returns the underlying string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<&str> for $name {
            type Error = Error;

            fn try_from(value: &str) -> Result<Self> {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::from_string(value)
            }
        }
    };
}

define_id_type!(
    /// User identifier.
    UserId,
    "user id"
);
define_id_type!(
    /// Company identifier; the multi-tenancy boundary.
    CompanyId,
    "company id"
);
define_id_type!(
    /// Investor identifier, linked from a user's claims.
    InvestorId,
    "investor id"
);

/// Authenticated actor making a request.
///
/// Built once per request from already-verified session-token claims and
/// immutable for the request's lifetime. The core never inspects tokens;
/// the gateway is responsible for verification and claim mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Principal {
    /// User id from the `sub`-equivalent claim.
    pub id: UserId,
    /// Role carried by the claims.
    pub role: RoleTag,
    /// Home company, when the user belongs to one.
    pub company_id: Option<CompanyId>,
    /// Investor linkage, present for investor-role users.
    pub linked_investor_id: Option<InvestorId>,
}

impl Principal {
    /// Creates a principal with no company or investor linkage.
    pub fn new(id: UserId, role: RoleTag) -> Self {
        Self {
            id,
            role,
            company_id: None,
            linked_investor_id: None,
        }
    }

    /// Sets the principal's home company.
    pub fn with_company(mut self, company: CompanyId) -> Self {
        self.company_id = Some(company);
        self
    }

    /// Sets the principal's investor linkage.
    pub fn with_linked_investor(mut self, investor: InvestorId) -> Self {
        self.linked_investor_id = Some(investor);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{CompanyId, Principal, UserId};
    use crate::role::RoleTag;

    #[test]
    fn id_should_trim_surrounding_whitespace() {
        let user = UserId::new(" user_1 ").expect("user id");
        assert_eq!(user.as_str(), "user_1");
    }

    #[test]
    fn id_should_reject_empty_input() {
        let err = UserId::new("   ").expect_err("must reject");
        assert!(err.to_string().contains("user id"));
    }

    #[test]
    fn id_should_reject_invalid_characters() {
        let err = CompanyId::new("company 1").expect_err("must reject");
        assert!(err.to_string().contains("company id"));
    }

    #[test]
    fn principal_builder_sets_optional_links() {
        let principal = Principal::new(UserId::try_from("user_1").unwrap(), RoleTag::Employee)
            .with_company(CompanyId::try_from("company_a").unwrap());
        assert_eq!(principal.role, RoleTag::Employee);
        assert!(principal.company_id.is_some());
        assert!(principal.linked_investor_id.is_none());
    }
}
