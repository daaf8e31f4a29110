use crate::cache::GRANT_CACHE_TTL;
use crate::grants::PermissionStore;
use crate::investor::{INVESTOR_SCOPED_RESOURCES, share_allows};
use crate::permission::{Action, ResourceTag};
use crate::role::RoleTag;
use crate::store::{Store, StoreError};
use crate::types::{CompanyId, InvestorId, Principal};
use std::fmt;
use std::time::Duration;

/// Authorization decision, returned as data, never as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether access is allowed.
    pub allowed: bool,
    /// Why access was refused, when it was.
    pub reason: Option<DenyReason>,
}

impl Decision {
    /// An allowing decision.
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// A refusing decision.
    pub fn deny(reason: DenyReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }

    /// Whether access is allowed.
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }
}

/// Why a decision refused access.
///
/// [`DenyReason::CheckUnavailable`] lets callers tell "no" from "couldn't
/// check" without parsing the rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// No grant authorizes the action on the resource.
    NoPermission {
        resource: ResourceTag,
        action: Action,
    },
    /// The principal holds no access to the target company.
    NoCompanyAccess { company: CompanyId },
    /// An investor-role principal carries no investor linkage in its claims.
    InvestorNotLinked,
    /// The permission check itself could not be completed; access fails
    /// closed.
    CheckUnavailable,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::NoPermission { resource, action } => {
                write!(f, "no permission for {resource}/{action}")
            }
            DenyReason::NoCompanyAccess { company } => {
                write!(f, "no access to company {company}")
            }
            DenyReason::InvestorNotLinked => {
                f.write_str("investor principal has no linked investor id")
            }
            DenyReason::CheckUnavailable => f.write_str("permission check unavailable"),
        }
    }
}

/// Permission decision engine.
///
/// Owns the cached permission store and composes the role resolver, the
/// grant store, and the investor share resolver into one decision per call.
/// Each call is a pure decision over current grant state; there is no
/// persistent state machine and reads are idempotent.
#[derive(Debug)]
pub struct Engine<S> {
    grants: PermissionStore<S>,
}

/// Builder for [`Engine`].
pub struct EngineBuilder<S> {
    store: S,
    grant_cache_ttl: Duration,
}

impl<S> EngineBuilder<S> {
    /// Creates a builder with default configuration.
    pub fn new(store: S) -> Self {
        Self {
            store,
            grant_cache_ttl: GRANT_CACHE_TTL,
        }
    }

    /// Sets the grant-cache TTL.
    pub fn grant_cache_ttl(mut self, ttl: Duration) -> Self {
        self.grant_cache_ttl = ttl;
        self
    }

    /// Builds the engine.
    pub fn build(self) -> Engine<S> {
        Engine {
            grants: PermissionStore::with_ttl(self.store, self.grant_cache_ttl),
        }
    }
}

impl<S: Store> Engine<S> {
    /// Decides whether `principal` may perform `action` on `resource`,
    /// optionally scoped to one company.
    ///
    /// First match wins: global bypass, scoped bypass, the investor profile,
    /// then grant lookup. Without a company context the grant step succeeds
    /// if any of the principal's grants authorizes the action; this is the
    /// cross-company fallback used by menu-visibility checks.
    ///
    /// On store failure the engine fails closed and returns a refusal with
    /// [`DenyReason::CheckUnavailable`]; it never allows silently.
    pub async fn can_access(
        &self,
        principal: &Principal,
        resource: ResourceTag,
        action: Action,
        company: Option<&CompanyId>,
    ) -> Decision {
        if principal.role.is_global_bypass() {
            return Decision::allow();
        }
        if principal.role.is_scoped_bypass() {
            // The target company is not compared against the principal's
            // own; see the pending scoped-bypass test.
            return Decision::allow();
        }
        if principal.role == RoleTag::Investor {
            return self.decide_investor(principal, resource, action, company).await;
        }
        match self.decide_granted(principal, resource, action, company).await {
            Ok(decision) => decision,
            Err(error) => {
                tracing::warn!(user = %principal.id, %error, "permission check failed closed");
                Decision::deny(DenyReason::CheckUnavailable)
            }
        }
    }

    /// Companies visible to the principal, for menu and filter building.
    ///
    /// Investors see the companies of their active shares; everyone else
    /// sees the companies of their grants. Bypass roles are resolved by the
    /// caller against the full company listing, which lives outside this
    /// core.
    pub async fn accessible_companies(
        &self,
        principal: &Principal,
    ) -> Result<Vec<CompanyId>, StoreError> {
        if principal.role == RoleTag::Investor {
            let Some(investor) = principal.linked_investor_id.as_ref() else {
                return Ok(Vec::new());
            };
            return self.share_companies(investor).await;
        }
        let grants = self.grants.list_grants_for_user(&principal.id).await?;
        Ok(grants.into_iter().map(|grant| grant.company).collect())
    }

    /// Returns the cached permission store backing this engine; the
    /// admin CRUD surface.
    pub fn grants(&self) -> &PermissionStore<S> {
        &self.grants
    }

    async fn decide_investor(
        &self,
        principal: &Principal,
        resource: ResourceTag,
        action: Action,
        company: Option<&CompanyId>,
    ) -> Decision {
        if !share_allows(resource, action) {
            return Decision::deny(DenyReason::NoPermission { resource, action });
        }
        if let Some(company) = company
            && action == Action::Read
            && INVESTOR_SCOPED_RESOURCES.contains(&resource)
        {
            let Some(investor) = principal.linked_investor_id.as_ref() else {
                return Decision::deny(DenyReason::InvestorNotLinked);
            };
            return match self.share_companies(investor).await {
                Ok(companies) if companies.contains(company) => Decision::allow(),
                Ok(_) => Decision::deny(DenyReason::NoCompanyAccess {
                    company: company.clone(),
                }),
                Err(error) => {
                    tracing::warn!(user = %principal.id, %error, "share lookup failed closed");
                    Decision::deny(DenyReason::CheckUnavailable)
                }
            };
        }
        Decision::allow()
    }

    async fn decide_granted(
        &self,
        principal: &Principal,
        resource: ResourceTag,
        action: Action,
        company: Option<&CompanyId>,
    ) -> Result<Decision, StoreError> {
        let allowed = match company {
            Some(company) => self
                .grants
                .get_grant(&principal.id, company)
                .await?
                .is_some_and(|grant| grant.matrix.allows(resource, action)),
            None => self
                .grants
                .list_grants_for_user(&principal.id)
                .await?
                .iter()
                .any(|grant| grant.matrix.allows(resource, action)),
        };
        Ok(if allowed {
            Decision::allow()
        } else {
            Decision::deny(DenyReason::NoPermission { resource, action })
        })
    }

    async fn share_companies(&self, investor: &InvestorId) -> Result<Vec<CompanyId>, StoreError> {
        let shares = self.grants.store().shares_for_investor(investor).await?;
        Ok(shares.into_iter().map(|share| share.company).collect())
    }
}
