use crate::investor::InvestorShare;
use crate::permission::{Grant, PermissionMatrix};
use crate::types::{CompanyId, InvestorId, UserId};
use async_trait::async_trait;
use thiserror::Error;

/// Opaque backend failure carried by [`StoreError::Unavailable`].
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by grant and share persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Referenced user does not exist.
    #[error("user {0} not found")]
    UserNotFound(UserId),
    /// Referenced company does not exist.
    #[error("company {0} not found")]
    CompanyNotFound(CompanyId),
    /// Duplicate grant creation. Only reachable in an implementation that
    /// splits create from update; [`GrantStore::upsert_grant`] is an upsert.
    #[error("grant already exists for user {user} in company {company}")]
    GrantExists { user: UserId, company: CompanyId },
    /// Persistence I/O failed or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] BackendError),
}

impl StoreError {
    /// Wraps a backend failure.
    pub fn unavailable(error: impl Into<BackendError>) -> Self {
        Self::Unavailable(error.into())
    }
}

/// Persistence interface for grants.
///
/// Implementations bound each call with the surrounding connection-pool
/// discipline (short acquire and statement timeouts) and surface expiry as
/// [`StoreError::Unavailable`] rather than hanging the request. Calls are
/// cancel-safe: dropping the returned future abandons the lookup.
#[async_trait]
pub trait GrantStore {
    /// Returns all grants held by a user, at most one per company.
    async fn grants_for_user(&self, user: &UserId) -> Result<Vec<Grant>, StoreError>;

    /// Returns all grants scoped to a company, at most one per user.
    async fn grants_for_company(&self, company: &CompanyId) -> Result<Vec<Grant>, StoreError>;

    /// Creates or replaces the grant for `(user, company)`.
    async fn upsert_grant(
        &self,
        user: &UserId,
        company: &CompanyId,
        matrix: PermissionMatrix,
    ) -> Result<(), StoreError>;

    /// Deletes the grant for `(user, company)`.
    ///
    /// Removing an absent grant is a no-op; an unknown user or company is an
    /// error.
    async fn delete_grant(&self, user: &UserId, company: &CompanyId) -> Result<(), StoreError>;
}

/// Persistence interface for investor ownership shares.
#[async_trait]
pub trait ShareStore {
    /// Returns the active share rows held by an investor.
    async fn shares_for_investor(
        &self,
        investor: &InvestorId,
    ) -> Result<Vec<InvestorShare>, StoreError>;
}

/// Composite store trait.
pub trait Store: GrantStore + ShareStore + Send + Sync {}

impl<T> Store for T where T: GrantStore + ShareStore + Send + Sync {}
