use crate::cache::{GRANT_CACHE_TTL, TtlCache};
use crate::permission::{Grant, PermissionMatrix};
use crate::store::{GrantStore, StoreError};
use crate::types::{CompanyId, UserId};
use std::time::Duration;

/// One assignment in a bulk grant request.
#[derive(Debug, Clone)]
pub struct GrantAssignment {
    pub user: UserId,
    pub company: CompanyId,
    pub matrix: PermissionMatrix,
}

/// One failed assignment from a bulk grant request.
#[derive(Debug)]
pub struct FailedAssignment {
    pub user: UserId,
    pub company: CompanyId,
    pub error: StoreError,
}

/// Outcome of a best-effort bulk assignment.
#[derive(Debug, Default)]
pub struct BulkGrantOutcome {
    pub succeeded: Vec<GrantAssignment>,
    pub failed: Vec<FailedAssignment>,
}

/// Company permission store: cached facade over a [`GrantStore`].
///
/// Reads go through per-user and per-company read-through caches with a TTL
/// fixed at construction. Writes invalidate both affected keys before
/// returning, so a same-process read after a write is always fresh; across
/// processes staleness is bounded only by the TTL.
#[derive(Debug, Clone)]
pub struct PermissionStore<S> {
    store: S,
    user_grants: TtlCache<UserId, Vec<Grant>>,
    company_grants: TtlCache<CompanyId, Vec<Grant>>,
}

impl<S> PermissionStore<S> {
    /// Creates a store with the default grant-cache TTL.
    pub fn new(store: S) -> Self {
        Self::with_ttl(store, GRANT_CACHE_TTL)
    }

    /// Creates a store with a custom grant-cache TTL.
    pub fn with_ttl(store: S, ttl: Duration) -> Self {
        Self {
            store,
            user_grants: TtlCache::new(ttl),
            company_grants: TtlCache::new(ttl),
        }
    }

    /// Returns the underlying persistence backend.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: GrantStore> PermissionStore<S> {
    /// Returns the grant for `(user, company)`, if one exists.
    pub async fn get_grant(
        &self,
        user: &UserId,
        company: &CompanyId,
    ) -> Result<Option<Grant>, StoreError> {
        let grants = self.list_grants_for_user(user).await?;
        Ok(grants.into_iter().find(|grant| &grant.company == company))
    }

    /// Returns all grants held by a user.
    pub async fn list_grants_for_user(&self, user: &UserId) -> Result<Vec<Grant>, StoreError> {
        self.user_grants
            .get_or_load(user.clone(), || self.store.grants_for_user(user))
            .await
    }

    /// Returns all grants scoped to a company; the admin reporting view.
    pub async fn list_users_for_company(
        &self,
        company: &CompanyId,
    ) -> Result<Vec<Grant>, StoreError> {
        self.company_grants
            .get_or_load(company.clone(), || self.store.grants_for_company(company))
            .await
    }

    /// Creates or replaces the grant for `(user, company)`.
    pub async fn set_grant(
        &self,
        user: &UserId,
        company: &CompanyId,
        matrix: PermissionMatrix,
    ) -> Result<(), StoreError> {
        self.store.upsert_grant(user, company, matrix).await?;
        self.invalidate(user, company);
        Ok(())
    }

    /// Removes the grant for `(user, company)`.
    pub async fn remove_grant(&self, user: &UserId, company: &CompanyId) -> Result<(), StoreError> {
        self.store.delete_grant(user, company).await?;
        self.invalidate(user, company);
        Ok(())
    }

    /// Applies each assignment independently; one failure does not roll back
    /// the others. The caller receives a per-item result list.
    pub async fn bulk_set_grants(&self, assignments: Vec<GrantAssignment>) -> BulkGrantOutcome {
        let mut outcome = BulkGrantOutcome::default();
        for assignment in assignments {
            match self
                .set_grant(&assignment.user, &assignment.company, assignment.matrix)
                .await
            {
                Ok(()) => outcome.succeeded.push(assignment),
                Err(error) => outcome.failed.push(FailedAssignment {
                    user: assignment.user,
                    company: assignment.company,
                    error,
                }),
            }
        }
        outcome
    }

    fn invalidate(&self, user: &UserId, company: &CompanyId) {
        self.user_grants.invalidate(user);
        self.company_grants.invalidate(company);
        tracing::debug!(user = %user, company = %company, "grant caches invalidated");
    }
}
