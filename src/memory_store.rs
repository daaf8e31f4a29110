use crate::investor::InvestorShare;
use crate::permission::{Grant, PermissionMatrix};
use crate::store::{GrantStore, ShareStore, StoreError};
use crate::types::{CompanyId, InvestorId, UserId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

/// In-memory store implementation for tests and demos.
///
/// Users and companies are explicit registries so that grant writes against
/// unknown ids fail with the same NotFound errors a persistent backend
/// returns.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: RwLock<HashSet<UserId>>,
    companies: RwLock<HashSet<CompanyId>>,
    grants: RwLock<HashMap<(UserId, CompanyId), Grant>>,
    shares: RwLock<HashMap<InvestorId, Vec<InvestorShare>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user.
    pub fn add_user(&self, user: UserId) {
        let mut guard = self.inner.users.write().expect("poisoned lock");
        guard.insert(user);
    }

    /// Registers a company.
    pub fn add_company(&self, company: CompanyId) {
        let mut guard = self.inner.companies.write().expect("poisoned lock");
        guard.insert(company);
    }

    /// Adds an active ownership share.
    pub fn add_share(&self, share: InvestorShare) {
        let mut guard = self.inner.shares.write().expect("poisoned lock");
        guard.entry(share.investor.clone()).or_default().push(share);
    }

    fn check_user(&self, user: &UserId) -> Result<(), StoreError> {
        let guard = self.inner.users.read().expect("poisoned lock");
        if guard.contains(user) {
            Ok(())
        } else {
            Err(StoreError::UserNotFound(user.clone()))
        }
    }

    fn check_company(&self, company: &CompanyId) -> Result<(), StoreError> {
        let guard = self.inner.companies.read().expect("poisoned lock");
        if guard.contains(company) {
            Ok(())
        } else {
            Err(StoreError::CompanyNotFound(company.clone()))
        }
    }
}

#[async_trait]
impl GrantStore for MemoryStore {
    async fn grants_for_user(&self, user: &UserId) -> Result<Vec<Grant>, StoreError> {
        let guard = self.inner.grants.read().expect("poisoned lock");
        Ok(guard
            .values()
            .filter(|grant| &grant.user == user)
            .cloned()
            .collect())
    }

    async fn grants_for_company(&self, company: &CompanyId) -> Result<Vec<Grant>, StoreError> {
        let guard = self.inner.grants.read().expect("poisoned lock");
        Ok(guard
            .values()
            .filter(|grant| &grant.company == company)
            .cloned()
            .collect())
    }

    async fn upsert_grant(
        &self,
        user: &UserId,
        company: &CompanyId,
        matrix: PermissionMatrix,
    ) -> Result<(), StoreError> {
        self.check_user(user)?;
        self.check_company(company)?;
        let mut guard = self.inner.grants.write().expect("poisoned lock");
        guard.insert(
            (user.clone(), company.clone()),
            Grant {
                user: user.clone(),
                company: company.clone(),
                matrix,
                updated_at: SystemTime::now(),
            },
        );
        Ok(())
    }

    async fn delete_grant(&self, user: &UserId, company: &CompanyId) -> Result<(), StoreError> {
        self.check_user(user)?;
        self.check_company(company)?;
        let mut guard = self.inner.grants.write().expect("poisoned lock");
        guard.remove(&(user.clone(), company.clone()));
        Ok(())
    }
}

#[async_trait]
impl ShareStore for MemoryStore {
    async fn shares_for_investor(
        &self,
        investor: &InvestorId,
    ) -> Result<Vec<InvestorShare>, StoreError> {
        let guard = self.inner.shares.read().expect("poisoned lock");
        Ok(guard.get(investor).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::permission::{Action, PermissionMatrix, ResourcePermission, ResourceTag};
    use crate::store::{GrantStore, StoreError};
    use crate::types::{CompanyId, UserId};
    use futures::executor::block_on;

    fn user(value: &str) -> UserId {
        UserId::try_from(value).unwrap()
    }

    fn company(value: &str) -> CompanyId {
        CompanyId::try_from(value).unwrap()
    }

    #[test]
    fn upsert_replaces_the_existing_grant() {
        let store = MemoryStore::new();
        let user = user("user_1");
        let company = company("company_a");
        store.add_user(user.clone());
        store.add_company(company.clone());

        block_on(store.upsert_grant(&user, &company, PermissionMatrix::full())).unwrap();
        block_on(store.upsert_grant(
            &user,
            &company,
            PermissionMatrix::empty().with(ResourceTag::Rentals, ResourcePermission::read_only()),
        ))
        .unwrap();

        let grants = block_on(store.grants_for_user(&user)).unwrap();
        assert_eq!(grants.len(), 1);
        assert!(grants[0].matrix.allows(ResourceTag::Rentals, Action::Read));
        assert!(!grants[0].matrix.allows(ResourceTag::Vehicles, Action::Read));
    }

    #[test]
    fn writes_against_unknown_ids_are_not_found() {
        let store = MemoryStore::new();
        store.add_user(user("user_1"));

        let err = block_on(store.upsert_grant(
            &user("ghost"),
            &company("company_a"),
            PermissionMatrix::full(),
        ))
        .expect_err("must fail");
        assert!(matches!(err, StoreError::UserNotFound(_)));

        let err = block_on(store.delete_grant(&user("user_1"), &company("ghost")))
            .expect_err("must fail");
        assert!(matches!(err, StoreError::CompanyNotFound(_)));
    }

    #[test]
    fn delete_of_an_absent_grant_is_a_no_op() {
        let store = MemoryStore::new();
        let user = user("user_1");
        let company = company("company_a");
        store.add_user(user.clone());
        store.add_company(company.clone());

        block_on(store.delete_grant(&user, &company)).unwrap();
        assert!(block_on(store.grants_for_user(&user)).unwrap().is_empty());
    }
}
