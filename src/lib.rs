//! Multi-company authorization core for rental-fleet platforms.
//!
//! This crate decides, per request, whether a principal may read, write, or
//! delete a protected resource within one company's data. It combines a
//! closed role hierarchy with bypass rules, persisted per-company permission
//! grants, an ownership-share profile for investor users, and a read-through
//! TTL cache shared with other high-traffic read paths. The default behavior
//! is deny-by-default, and permission checks fail closed when the store is
//! unreachable.
//!
//! Principals arrive with already-verified claims; token verification and
//! the HTTP layer live outside this crate.
//!
//! # Examples
//!
//! Basic decision flow using the in-memory store (enable `memory-store`):
//! ```no_run
//! use fleet_authz::{Action, EngineBuilder, Principal, ResourceTag, RoleTag, UserId};
//! # #[cfg(feature = "memory-store")]
//! # {
//! use fleet_authz::MemoryStore;
//! let store = MemoryStore::new();
//! let engine = EngineBuilder::new(store).build();
//! let principal = Principal::new(UserId::try_from("user_1").unwrap(), RoleTag::Employee);
//! let _ = engine.can_access(&principal, ResourceTag::Vehicles, Action::Read, None);
//! # }
//! ```
//!
//! Creating a listing cache for a high-churn collection:
//! ```no_run
//! use fleet_authz::{CollectionCache, HIGH_CHURN_TTL};
//! let cache: CollectionCache<String> = CollectionCache::new(HIGH_CHURN_TTL);
//! # let _ = cache;
//! ```
#![forbid(unsafe_code)]

mod cache;
mod engine;
mod error;
mod grants;
mod investor;
mod permission;
mod role;
mod store;
mod types;

#[cfg(feature = "memory-store")]
mod memory_store;

pub use crate::cache::{
    CollectionCache, GRANT_CACHE_TTL, HIGH_CHURN_TTL, LOW_CHURN_TTL, TtlCache,
};
pub use crate::engine::{Decision, DenyReason, Engine, EngineBuilder};
pub use crate::error::{Error, Result};
pub use crate::grants::{BulkGrantOutcome, FailedAssignment, GrantAssignment, PermissionStore};
pub use crate::investor::{
    INVESTOR_ACCESS, INVESTOR_SCOPED_RESOURCES, InvestorShare, share_allows,
};
pub use crate::permission::{
    Action, Grant, PermissionMatrix, ResourcePermission, ResourceTag,
};
pub use crate::role::RoleTag;
pub use crate::store::{BackendError, GrantStore, ShareStore, Store, StoreError};
pub use crate::types::{CompanyId, InvestorId, Principal, UserId};

#[cfg(feature = "memory-store")]
pub use crate::memory_store::MemoryStore;
