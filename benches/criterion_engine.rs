#![cfg(all(feature = "criterion-bench", feature = "memory-store"))]

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use fleet_authz::{
    Action, CompanyId, EngineBuilder, GrantStore, InvestorId, InvestorShare, MemoryStore,
    PermissionMatrix, Principal, ResourcePermission, ResourceTag, RoleTag, UserId,
};
use futures::executor::block_on;
use std::time::Duration;

fn setup_store() -> MemoryStore {
    let store = MemoryStore::new();
    let user = UserId::try_from("user_bench").unwrap();
    let company = CompanyId::try_from("company_bench").unwrap();
    store.add_user(user.clone());
    store.add_company(company.clone());
    store.add_share(InvestorShare {
        investor: InvestorId::try_from("inv_bench").unwrap(),
        company: company.clone(),
        ownership_percentage: 50.0,
        is_primary_contact: false,
        profit_share_percentage: None,
    });
    block_on(store.upsert_grant(
        &user,
        &company,
        PermissionMatrix::empty().with(ResourceTag::Rentals, ResourcePermission::read_write()),
    ))
    .expect("grant");
    store
}

fn bench_can_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("can_access");
    group.sample_size(30);
    group.throughput(Throughput::Elements(1));

    let company = CompanyId::try_from("company_bench").unwrap();

    let engine = EngineBuilder::new(setup_store()).build();
    let bypass = Principal::new(UserId::try_from("root").unwrap(), RoleTag::SuperAdmin);
    group.bench_function("global_bypass", |b| {
        b.iter(|| {
            let decision = block_on(engine.can_access(
                &bypass,
                ResourceTag::Rentals,
                Action::Write,
                Some(&company),
            ));
            black_box(decision);
        });
    });

    let engine = EngineBuilder::new(setup_store())
        .grant_cache_ttl(Duration::from_secs(60))
        .build();
    let employee = Principal::new(UserId::try_from("user_bench").unwrap(), RoleTag::Employee);
    let warm = block_on(engine.can_access(
        &employee,
        ResourceTag::Rentals,
        Action::Write,
        Some(&company),
    ));
    assert!(warm.allowed);
    group.bench_function("grant_hot_cache", |b| {
        b.iter(|| {
            let decision = block_on(engine.can_access(
                &employee,
                ResourceTag::Rentals,
                Action::Write,
                Some(&company),
            ));
            black_box(decision);
        });
    });

    let engine = EngineBuilder::new(setup_store()).build();
    let owner = Principal::new(UserId::try_from("owner_bench").unwrap(), RoleTag::Investor)
        .with_linked_investor(InvestorId::try_from("inv_bench").unwrap());
    group.bench_function("investor_scoped_read", |b| {
        b.iter(|| {
            let decision = block_on(engine.can_access(
                &owner,
                ResourceTag::Companies,
                Action::Read,
                Some(&company),
            ));
            black_box(decision);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_can_access);
criterion_main!(benches);
