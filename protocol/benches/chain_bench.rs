// Chain benchmarks for Starchain.
//
// Covers block append, full-chain validation at several lengths, owner
// queries, and Ed25519 challenge verification.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

use starchain_protocol::clock::{ManualClock, SystemClock};
use starchain_protocol::config::RegistryConfig;
use starchain_protocol::crypto::{address_of, sign_message, Ed25519Verifier, SignatureVerifier};
use starchain_protocol::registry::StarRegistry;
use starchain_protocol::storage::{BlockPayload, ChainStore, PendingBlock, Star, StarRecord};

fn pending(owner: &str) -> PendingBlock {
    PendingBlock::new(&BlockPayload::Star(StarRecord {
        star: Star::new("68° 52' 56.9", "16h 29m 1.0s", "benchmark star"),
        owner: owner.to_string(),
    }))
    .expect("encode payload")
}

fn filled_store(n: usize) -> ChainStore {
    let store = ChainStore::new(Arc::new(SystemClock));
    store.initialize();
    for i in 0..n {
        store.append(pending(&format!("owner-{}", i % 16)));
    }
    store
}

fn bench_append(c: &mut Criterion) {
    let store = filled_store(0);
    let block = pending("owner");
    c.bench_function("chain/append", |b| {
        b.iter(|| store.append(block.clone()));
    });
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain/validate");
    for size in [100usize, 1_000, 10_000] {
        let store = filled_store(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| store.validate());
        });
    }
    group.finish();
}

fn bench_stars_by_owner(c: &mut Criterion) {
    let accept_all: Arc<dyn SignatureVerifier> = Arc::new(|_: &str, _: &str, _: &str| true);
    let registry = StarRegistry::with_config(
        RegistryConfig::default(),
        accept_all,
        Arc::new(ManualClock::new(1_700_000_000)),
    );
    registry.initialize();
    for i in 0..1_000 {
        let owner = format!("owner-{}", i % 16);
        let message = registry.request_challenge(&owner);
        registry
            .submit_star(&owner, &message, "sig", Star::new("1", "2", "benchmark star"))
            .expect("submit star");
    }

    c.bench_function("registry/stars_by_owner_1000", |b| {
        b.iter(|| registry.stars_by_owner("owner-3"));
    });
}

fn bench_verify_challenge(c: &mut Criterion) {
    let key = SigningKey::generate(&mut OsRng);
    let address = address_of(&key);
    let message = format!("{}:1700000000:starRegistry", address);
    let signature = sign_message(&key, &message);

    c.bench_function("ed25519/verify_challenge", |b| {
        b.iter(|| Ed25519Verifier.verify(&message, &address, &signature));
    });
}

criterion_group!(
    benches,
    bench_append,
    bench_validate,
    bench_stars_by_owner,
    bench_verify_challenge
);
criterion_main!(benches);
