use criterion::{black_box, criterion_group, criterion_main, Criterion};
use event_guard::engine_core::models::{KdfParams, Prf};
use event_guard::{
    AccessControl, AuthUser, CredentialEngine, InMemoryStore, JoinRequest, KdfConfig, Password,
    StaticIdentity,
};
use serde_json::json;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn bench_derive(c: &mut Criterion) {
    let engine = CredentialEngine::default();
    let password = Password::new("correct horse battery staple");

    c.bench_function("derive_default_params", |b| {
        b.iter(|| {
            let _ = engine.derive(black_box(&password));
        })
    });
}

fn bench_verify(c: &mut Criterion) {
    let engine = CredentialEngine::default();
    let password = Password::new("correct horse battery staple");
    let mut group = c.benchmark_group("verify_by_prf");

    for prf in [Prf::Sha1, Prf::Sha256, Prf::Sha512] {
        let params = KdfParams::from_salt("00112233445566778899aabbccddeeff")
            .with_iterations(2024)
            .with_key_size(8)
            .with_prf(prf.as_str());
        group.bench_function(prf.as_str(), |b| {
            b.iter(|| {
                let _ = engine.verify(black_box(&password), &params.salt, &params);
            })
        });
    }
    group.finish();
}

fn bench_join_round_trip(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let access = AccessControl::new(
        Arc::new(InMemoryStore::new()),
        StaticIdentity::signed_in(AuthUser::new("google:bench", "Bench")),
        CredentialEngine::new(KdfConfig::default()).unwrap(),
    );
    let event = rt
        .block_on(access.create_event(json!({"title": "bench"}), &Password::new("pw")))
        .unwrap();

    c.bench_function("join_with_password_in_memory", |b| {
        b.iter(|| {
            rt.block_on(access.join_event(black_box(&event), JoinRequest::with_password("pw")))
                .unwrap();
        })
    });
}

criterion_group!(benches, bench_derive, bench_verify, bench_join_round_trip);
criterion_main!(benches);
