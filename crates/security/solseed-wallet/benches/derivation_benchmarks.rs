//! Benchmarks for seed stretching and SLIP-0010 derivation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use solseed_wallet::{derive, DerivationPath, Keypair, Mnemonic, MnemonicSession, WalletRegistry};

const ABANDON_ABOUT: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn bench_to_seed(c: &mut Criterion) {
    let mnemonic = Mnemonic::parse(ABANDON_ABOUT).unwrap();
    c.bench_function("to_seed_pbkdf2_2048", |b| {
        b.iter(|| black_box(mnemonic.to_seed(black_box(""))))
    });
}

fn bench_derive(c: &mut Criterion) {
    let seed = Mnemonic::parse(ABANDON_ABOUT).unwrap().to_seed("");
    let mut group = c.benchmark_group("slip10_derive");
    for account in [0u32, 1_000, 1_000_000] {
        let path = DerivationPath::for_account(501, account).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(account), &path, |b, path| {
            b.iter(|| {
                let material = derive(&seed, black_box(path)).unwrap();
                black_box(Keypair::from_seed(&material).public_key())
            })
        });
    }
    group.finish();
}

fn bench_registry(c: &mut Criterion) {
    let mut session = MnemonicSession::new();
    session.load_phrase(ABANDON_ABOUT).unwrap();
    c.bench_function("registry_generate_10", |b| {
        b.iter(|| {
            let mut registry = WalletRegistry::new();
            registry.generate_wallets(&session, 10).unwrap();
            black_box(registry.len())
        })
    });
}

criterion_group!(benches, bench_to_seed, bench_derive, bench_registry);
criterion_main!(benches);
