use criterion::{black_box, criterion_group, criterion_main, Criterion};
use zar_types::{Address, LedgerPoint, Position};
use zar_votes::{CheckpointSeries, TokenMetadata, VoteWeightLedger};

fn series(len: u64) -> CheckpointSeries {
    let mut s = CheckpointSeries::new();
    for i in 0..len {
        s.push(LedgerPoint::new(Position::new(i * 2), i), u128::from(i))
            .expect("checkpoints are pushed in order");
    }
    s
}

fn value_at_bench(c: &mut Criterion) {
    let s = series(10_000);

    c.bench_function("checkpoint_value_at_10k", |b| {
        b.iter(|| s.value_at(black_box(Position::new(12_345))))
    });
}

fn transfer_bench(c: &mut Criterion) {
    let alice = Address::new("zar_alice");
    let bob = Address::new("zar_bob");
    let mut ledger = VoteWeightLedger::new(TokenMetadata {
        name: "Zar Token".into(),
        symbol: "ZRT".into(),
        decimals: 18,
    });
    let mut seq = 0u64;
    let mut point = |position: u64| {
        seq += 1;
        LedgerPoint::new(Position::new(position), seq)
    };
    let _ = ledger.mint(&alice, u128::MAX / 2, point(0));
    let _ = ledger.delegate(&alice, &alice, point(0));
    let _ = ledger.delegate(&bob, &bob, point(0));

    let mut position = 1;
    c.bench_function("delegated_transfer", |b| {
        b.iter(|| {
            position += 1;
            ledger.transfer(&alice, &bob, black_box(1), point(position))
        })
    });
}

criterion_group!(benches, value_at_bench, transfer_bench);
criterion_main!(benches);
