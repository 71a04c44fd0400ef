use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use farm_bank::AssetKey;
use farm_nullables::NullBank;
use farm_staking::StakingFarm;
use farm_types::{AccountId, AssetId, FarmParams};

fn make_farm(participants: usize) -> StakingFarm {
    let params = FarmParams::dev_defaults();
    let mut farm = StakingFarm::new(params.clone()).unwrap();
    let dai = AssetId::new("mdai");
    farm.approve(&params.administrator, dai.clone()).unwrap();

    let mut bank = NullBank::new();
    for i in 0..participants {
        let who = AccountId::new(format!("p{i:06}"));
        bank.fund(&AssetKey::from(&dai), &who, &params.custody_account, 1_000);
        farm.deposit(&mut bank, &who, &dai, 100 + i as u128).unwrap();
    }
    farm
}

fn bench_distribute(c: &mut Criterion) {
    let mut group = c.benchmark_group("distribute");
    let admin = FarmParams::dev_defaults().administrator;

    for participant_count in [1, 10, 100, 1000, 10_000] {
        let mut farm = make_farm(participant_count);
        group.bench_with_input(
            BenchmarkId::new("active_participants", participant_count),
            &participant_count,
            |b, _| {
                b.iter(|| black_box(farm.distribute(black_box(&admin)).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    for participant_count in [10, 1000] {
        let farm = make_farm(participant_count);
        group.bench_with_input(
            BenchmarkId::new("create_and_verify", participant_count),
            &participant_count,
            |b, _| {
                b.iter(|| black_box(farm.snapshot().verify()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_distribute, bench_snapshot);
criterion_main!(benches);
