use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rl::{
    collect_episode, discounted_returns, normalize, CartPoleEnv, PolicyNetwork, ReinforceTrainer,
    TrainConfig,
};

fn bench_returns(c: &mut Criterion) {
    let rewards = vec![1.0f32; 500];
    c.bench_function("discounted_returns_500", |b| {
        b.iter(|| normalize(&discounted_returns(black_box(&rewards), 0.99)));
    });
}

fn bench_collect_episode(c: &mut Criterion) {
    let policy = PolicyNetwork::new(4, 32, 2, &mut fastrand::Rng::with_seed(0));
    let mut env = CartPoleEnv::new(0);
    let mut rng = fastrand::Rng::with_seed(1);
    c.bench_function("collect_episode", |b| {
        b.iter(|| collect_episode(&mut env, &policy, &mut rng).unwrap());
    });
}

fn bench_train_episode(c: &mut Criterion) {
    let mut trainer = ReinforceTrainer::cartpole(TrainConfig::default()).unwrap();
    c.bench_function("reinforce_train_episode", |b| {
        b.iter(|| trainer.train_episode().unwrap());
    });
}

criterion_group!(benches, bench_returns, bench_collect_episode, bench_train_episode);
criterion_main!(benches);
