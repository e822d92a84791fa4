use criterion::{criterion_group, criterion_main, Criterion};
use physics::PlanarSim;
use rl::{Env, HopperConfig, HopperEnv, WalkerConfig, WalkerEnv};

const MODELS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/models");

fn drive<E: Env>(env: &mut E, rng: &mut fastrand::Rng) {
    let action = env.action_space().sample(rng);
    let done = env.step(&action).map_or(true, |s| s.done);
    if done {
        env.reset().unwrap();
    }
}

fn bench_walker_step(c: &mut Criterion) {
    let config = WalkerConfig { model: format!("{MODELS}/walker2d.json").into(), ..WalkerConfig::default() };
    let mut env = WalkerEnv::new(PlanarSim::connect(), config, fastrand::Rng::with_seed(0)).unwrap();
    let mut rng = fastrand::Rng::with_seed(1);
    c.bench_function("walker_env_step", |b| b.iter(|| drive(&mut env, &mut rng)));
}

fn bench_hopper_step(c: &mut Criterion) {
    let mut config = HopperConfig { model: format!("{MODELS}/hopper.json").into(), ..HopperConfig::default() };
    config.terrain.slopes = vec![-0.02, 0.0, 0.02];
    let mut env = HopperEnv::new(PlanarSim::connect(), config, fastrand::Rng::with_seed(0)).unwrap();
    let mut rng = fastrand::Rng::with_seed(1);
    c.bench_function("hopper_env_step", |b| b.iter(|| drive(&mut env, &mut rng)));
}

criterion_group!(benches, bench_walker_step, bench_hopper_step);
criterion_main!(benches);
