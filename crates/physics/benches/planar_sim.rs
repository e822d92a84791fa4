use std::path::Path;

use criterion::{criterion_group, criterion_main, Criterion};
use physics::{PhysicsAdapter, PlanarSim, Quat, SolverParams, Vec3};

const WALKER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/models/walker2d.json");

fn bench_walker_step(c: &mut Criterion) {
    let mut sim = PlanarSim::connect();
    let walker = sim.load_model(Path::new(WALKER)).unwrap();
    sim.set_solver_params(SolverParams { timestep: 0.0165, substeps: 4, iterations: 5 })
        .unwrap();
    c.bench_function("walker_step", |b| {
        b.iter(|| {
            sim.step().unwrap();
            let pose = sim.base_pose(walker).unwrap();
            if pose.position.z < 0.5 {
                sim.reset_base(walker, Vec3::new(0.0, 0.0, 1.25), Quat::IDENTITY).unwrap();
            }
        });
    });
}

criterion_group!(benches, bench_walker_step);
criterion_main!(benches);
