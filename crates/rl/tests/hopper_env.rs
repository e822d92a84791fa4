mod common;

use common::{asset, ScriptedAdapter};
use physics::{ContactPair, PlanarSim, Quat};
use rl::{BoxSpace, Env, EnvError, HopperConfig, HopperEnv, Phase};
use terrain::TerrainConfig;

fn quiet_config() -> HopperConfig {
    HopperConfig { init_noise: 0.0, ..HopperConfig::default() }
}

fn scripted(config: HopperConfig) -> HopperEnv<ScriptedAdapter> {
    HopperEnv::new(ScriptedAdapter::hopper(), config, fastrand::Rng::with_seed(1)).unwrap()
}

fn ramp_config(slopes: Vec<f32>) -> HopperConfig {
    HopperConfig { terrain: TerrainConfig { slopes, ..TerrainConfig::default() }, ..quiet_config() }
}

#[test]
fn construction_uploads_the_course() {
    let env = scripted(HopperConfig::default());
    let uploads = &env.adapter().uploads;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].data.len(), 2000);
    assert!(!env.terrain().is_dirty());
    assert_eq!(env.obs_size(), 13);
    assert_eq!(env.action_size(), 3);
    assert_eq!(env.action_space(), &BoxSpace::symmetric(3, 1.0));
}

#[test]
fn reset_observation_is_finite() {
    let mut env = scripted(HopperConfig::default());
    let obs = env.reset().unwrap();
    assert_eq!(obs.len(), 13);
    assert!(obs.iter().all(|v| v.is_finite()));
    assert_eq!(env.phase(), Phase::Running);
}

#[test]
fn flat_course_reward_is_alive_bonus_minus_bias() {
    let mut env = scripted(quiet_config());
    let step = env.step(&[0.0; 3]).unwrap();
    assert!((step.reward - 0.1).abs() < 1e-6, "reward {}", step.reward);
    assert!(!step.done);
    // flat terrain: height above ground equals base z, no relative heights
    assert!((step.observation[0] - 1.25).abs() < 1e-6);
    assert_eq!(&step.observation[11..], &[0.0, 0.0]);
}

#[test]
fn lookahead_reports_the_ramp_ahead() {
    let mut env = scripted(ramp_config(vec![0.05]));
    let obs = env.reset().unwrap();
    // spawn plateau sits at z = 0; the first ramp columns start near x = 0.8
    assert!((obs[0] - 1.25).abs() < 1e-5);
    assert!((obs[11] - -0.15).abs() < 1e-4, "one ahead: {}", obs[11]);
    assert!((obs[12] - -0.4).abs() < 1e-4, "two ahead: {}", obs[12]);
}

#[test]
fn positions_off_the_course_are_clamped() {
    let mut env = scripted(quiet_config());
    env.adapter_mut().pose.position.x = 1.0e4;
    let step = env.step(&[0.0; 3]).unwrap();
    assert!(step.observation.iter().all(|v| v.is_finite()));

    env.reset().unwrap();
    env.adapter_mut().pose.position.x = -1.0e4;
    assert!(env.step(&[0.0; 3]).is_ok());
}

#[test]
fn foot_contact_is_allowed() {
    let mut env = scripted(quiet_config());
    let (ground, foot) = (env.adapter().geom("ground"), env.adapter().geom("foot_geom"));
    env.adapter_mut().contacts = vec![ContactPair { geom_a: ground, geom_b: foot }];
    assert!(!env.step(&[0.0; 3]).unwrap().done);
}

#[test]
fn torso_contact_terminates() {
    let mut env = scripted(quiet_config());
    let (ground, torso) = (env.adapter().geom("ground"), env.adapter().geom("torso_geom"));
    env.adapter_mut().contacts = vec![ContactPair { geom_a: ground, geom_b: torso }];
    assert!(env.step(&[0.0; 3]).unwrap().done);
    assert!(matches!(env.step(&[0.0; 3]), Err(EnvError::EpisodeTerminated)));
}

#[test]
fn pitch_limit_terminates() {
    let mut env = scripted(quiet_config());
    env.adapter_mut().pose.orientation = Quat::from_pitch(0.25);
    assert!(env.step(&[0.0; 3]).unwrap().done);
}

#[test]
fn runaway_state_terminates() {
    let mut env = scripted(quiet_config());
    env.adapter_mut().joints[0].velocity = 150.0;
    let step = env.step(&[0.0; 3]).unwrap();
    assert!(step.done);
    // the observation still clips velocities
    assert_eq!(step.observation[8], 10.0);
}

#[test]
fn same_seed_same_course() {
    let config = ramp_config(vec![-0.02, 0.0, 0.02]);
    let a = HopperEnv::new(ScriptedAdapter::hopper(), config.clone(), fastrand::Rng::with_seed(9)).unwrap();
    let b = HopperEnv::new(ScriptedAdapter::hopper(), config, fastrand::Rng::with_seed(9)).unwrap();
    assert_eq!(a.terrain().samples(), b.terrain().samples());
    assert_eq!(a.adapter().uploads, b.adapter().uploads);
}

#[test]
fn unknown_allowed_geom_is_rejected() {
    let config = HopperConfig { allowed_contacts: vec!["wing_geom".into()], ..HopperConfig::default() };
    let result = HopperEnv::new(ScriptedAdapter::hopper(), config, fastrand::Rng::with_seed(1));
    assert!(matches!(result, Err(EnvError::Physics(_))));
}

#[test]
fn empty_slope_set_is_a_config_error() {
    let result = HopperEnv::new(ScriptedAdapter::hopper(), ramp_config(vec![]), fastrand::Rng::with_seed(1));
    assert!(matches!(result, Err(EnvError::Config(_))));
}

#[test]
fn runs_on_planar_sim_over_ramps() {
    let config = HopperConfig { model: asset("hopper.json"), ..ramp_config(vec![-0.01, 0.01]) };
    let mut env = HopperEnv::new(PlanarSim::connect(), config, fastrand::Rng::with_seed(3)).unwrap();
    let obs = env.reset().unwrap();
    assert_eq!(obs.len(), 13);
    assert!(obs.iter().all(|v| v.is_finite()));

    let mut rng = fastrand::Rng::with_seed(4);
    for _ in 0..50 {
        let action = env.action_space().sample(&mut rng);
        let step = env.step(&action).unwrap();
        assert_eq!(step.observation.len(), 13);
        if step.done {
            break;
        }
    }
}
