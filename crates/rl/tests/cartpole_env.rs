use rl::{CartPoleEnv, Env, RlError, MAX_EPISODE_STEPS};

#[test]
fn reset_returns_four_features_and_fresh_info() {
    let mut env = CartPoleEnv::new(0);
    let (obs, info) = env.reset().unwrap();
    assert_eq!(obs.len(), env.obs_size());
    assert_eq!(info.elapsed_steps, 0);
    assert_eq!(env.action_size(), 2);
}

#[test]
fn stepping_before_reset_fails() {
    let mut env = CartPoleEnv::new(0);
    assert!(matches!(env.step(0), Err(RlError::ResetNeeded)));
}

#[test]
fn invalid_actions_are_rejected() {
    let mut env = CartPoleEnv::new(0);
    env.reset().unwrap();
    assert!(matches!(env.step(2), Err(RlError::InvalidAction { action: 2, size: 2 })));
}

#[test]
fn bad_policy_terminates_early_with_unit_rewards() {
    let mut env = CartPoleEnv::new(3);
    env.reset().unwrap();
    let mut total = 0.0;
    loop {
        let step = env.step(0).unwrap();
        total += step.reward;
        assert_eq!(step.info.elapsed_steps as f32, total);
        if step.done() {
            assert!(step.terminated && !step.truncated);
            break;
        }
    }
    assert!(total < 100.0);
}

#[test]
fn time_limit_truncates_long_episodes() {
    let config = physics::CartPoleConfig {
        failure_angle: 100.0,
        position_limit: 1e9,
        ..Default::default()
    };
    let mut env = CartPoleEnv::with_config(config, 25, 0);
    env.reset().unwrap();
    let mut steps = 0;
    loop {
        steps += 1;
        let step = env.step(steps % 2).unwrap();
        if step.done() {
            assert!(step.truncated && !step.terminated);
            break;
        }
    }
    assert_eq!(steps, 25);
    assert_eq!(MAX_EPISODE_STEPS, CartPoleEnv::new(0).max_episode_steps());
}

#[test]
fn same_seed_same_initial_states() {
    let mut a = CartPoleEnv::new(17);
    let mut b = CartPoleEnv::new(17);
    for _ in 0..5 {
        assert_eq!(a.reset().unwrap().0, b.reset().unwrap().0);
    }
}
