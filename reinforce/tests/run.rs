use reinforce::{run, AppConfig};
use rl::TrainConfig;

fn short_run(name: &str) -> AppConfig {
    AppConfig {
        train: TrainConfig { episodes: 5, report_every: 5, seed: 3, ..TrainConfig::default() },
        output: std::env::temp_dir().join(format!("{name}_{}.png", std::process::id())),
        ..AppConfig::default()
    }
}

#[test]
fn writes_curve_and_returns_history() {
    let config = short_run("reinforce_run");
    let rewards = run(&config).unwrap();

    assert_eq!(rewards.len(), 5);
    assert!(rewards.iter().all(|&r| (1.0..=500.0).contains(&r)));
    let img = image::open(&config.output).unwrap();
    assert_eq!((img.width(), img.height()), (1000, 500));
    std::fs::remove_file(&config.output).unwrap();
}

#[test]
fn same_seed_same_history() {
    let a = short_run("reinforce_seed_a");
    let b = short_run("reinforce_seed_b");
    let first = run(&a).unwrap();
    let second = run(&b).unwrap();
    assert_eq!(first, second);
    std::fs::remove_file(&a.output).unwrap();
    std::fs::remove_file(&b.output).unwrap();
}

#[test]
fn evaluation_does_not_change_training() {
    let plain = short_run("reinforce_eval_a");
    let evaluated = AppConfig { eval_episodes: 2, ..short_run("reinforce_eval_b") };
    assert_eq!(run(&plain).unwrap(), run(&evaluated).unwrap());
    std::fs::remove_file(&plain.output).unwrap();
    std::fs::remove_file(&evaluated.output).unwrap();
}

#[test]
fn invalid_gamma_is_rejected() {
    let config = AppConfig {
        train: TrainConfig { gamma: 1.5, ..TrainConfig::default() },
        ..short_run("reinforce_bad")
    };
    let err = run(&config).unwrap_err();
    assert!(format!("{err:#}").contains("gamma"));
    assert!(!config.output.exists());
}
