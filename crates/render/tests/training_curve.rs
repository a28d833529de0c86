use image::Rgb;
use render::{render_training_curve, save_training_curve, PlotConfig};

fn small() -> PlotConfig {
    PlotConfig { width: 200, height: 120, margin: 10, window: 5, ..PlotConfig::default() }
}

#[test]
fn image_has_configured_size() {
    let rewards: Vec<f32> = (0..40).map(|i| i as f32 * 10.0).collect();
    let img = render_training_curve(&rewards, &small());
    assert_eq!(img.dimensions(), (200, 120));
}

#[test]
fn draws_something_besides_background() {
    let rewards: Vec<f32> = (0..40).map(|i| (i % 7) as f32 * 50.0).collect();
    let img = render_training_curve(&rewards, &small());
    let white = Rgb([255, 255, 255]);
    assert!(img.pixels().any(|p| *p != white));
}

#[test]
fn threshold_line_is_green() {
    let config = small();
    let img = render_training_curve(&[], &config);
    // y_max = 475 * 1.05, plot area spans rows 10..110.
    let y_max = config.solved_threshold * 1.05;
    let y = (110.0 - config.solved_threshold / y_max * 100.0).round() as u32;
    let x = config.margin + 1;
    assert_eq!(*img.get_pixel(x, y), Rgb([0, 128, 0]));
}

#[test]
fn empty_history_still_renders() {
    let img = render_training_curve(&[], &PlotConfig::default());
    assert_eq!(img.dimensions(), (1000, 500));
}

#[test]
fn writes_png_to_disk() {
    let path = std::env::temp_dir().join(format!("training_curve_{}.png", std::process::id()));
    let rewards = vec![10.0, 20.0, 500.0, 30.0, 40.0, 60.0];
    save_training_curve(&path, &rewards, &small()).unwrap();

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (200, 120));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn unwritable_path_is_an_error() {
    let path = std::env::temp_dir().join("no_such_dir_for_plots").join("curve.png");
    let err = save_training_curve(&path, &[1.0], &small()).unwrap_err();
    assert!(err.to_string().contains("failed to write training curve"));
}
