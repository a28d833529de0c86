use crate::canvas::Canvas;
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use std::path::Path;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const RAW: Rgb<u8> = Rgb([31, 119, 180]);
const AVERAGE: Rgb<u8> = Rgb([255, 127, 14]);
const THRESHOLD: Rgb<u8> = Rgb([0, 128, 0]);

/// Layout of the training-curve image.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    /// Blank border around the plotting area, in pixels.
    pub margin: u32,
    /// Episodes per moving-average window.
    pub window: usize,
    /// Reward drawn as the dashed "solved" reference line.
    pub solved_threshold: f32,
    /// Opacity of the raw per-episode curve.
    pub raw_alpha: f32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
            margin: 40,
            window: 50,
            solved_threshold: 475.0,
            raw_alpha: 0.3,
        }
    }
}

/// Moving average over full windows only: the result has
/// `values.len() - window + 1` entries, and none if there are fewer values
/// than `window`. A zero window is treated as one.
#[must_use]
pub fn moving_average(values: &[f32], window: usize) -> Vec<f32> {
    let window = window.max(1);
    values
        .windows(window)
        .map(|w| w.iter().sum::<f32>() / window as f32)
        .collect()
}

/// Maps episode index and reward to pixel coordinates.
struct Viewport {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    x_span: f32,
    y_max: f32,
}

impl Viewport {
    fn new(config: &PlotConfig, episodes: usize, max_reward: f32) -> Self {
        let margin = config.margin as f32;
        Self {
            left: margin,
            right: (config.width as f32 - margin).max(margin),
            top: margin,
            bottom: (config.height as f32 - margin).max(margin),
            x_span: episodes.saturating_sub(1).max(1) as f32,
            y_max: max_reward.max(config.solved_threshold).max(1.0) * 1.05,
        }
    }

    fn to_pixel(&self, episode: usize, reward: f32) -> (f32, f32) {
        let x = self.left + episode as f32 / self.x_span * (self.right - self.left);
        let y = self.bottom - reward.clamp(0.0, self.y_max) / self.y_max * (self.bottom - self.top);
        (x, y)
    }
}

fn polyline(
    canvas: &mut Canvas,
    points: &[(f32, f32)],
    color: Rgb<u8>,
    thickness: u32,
    alpha: f32,
) {
    match points {
        [] => {}
        [only] => canvas.line(*only, *only, color, thickness, alpha),
        _ => {
            for pair in points.windows(2) {
                canvas.line(pair[0], pair[1], color, thickness, alpha);
            }
        }
    }
}

/// Draws the reward history: raw totals, their moving average aligned to the
/// last episode of each window, and the solved threshold.
#[must_use]
pub fn render_training_curve(rewards: &[f32], config: &PlotConfig) -> RgbImage {
    let mut canvas = Canvas::new(config.width, config.height, BACKGROUND);
    let max_reward = rewards.iter().copied().fold(0.0, f32::max);
    let view = Viewport::new(config, rewards.len(), max_reward);

    canvas.line((view.left, view.bottom), (view.right, view.bottom), AXIS, 1, 1.0);
    canvas.line((view.left, view.bottom), (view.left, view.top), AXIS, 1, 1.0);
    for tick in 0..=10u8 {
        let t = f32::from(tick) / 10.0;
        let x = view.left + t * (view.right - view.left);
        let y = view.bottom - t * (view.bottom - view.top);
        canvas.line((x, view.bottom), (x, view.bottom + 4.0), AXIS, 1, 1.0);
        canvas.line((view.left - 4.0, y), (view.left, y), AXIS, 1, 1.0);
    }

    let raw: Vec<_> = rewards.iter().enumerate().map(|(i, &r)| view.to_pixel(i, r)).collect();
    polyline(&mut canvas, &raw, RAW, 1, config.raw_alpha);

    let offset = config.window.max(1) - 1;
    let average: Vec<_> = moving_average(rewards, config.window)
        .into_iter()
        .enumerate()
        .map(|(i, r)| view.to_pixel(i + offset, r))
        .collect();
    polyline(&mut canvas, &average, AVERAGE, 2, 1.0);

    let (_, threshold_y) = view.to_pixel(0, config.solved_threshold);
    canvas.dashed_hline(threshold_y, view.left, view.right, 6, THRESHOLD, 1);

    canvas.into_image()
}

/// Renders `rewards` and writes the result to `path` as a PNG.
///
/// # Errors
///
/// Fails if the image cannot be encoded or written.
pub fn save_training_curve(
    path: impl AsRef<Path>,
    rewards: &[f32],
    config: &PlotConfig,
) -> Result<()> {
    let path = path.as_ref();
    render_training_curve(rewards, config)
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write training curve to {}", path.display()))?;
    tracing::debug!(path = %path.display(), episodes = rewards.len(), "training curve written");
    Ok(())
}
