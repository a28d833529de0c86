/// Discounted returns `G_t = r_t + γ·G_{t+1}`, one per reward, in input order.
#[must_use]
pub fn discounted_returns(rewards: &[f32], gamma: f32) -> Vec<f32> {
    let mut returns = vec![0.0; rewards.len()];
    let mut running = 0.0;
    for (g, r) in returns.iter_mut().zip(rewards).rev() {
        running = r + gamma * running;
        *g = running;
    }
    returns
}

const NORMALIZE_EPS: f32 = 1e-8;

/// Shifts to zero mean and scales by the sample standard deviation (n - 1
/// denominator) plus a small epsilon. A single value has no spread and maps
/// to `0.0`.
#[must_use]
pub fn normalize(values: &[f32]) -> Vec<f32> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let mean = values.iter().sum::<f32>() / n as f32;
    let std = if n > 1 {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / (n - 1) as f32).sqrt()
    } else {
        0.0
    };
    values.iter().map(|v| (v - mean) / (std + NORMALIZE_EPS)).collect()
}
