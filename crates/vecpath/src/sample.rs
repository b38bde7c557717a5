//! Deterministic digitized strokes (sine wave + jitter + replay tokens).
//!
//! Purpose
//! - Reproducible "mouse/pen" input for benches, property tests and the CLI.
//!   x grows strictly monotonically; y follows a sine with bounded random noise.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::Point;

/// Stroke sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct StrokeCfg {
    /// Number of points (clamped to at least 2).
    pub count: usize,
    /// Horizontal extent.
    pub length: f64,
    /// Sine amplitude.
    pub amplitude: f64,
    /// Number of full periods over `length`.
    pub waves: f64,
    /// Vertical jitter bound, uniform in `[-noise, noise]`.
    pub noise: f64,
    /// Horizontal jitter as a fraction of the base spacing. Clamped to [0, 0.49].
    pub x_jitter_frac: f64,
}

impl Default for StrokeCfg {
    fn default() -> Self {
        Self {
            count: 60,
            length: 100.0,
            amplitude: 20.0,
            waves: 1.5,
            noise: 0.5,
            x_jitter_frac: 0.3,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a noisy sine stroke. Same config and token give the same points.
pub fn draw_stroke(cfg: StrokeCfg, tok: ReplayToken) -> Vec<Point> {
    let mut rng = tok.to_std_rng();
    let n = cfg.count.max(2);
    let length = if cfg.length.is_finite() && cfg.length > 0.0 {
        cfg.length
    } else {
        1.0
    };
    let dx = length / (n - 1) as f64;
    let xj = cfg.x_jitter_frac.clamp(0.0, 0.49);
    let noise = cfg.noise.abs();
    let phase = rng.gen::<f64>() * std::f64::consts::TAU;
    (0..n)
        .map(|i| {
            let jitter = if i == 0 || i == n - 1 {
                0.0
            } else {
                (rng.gen::<f64>() * 2.0 - 1.0) * xj * dx
            };
            let x = i as f64 * dx + jitter;
            let wave = cfg.waves * std::f64::consts::TAU * x / length + phase;
            let y = cfg.amplitude * wave.sin() + (rng.gen::<f64>() * 2.0 - 1.0) * noise;
            Point::new(x, y)
        })
        .collect()
}
