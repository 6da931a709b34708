//! Release-velocity estimation from recent pointer samples.

use egui::{Pos2, Vec2};
use inline_text_core::constants::VELOCITY_HORIZON;
use std::collections::VecDeque;
use std::time::Duration;

const MAX_SAMPLES: usize = 20;

/// Least-squares velocity over the samples inside a short time horizon.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    samples: VecDeque<(Duration, Pos2)>,
}

impl VelocityTracker {
    /// # Returns
    /// A tracker with no samples.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one position sample; only the newest samples are kept.
    ///
    /// # Arguments
    /// - `timestamp`: Sample time, non-decreasing across calls.
    /// - `position`: Global pointer position.
    pub fn add(&mut self, timestamp: Duration, position: Pos2) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back((timestamp, position));
    }

    /// Velocity estimate at the newest sample.
    ///
    /// # Returns
    /// Logical pixels per second; zero without enough motion.
    pub fn velocity(&self) -> Vec2 {
        let Some(&(newest, _)) = self.samples.back() else {
            return Vec2::ZERO;
        };
        let recent: Vec<(f32, Pos2)> = self
            .samples
            .iter()
            .filter(|(at, _)| newest.saturating_sub(*at) <= VELOCITY_HORIZON)
            .map(|(at, position)| ((*at).as_secs_f32(), *position))
            .collect();
        if recent.len() < 2 {
            return Vec2::ZERO;
        }
        let n = recent.len() as f32;
        let mean_t = recent.iter().map(|(t, _)| t).sum::<f32>() / n;
        let mean_x = recent.iter().map(|(_, p)| p.x).sum::<f32>() / n;
        let mean_y = recent.iter().map(|(_, p)| p.y).sum::<f32>() / n;
        let mut spread = 0.0;
        let mut slope = Vec2::ZERO;
        for (t, p) in &recent {
            let dt = t - mean_t;
            spread += dt * dt;
            slope += Vec2::new(dt * (p.x - mean_x), dt * (p.y - mean_y));
        }
        if spread <= f32::EPSILON {
            return Vec2::ZERO;
        }
        slope / spread
    }
}
