//! Consecutive-tap counting shared by tap-aware recognizers.

use crate::events::Buttons;
use egui::Pos2;
use inline_text_core::GestureConfig;
use std::time::Duration;
use tracing::trace;

/// Counts taps that belong to one double/triple-tap series.
///
/// A down continues the series when the previous tap came up no more than
/// `double_tap_timeout` earlier, within `double_tap_slop` of it, and with the
/// same buttons. Anything else starts a new series at 1. Counting wraps to 1
/// after `max_consecutive_tap`.
#[derive(Clone, Debug)]
pub struct ConsecutiveTapTracker {
    count: u32,
    last_tap_position: Option<Pos2>,
    last_buttons: Option<Buttons>,
    /// Series timer, started on tap-up.
    series_deadline: Option<Duration>,
    origin: Option<Pos2>,
    wandered: bool,
    double_tap_timeout: Duration,
    double_tap_slop: f32,
    max_consecutive_tap: Option<u32>,
}

impl ConsecutiveTapTracker {
    /// # Arguments
    /// - `config`: Supplies the series timeout, tap slop and wrap-around count.
    ///
    /// # Returns
    /// A tracker with no series running.
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            count: 0,
            last_tap_position: None,
            last_buttons: None,
            series_deadline: None,
            origin: None,
            wandered: false,
            double_tap_timeout: config.double_tap_timeout,
            double_tap_slop: config.double_tap_slop,
            max_consecutive_tap: config.max_consecutive_tap,
        }
    }

    /// # Returns
    /// Taps in the current series; 0 when no series is running.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// # Returns
    /// When the running series expires, or `None` while no timer is armed.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.series_deadline
    }

    /// Register a pointer-down.
    ///
    /// # Arguments
    /// - `position`: Where the pointer went down.
    /// - `buttons`: Buttons held; a change of buttons starts a new series.
    /// - `timestamp`: Time of the down, compared against the series timer.
    ///
    /// # Returns
    /// The tap's place in its series, starting at 1.
    pub fn on_down(&mut self, position: Pos2, buttons: Buttons, timestamp: Duration) -> u32 {
        let timer_active = self
            .series_deadline
            .is_some_and(|deadline| timestamp <= deadline);
        let close_enough = self
            .last_tap_position
            .is_some_and(|last| last.distance(position) <= self.double_tap_slop);
        let same_buttons = self.last_buttons == Some(buttons);
        self.count = if timer_active && close_enough && same_buttons {
            match self.max_consecutive_tap {
                Some(max) if self.count >= max => 1,
                _ => self.count + 1,
            }
        } else {
            1
        };
        self.series_deadline = None;
        self.last_buttons = Some(buttons);
        self.origin = Some(position);
        self.wandered = false;
        trace!(count = self.count, "tap down");
        self.count
    }

    /// Register pointer movement; travelling past `hit_slop` ends the series.
    ///
    /// The count drops to 0 at once. The release that follows is ignored, so
    /// the next down starts a fresh series.
    ///
    /// # Arguments
    /// - `position`: Current pointer position.
    /// - `hit_slop`: Travel from the down position a tap may cover.
    pub fn on_move(&mut self, position: Pos2, hit_slop: f32) {
        let Some(origin) = self.origin else {
            return;
        };
        if !self.wandered && origin.distance(position) > hit_slop {
            self.wandered = true;
            self.count = 0;
            self.series_deadline = None;
            self.last_tap_position = None;
            self.last_buttons = None;
            trace!("tap series broken by movement");
        }
    }

    /// Register a pointer-up; a tap that stayed put keeps the series open.
    ///
    /// # Arguments
    /// - `position`: Where the pointer came up.
    /// - `timestamp`: Time of the release; the series timer starts here.
    pub fn on_up(&mut self, position: Pos2, timestamp: Duration) {
        self.origin = None;
        if self.wandered {
            return;
        }
        self.last_tap_position = Some(position);
        self.series_deadline = Some(timestamp + self.double_tap_timeout);
    }

    /// Expire the series once its timer has run out.
    ///
    /// # Arguments
    /// - `now`: Current time on the pointer events' clock.
    ///
    /// # Returns
    /// `true` when this call expired the series.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.series_deadline {
            Some(deadline) if now > deadline => {
                self.reset();
                trace!("tap series timed out");
                true
            }
            _ => false,
        }
    }

    /// Forget the series entirely.
    pub fn reset(&mut self) {
        self.count = 0;
        self.last_tap_position = None;
        self.last_buttons = None;
        self.series_deadline = None;
        self.origin = None;
        self.wandered = false;
    }

    /// Stop the series timer without touching the count.
    pub fn stop_timer(&mut self) {
        self.series_deadline = None;
    }
}
