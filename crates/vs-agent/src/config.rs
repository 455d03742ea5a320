//! `BehaviorConfig` — tunables of the visit cycle.

use vs_nav::PositionSampler;

/// Durations are `(min, max)` seconds drawn uniformly; probabilities are in
/// `[0, 1]`; distances are metres.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BehaviorConfig {
    /// Total wandering time before heading home.
    pub wander_secs:         (f32, f32),
    /// Pause between free-roam destinations while wandering.
    pub wander_step_secs:    (f32, f32),
    /// Search radius for free-roam destinations.
    pub free_roam_radius:    f32,
    /// Length of a room visit.
    pub usage_secs:          (f32, f32),
    /// Pause between destinations inside the room.
    pub in_room_step_secs:   (f32, f32),
    /// Pause between destinations around the room.
    pub outside_step_secs:   (f32, f32),
    /// Radius around the room anchor for outside wandering.
    pub outside_radius:      f32,
    /// Back-off before retrying a refused vacancy report.
    pub report_retry_secs:   (f32, f32),
    /// Chance a fresh agent wanders instead of queueing.
    pub initial_wander_prob: f64,
    /// Chance of wandering (rather than leaving) when refused or roomless.
    pub refusal_wander_prob: f64,
    /// Chance a visit is spent inside the room rather than around it.
    pub stay_in_room_prob:   f64,
    /// Distance under which a destination counts as reached.
    pub arrival_threshold:   f32,
    /// Attempts per in-room position search.
    pub sampler_retries:     u32,
    /// Poll interval while waiting for the counter.
    pub queue_poll_secs:     f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            wander_secs:         (15.0, 30.0),
            wander_step_secs:    (3.0, 7.0),
            free_roam_radius:    10.0,
            usage_secs:          (25.0, 35.0),
            in_room_step_secs:   (2.0, 5.0),
            outside_step_secs:   (3.0, 7.0),
            outside_radius:      5.0,
            report_retry_secs:   (1.0, 3.0),
            initial_wander_prob: 0.3,
            refusal_wander_prob: 0.5,
            stay_in_room_prob:   0.5,
            arrival_threshold:   0.5,
            sampler_retries:     3,
            queue_poll_secs:     0.1,
        }
    }
}

impl BehaviorConfig {
    pub fn sampler(&self) -> PositionSampler {
        PositionSampler::new(self.sampler_retries)
    }
}
