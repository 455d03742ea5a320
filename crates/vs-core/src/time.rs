//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  The mapping to
//! wall-clock time is held in `SimClock`:
//!
//!   wall_time_ms = start_unix_secs * 1000 + tick * tick_duration_ms
//!
//! Every "wait N seconds" in agent behaviour becomes a wake scheduled
//! `clock.ticks_for_secs(n)` ticks in the future.  The default tick is 100 ms,
//! which matches the queue polling interval, so no poll ever rounds to zero.

use std::fmt;

use crate::{VsError, VsResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and seconds.
///
/// `SimClock` is cheap to copy and holds no heap data.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Unix timestamp (seconds since epoch) of tick 0.
    pub start_unix_secs: i64,
    /// Milliseconds of simulated time per tick.  Default: 100.
    pub tick_duration_ms: u32,
    /// The current tick — advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start_unix_secs: i64, tick_duration_ms: u32) -> Self {
        Self {
            start_unix_secs,
            tick_duration_ms: tick_duration_ms.max(1),
            current_tick: Tick::ZERO,
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Simulated seconds covered by one tick.
    #[inline]
    pub fn tick_secs(&self) -> f32 {
        self.tick_duration_ms as f32 / 1000.0
    }

    /// Elapsed simulated milliseconds since tick 0.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.current_tick.0 * self.tick_duration_ms as u64
    }

    /// Current Unix timestamp (whole seconds) corresponding to `current_tick`.
    #[inline]
    pub fn current_unix_secs(&self) -> i64 {
        self.unix_secs_at(self.current_tick)
    }

    /// Unix timestamp (whole seconds) of an arbitrary tick.
    #[inline]
    pub fn unix_secs_at(&self, tick: Tick) -> i64 {
        self.start_unix_secs + (tick.0 * self.tick_duration_ms as u64 / 1000) as i64
    }

    /// How many ticks span `secs` seconds?  Rounds up so a timed wait never
    /// resumes early; any positive duration is at least one tick.
    ///
    /// The duration is rounded to whole milliseconds first so `0.1 s` at a
    /// 100 ms tick is exactly one tick rather than two.
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        if secs <= 0.0 {
            return 0;
        }
        let ms = (secs as f64 * 1000.0).round() as u64;
        ms.div_ceil(self.tick_duration_ms as u64).max(1)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.elapsed_ms();
        write!(f, "{} ({}.{:03} s)", self.current_tick, ms / 1000, ms % 1000)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Unix timestamp for tick 0.
    pub start_unix_secs: i64,

    /// Milliseconds per tick.  Default: 100.
    pub tick_duration_ms: u32,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results when
    /// the `parallel` feature is off.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Emit a snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,

    /// Re-scan rooms every N ticks.  0 = scan once at start-up only.
    pub rescan_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_unix_secs:       0,
            tick_duration_ms:      100,
            total_ticks:           6_000, // ten simulated minutes
            seed:                  42,
            num_threads:           None,
            output_interval_ticks: 10,
            rescan_interval_ticks: 0,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs, self.tick_duration_ms)
    }

    /// Reject settings the tick loop cannot run with.
    pub fn validate(&self) -> VsResult<()> {
        if self.tick_duration_ms == 0 {
            return Err(VsError::Config("tick_duration_ms must be positive".into()));
        }
        if self.num_threads == Some(0) {
            return Err(VsError::Config("num_threads must be at least 1 when set".into()));
        }
        Ok(())
    }
}
