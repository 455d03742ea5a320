//! `CounterQueue` — a bounded FIFO in front of a single service counter.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;
use vs_core::{AgentId, Point, SimClock, Tick};

use crate::QueueCoordinator;

// ── CounterConfig ─────────────────────────────────────────────────────────────

/// Layout and timing of the service counter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CounterConfig {
    /// Maximum members, including the one being served.
    pub capacity:       usize,
    /// Length of one service session in seconds.
    pub service_secs:   f32,
    /// Position of the counter; slot 0 stands here.
    pub counter:        Point,
    /// Distance between consecutive standing slots (metres).
    pub slot_spacing:   f32,
    /// Direction in which the line extends away from the counter.
    /// Normalised on construction; a zero vector falls back to `+z`.
    pub slot_direction: Point,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            capacity:       8,
            service_secs:   5.0,
            counter:        Point::ZERO,
            slot_spacing:   1.0,
            slot_direction: Point::new(0.0, 0.0, 1.0),
        }
    }
}

// ── CounterQueue ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct CounterState {
    members: VecDeque<AgentId>,
    /// Agent at the counter and the tick its session ends.
    serving: Option<(AgentId, Tick)>,
}

/// [`QueueCoordinator`] for one counter with a fixed service duration.
///
/// Members are served strictly in join order.  Slot `i` is
/// `counter + direction * spacing * i`, so when the front member leaves
/// everyone's slot moves one step closer; agents pick that up by re-reading
/// [`slot_position`](QueueCoordinator::slot_position) while they wait.
#[derive(Debug)]
pub struct CounterQueue {
    capacity:      usize,
    service_ticks: u64,
    counter:       Point,
    step:          Point,
    state:         Mutex<CounterState>,
}

impl CounterQueue {
    /// Build a queue, converting the service duration with `clock`'s tick
    /// length.  A capacity of zero refuses everyone.
    pub fn new(config: CounterConfig, clock: &SimClock) -> Self {
        let dir = config.slot_direction.with_y(0.0);
        let len = dir.length();
        let unit = if len > f32::EPSILON {
            dir.scale(1.0 / len)
        } else {
            Point::new(0.0, 0.0, 1.0)
        };
        Self {
            capacity:      config.capacity,
            service_ticks: clock.ticks_for_secs(config.service_secs).max(1),
            counter:       config.counter,
            step:          unit.scale(config.slot_spacing.max(0.0)),
            state:         Mutex::new(CounterState::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn service_ticks(&self) -> u64 {
        self.service_ticks
    }

    /// The agent currently at the counter, if any.
    pub fn serving(&self) -> Option<AgentId> {
        self.lock().serving.map(|(agent, _)| agent)
    }

    /// Members in queue order.
    pub fn members(&self) -> Vec<AgentId> {
        self.lock().members.iter().copied().collect()
    }

    /// Every method leaves the state consistent before it can panic, so a
    /// poisoned guard is still usable.
    fn lock(&self) -> MutexGuard<'_, CounterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl QueueCoordinator for CounterQueue {
    fn try_join(&self, agent: AgentId) -> bool {
        let mut state = self.lock();
        if state.members.contains(&agent) {
            return true;
        }
        if state.members.len() >= self.capacity {
            debug!(agent = %agent, capacity = self.capacity, "queue full, join refused");
            return false;
        }
        state.members.push_back(agent);
        debug!(agent = %agent, slot = state.members.len() - 1, "joined queue");
        true
    }

    fn can_receive_service(&self, agent: AgentId) -> bool {
        let state = self.lock();
        state.serving.is_none() && state.members.front() == Some(&agent)
    }

    fn start_service(&self, agent: AgentId, now: Tick) -> bool {
        let mut state = self.lock();
        if state.serving.is_some() || state.members.front() != Some(&agent) {
            return false;
        }
        let done = now + self.service_ticks;
        state.serving = Some((agent, done));
        debug!(agent = %agent, until = %done, "service started");
        true
    }

    fn leave(&self, agent: AgentId) {
        let mut state = self.lock();
        if let Some(pos) = state.members.iter().position(|&a| a == agent) {
            state.members.remove(pos);
        }
        if matches!(state.serving, Some((a, _)) if a == agent) {
            state.serving = None;
        }
    }

    fn slot_position(&self, agent: AgentId) -> Option<Point> {
        let state = self.lock();
        let slot = state.members.iter().position(|&a| a == agent)?;
        Some(self.counter + self.step.scale(slot as f32))
    }

    fn counter_position(&self) -> Point {
        self.counter
    }

    fn tick_completions(&self, now: Tick) -> Vec<AgentId> {
        let mut state = self.lock();
        match state.serving {
            Some((agent, done)) if done <= now => {
                state.serving = None;
                if let Some(pos) = state.members.iter().position(|&a| a == agent) {
                    state.members.remove(pos);
                }
                debug!(agent = %agent, "service complete");
                vec![agent]
            }
            _ => Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.lock().members.len()
    }
}
