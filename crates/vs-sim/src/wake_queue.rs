//! `WakeQueue` — sparse per-tick agent timers.
//!
//! Agents spend most ticks waiting: walking, standing in line, or idling in a
//! room.  Rather than poll every agent every tick, an agent that starts a
//! timed wait registers the tick it needs attention next, and the simulator
//! drains only that tick's entries.
//!
//! Each entry carries the agent's epoch at scheduling time.  An agent bumps
//! its epoch on every state change, so an entry whose epoch no longer matches
//! belongs to a state the agent has already left and is discarded by the
//! simulator.

use std::collections::BTreeMap;

use vs_core::{AgentId, Tick};

/// Tick → agents (with scheduling epoch) that must wake at that tick.
#[derive(Debug, Default)]
pub struct WakeQueue {
    inner: BTreeMap<Tick, Vec<(AgentId, u64)>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl WakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `agent` to wake at `tick`, stamped with `epoch`.
    pub fn push(&mut self, tick: Tick, agent: AgentId, epoch: u64) {
        self.inner.entry(tick).or_default().push((agent, epoch));
        self.total += 1;
    }

    /// Remove and return every entry scheduled for exactly `tick`.
    ///
    /// Returns `None` when nothing is queued for that tick, the common case.
    pub fn drain_tick(&mut self, tick: Tick) -> Option<Vec<(AgentId, u64)>> {
        let entries = self.inner.remove(&tick)?;
        self.total -= entries.len();
        Some(entries)
    }

    /// The earliest tick with at least one entry, or `None` if empty.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Total number of (tick, agent) entries across all future ticks.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future ticks that have at least one entry.
    pub fn tick_count(&self) -> usize {
        self.inner.len()
    }
}
