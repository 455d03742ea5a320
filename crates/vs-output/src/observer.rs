//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tracing::warn;
use vs_agent::{Agent, AgentState, Transition};
use vs_core::{SimClock, SimConfig, Tick};
use vs_rooms::RoomRegistry;
use vs_sim::SimObserver;

use crate::row::{AgentSnapshotRow, TickSummaryRow, TransitionRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes every transition, plus agent snapshots and a
/// tick summary at each snapshot interval, to any [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    clock:      SimClock,
    /// Agents stepped in the tick most recently ended.
    last_woken: usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for wall-clock
    /// conversion.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            clock:      config.make_clock(),
            last_woken: 0,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_transition(&mut self, transition: &Transition) {
        let result = self.writer.write_transition(&TransitionRow::from(transition));
        self.store_err(result);
    }

    fn on_tick_end(&mut self, _tick: Tick, woken: usize) {
        self.last_woken = woken;
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[Agent], registry: &RoomRegistry) {
        let rows: Vec<AgentSnapshotRow> = agents
            .iter()
            .filter(|a| a.is_active())
            .map(|a| {
                let pos = a.position().unwrap_or_default();
                AgentSnapshotRow {
                    agent_id: a.id().0,
                    tick:     tick.0,
                    state:    a.state(),
                    status:   a.description(),
                    room:     a.assigned_room(),
                    x:        pos.x,
                    z:        pos.z,
                }
            })
            .collect();

        let summary = TickSummaryRow {
            tick:           tick.0,
            unix_time_secs: self.clock.unix_secs_at(tick),
            woken_agents:   self.last_woken as u64,
            active_agents:  rows.len() as u64,
            using_room:     rows.iter().filter(|r| r.state == AgentState::UsingRoom).count() as u64,
            occupied_rooms: registry.occupied_count() as u64,
            total_rooms:    registry.len() as u64,
        };

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
        let result = self.writer.write_tick_summary(&summary);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
