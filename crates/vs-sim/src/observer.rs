//! Simulation observer trait for progress reporting and data collection.

use vs_agent::{Agent, Transition};
use vs_core::Tick;
use vs_rooms::RoomRegistry;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — occupancy printer
///
/// ```rust,ignore
/// struct Occupancy;
///
/// impl SimObserver for Occupancy {
///     fn on_snapshot(&mut self, tick: Tick, _agents: &[Agent], rooms: &RoomRegistry) {
///         println!("{tick}: {}/{} rooms taken", rooms.occupied_count(), rooms.len());
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per state change, spawn, or retirement recorded this
    /// tick, in ascending agent order.
    fn on_transition(&mut self, _transition: &Transition) {}

    /// Called at the end of each tick.
    ///
    /// `woken` is the number of agents stepped this tick (timers, arrivals
    /// and counter completions together).
    fn on_tick_end(&mut self, _tick: Tick, _woken: usize) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks` ticks).
    ///
    /// Read-only access to every agent and the room registry, so output
    /// writers can record occupancy without the sim knowing any format.
    fn on_snapshot(
        &mut self,
        _tick:     Tick,
        _agents:   &[Agent],
        _registry: &RoomRegistry,
    ) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
