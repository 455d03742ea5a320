//! The `Sim` struct and its tick loop.

use std::sync::Arc;

use tracing::{debug, error, info};
use vs_agent::{Agent, AgentEnv, AgentState, BehaviorConfig, Lifecycle, LifecyclePool, SpawnPool, Transition, Wake};
use vs_core::{AgentId, Point, SimClock, SimConfig, Tick, VsError};
use vs_queue::QueueCoordinator;
use vs_rooms::{RoomRegistry, RoomScanSource};

use crate::{SimObserver, SimResult, WakeQueue};

// ── RespawnPolicy ─────────────────────────────────────────────────────────────

/// When pooled agents come back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RespawnPolicy {
    /// Check the pool every N ticks.  0 disables respawning.
    pub interval_ticks: u64,
    /// Respawn only while fewer than this many agents are active.
    pub max_active:     usize,
}

impl RespawnPolicy {
    fn is_due(&self, now: Tick) -> bool {
        self.interval_ticks > 0 && now.0 > 0 && now.0 % self.interval_ticks == 0
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim` owns every agent and drives the tick loop described in the crate
/// docs.  The registry, queue and pool are shared through `Arc` so that
/// callers can keep a handle for inspection while the sim runs.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (total ticks, seed, tick duration, …).
    pub config: SimConfig,

    /// Simulation clock — tracks the current tick and maps to wall time.
    pub clock: SimClock,

    /// Visit-cycle tunables handed to every agent step.
    pub behavior: BehaviorConfig,

    /// All agents, indexed by `AgentId`.
    pub agents: Vec<Agent>,

    /// The shared room catalog.
    pub registry: Arc<RoomRegistry>,

    /// The service counter.  Without one every agent fails initialisation.
    pub queue: Option<Arc<dyn QueueCoordinator>>,

    /// Where retired agents wait for respawn.  `None` destroys them.
    pub pool: Option<Arc<SpawnPool>>,

    /// Where agents appear and where they return to leave.
    pub spawn_anchor: Option<Point>,

    /// Room discovery; polled on the first tick and every
    /// `config.rescan_interval_ticks`.
    pub scan: Option<Box<dyn RoomScanSource>>,

    pub respawn: RespawnPolicy,

    /// Sparse timer queue (`BTreeMap<Tick, Vec<(AgentId, epoch)>>`).
    pub wake_queue: WakeQueue,

    /// Agents are initialised on the first processed tick.
    pub(crate) started: bool,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.config.validate()?;
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }
            self.run_one(now, observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        self.config.validate()?;
        for _ in 0..n {
            let now = self.clock.current_tick;
            self.run_one(now, observer);
        }
        Ok(())
    }

    /// Look up an agent by id.
    pub fn agent(&self, id: AgentId) -> SimResult<&Agent> {
        self.agents
            .get(id.index())
            .ok_or_else(|| VsError::AgentNotFound(id).into())
    }

    /// Agents currently taking part in the simulation.
    pub fn active_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_active()).count()
    }

    /// Active agents in `state`.
    pub fn count_in(&self, state: AgentState) -> usize {
        self.agents
            .iter()
            .filter(|a| a.is_active() && a.state() == state)
            .count()
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn run_one<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        observer.on_tick_start(now);
        let (woken, transitions) = self.process_tick(now);
        for t in &transitions {
            observer.on_transition(t);
        }
        observer.on_tick_end(now, woken);
        if self.config.output_interval_ticks > 0
            && now.0 % self.config.output_interval_ticks == 0
        {
            observer.on_snapshot(now, &self.agents, &self.registry);
        }
        self.clock.advance();
    }

    /// One tick.  Returns the number of agents stepped and the transition
    /// records produced, ordered by agent.
    fn process_tick(&mut self, now: Tick) -> (usize, Vec<Transition>) {
        // ── Phase 1: room discovery ───────────────────────────────────────
        self.scan_rooms(now);

        // Explicit field borrows so the borrow checker sees disjoint access.
        let env = AgentEnv {
            registry:     &*self.registry,
            queue:        self.queue.as_deref(),
            pool:         self.pool.as_deref().map(|p| p as &dyn LifecyclePool),
            behavior:     &self.behavior,
            clock:        &self.clock,
            spawn_anchor: self.spawn_anchor,
        };

        // Agents whose wake or transition log may have changed this tick.
        let mut touched: Vec<AgentId> = Vec::new();

        // ── Phase 2: first-tick spawn ─────────────────────────────────────
        if !self.started {
            self.started = true;
            for agent in self.agents.iter_mut() {
                if let Err(e) = agent.initialize(&env, now) {
                    error!(agent = %agent.id(), error = %e, "agent failed to initialise");
                }
                touched.push(agent.id());
            }
        }

        // ── Phase 3: movement ─────────────────────────────────────────────
        //
        // Every active adapter advances by one tick.  Leaving the walkable
        // surface is an environment fault handled by a forced recycle.
        let dt = self.clock.tick_secs();
        let mut woken: Vec<AgentId> = Vec::new();
        for agent in self.agents.iter_mut().filter(|a| a.is_active()) {
            let Some(nav) = agent.nav_mut() else { continue };
            nav.advance(dt);
            let on_surface = nav.is_on_navigable_surface();
            let arrived = nav.has_arrived();
            if !on_surface {
                agent.force_recycle(&env, now);
                touched.push(agent.id());
            } else if arrived && agent.wake() == Wake::OnArrival {
                woken.push(agent.id());
            }
        }

        // ── Phase 4: counter completions ──────────────────────────────────
        let mut served = 0;
        if let Some(queue) = env.queue {
            for id in queue.tick_completions(now) {
                let Some(agent) = self.agents.get_mut(id.index()) else { continue };
                agent.on_service_complete(&env, now);
                touched.push(id);
                served += 1;
            }
        }

        // ── Phase 5: drain timers ─────────────────────────────────────────
        //
        // An entry is live only if the agent is still active, has not changed
        // state since scheduling, and is still waiting on exactly this tick.
        if let Some(entries) = self.wake_queue.drain_tick(now) {
            for (id, epoch) in entries {
                let Some(agent) = self.agents.get(id.index()) else { continue };
                if agent.is_active() && agent.epoch() == epoch && agent.wake() == Wake::At(now) {
                    woken.push(id);
                }
            }
        }
        woken.sort_unstable();
        woken.dedup();

        // ── Phase 6: step woken agents ────────────────────────────────────
        #[cfg(not(feature = "parallel"))]
        {
            for &id in &woken {
                if let Some(agent) = self.agents.get_mut(id.index()) {
                    agent.step(&env, now);
                }
            }
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let mut due = vec![false; self.agents.len()];
            for id in &woken {
                due[id.index()] = true;
            }
            self.agents
                .par_iter_mut()
                .zip(due.par_iter())
                .filter(|(_, due)| **due)
                .for_each(|(agent, _)| {
                    agent.step(&env, now);
                });
        }

        let woken_count = woken.len() + served;
        touched.extend(woken);

        // ── Phase 7: respawn ──────────────────────────────────────────────
        if self.respawn.is_due(now) {
            if let Some(pool) = self.pool.as_deref() {
                let active = self.agents.iter().filter(|a| a.is_active()).count();
                let room_for = self.respawn.max_active.saturating_sub(active);
                let mut respawned = 0;
                for id in pool.take(room_for) {
                    let Some(agent) = self.agents.get_mut(id.index()) else { continue };
                    if agent.lifecycle() != Lifecycle::Pooled {
                        continue;
                    }
                    match agent.initialize(&env, now) {
                        Ok(_) => respawned += 1,
                        Err(e) => error!(agent = %id, error = %e, "agent failed to respawn"),
                    }
                    touched.push(id);
                }
                if respawned > 0 {
                    info!(tick = %now, respawned, active = active + respawned, "pooled agents respawned");
                }
            }
        }

        // ── Phase 8: reschedule and collect transitions ───────────────────
        touched.sort_unstable();
        touched.dedup();
        let mut transitions = Vec::new();
        for id in touched {
            let Some(agent) = self.agents.get_mut(id.index()) else { continue };
            // Agent timers are always at least one tick ahead.
            if let Wake::At(t) = agent.wake() {
                self.wake_queue.push(t, id, agent.epoch());
            }
            transitions.extend(agent.drain_transitions());
        }

        (woken_count, transitions)
    }

    /// Poll the scan source if a scan is due and merge what it reports.
    fn scan_rooms(&mut self, now: Tick) {
        let interval = self.config.rescan_interval_ticks;
        let due = !self.started || (interval > 0 && now.0 % interval == 0);
        if !due {
            return;
        }
        let Some(source) = self.scan.as_mut() else { return };
        match source.scan(now) {
            Some(rooms) => {
                let report = self.registry.merge(&rooms);
                if report.is_noop() {
                    debug!(tick = %now, "empty scan ignored");
                } else {
                    debug!(
                        tick     = %now,
                        dropped  = report.dropped,
                        restored = report.restored,
                        total    = report.total,
                        "scan merged"
                    );
                }
            }
            None => debug!(tick = %now, "no new scan"),
        }
    }
}
