//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use vs_agent::{Agent, BehaviorConfig, SpawnPool};
use vs_core::{AgentId, Point, SimConfig};
use vs_nav::NavigationAdapter;
use vs_queue::QueueCoordinator;
use vs_rooms::{RoomRegistry, RoomScanSource};

use crate::{RespawnPolicy, Sim, SimError, SimResult, WakeQueue};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, tick duration, …
/// - the agent count
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                                   |
/// |-------------------------|-------------------------------------------|
/// | `.navigation(v)`        | No adapter (agents fail initialisation)   |
/// | `.behavior(b)`          | `BehaviorConfig::default()`               |
/// | `.registry(r)`          | Empty `RoomRegistry`                      |
/// | `.queue(q)`             | None (agents fail initialisation)         |
/// | `.scan_source(s)`       | None (registry only changes externally)   |
/// | `.pool(p)`              | None (retired agents are destroyed)       |
/// | `.spawn_anchor(p)`      | None (agents fail initialisation)         |
/// | `.respawn(n, max)`      | Disabled                                  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, 5)
///     .navigation(walkers)
///     .queue(Arc::new(CounterQueue::new(counter, &clock)))
///     .scan_source(Box::new(StaticScan::new(rooms)))
///     .spawn_anchor(Point::on_floor(2.0, 2.0))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:       SimConfig,
    agent_count:  usize,
    navigation:   Option<Vec<Option<Box<dyn NavigationAdapter>>>>,
    behavior:     BehaviorConfig,
    registry:     Option<Arc<RoomRegistry>>,
    queue:        Option<Arc<dyn QueueCoordinator>>,
    scan:         Option<Box<dyn RoomScanSource>>,
    pool:         Option<Arc<SpawnPool>>,
    spawn_anchor: Option<Point>,
    respawn:      RespawnPolicy,
}

impl SimBuilder {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, agent_count: usize) -> Self {
        Self {
            config,
            agent_count,
            navigation:   None,
            behavior:     BehaviorConfig::default(),
            registry:     None,
            queue:        None,
            scan:         None,
            pool:         None,
            spawn_anchor: None,
            respawn:      RespawnPolicy::default(),
        }
    }

    /// One navigation adapter per agent (must be length `agent_count`).
    ///
    /// A `None` entry leaves that agent without navigation; it is destroyed
    /// at initialisation while the others run normally.
    pub fn navigation(mut self, navs: Vec<Option<Box<dyn NavigationAdapter>>>) -> Self {
        self.navigation = Some(navs);
        self
    }

    pub fn behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    /// Share an existing registry, e.g. to inspect occupancy from outside.
    pub fn registry(mut self, registry: Arc<RoomRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn queue(mut self, queue: Arc<dyn QueueCoordinator>) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn scan_source(mut self, scan: Box<dyn RoomScanSource>) -> Self {
        self.scan = Some(scan);
        self
    }

    /// Retired agents go to `pool` instead of being destroyed.
    pub fn pool(mut self, pool: Arc<SpawnPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn spawn_anchor(mut self, spawn: Point) -> Self {
        self.spawn_anchor = Some(spawn);
        self
    }

    /// Every `interval_ticks`, respawn pooled agents while fewer than
    /// `max_active` are active.  Requires [`pool`](Self::pool).
    pub fn respawn(mut self, interval_ticks: u64, max_active: usize) -> Self {
        self.respawn = RespawnPolicy { interval_ticks, max_active };
        self
    }

    /// Validate inputs, create the agents, and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        if self.respawn.interval_ticks > 0 && self.pool.is_none() {
            return Err(SimError::Config("respawn requires a spawn pool".into()));
        }
        if u32::try_from(self.agent_count).is_err() {
            return Err(SimError::Config(format!("agent count {} exceeds u32", self.agent_count)));
        }

        // ── Validate and resolve optional inputs ──────────────────────────
        let navigation = match self.navigation {
            Some(n) => {
                if n.len() != self.agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: self.agent_count,
                        got:      n.len(),
                        what:     "navigation adapters",
                    });
                }
                n
            }
            None => (0..self.agent_count).map(|_| None).collect(),
        };

        let seed = self.config.seed;
        let agents: Vec<Agent> = navigation
            .into_iter()
            .enumerate()
            .map(|(i, nav)| Agent::new(AgentId(i as u32), seed, nav))
            .collect();

        Ok(Sim {
            clock:        self.config.make_clock(),
            config:       self.config,
            behavior:     self.behavior,
            agents,
            registry:     self.registry.unwrap_or_default(),
            queue:        self.queue,
            pool:         self.pool,
            spawn_anchor: self.spawn_anchor,
            scan:         self.scan,
            respawn:      self.respawn,
            wake_queue:   WakeQueue::new(),
            started:      false,
        })
    }
}
