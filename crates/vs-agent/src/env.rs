//! `AgentEnv` — what an agent may touch besides itself.

use vs_core::{Point, SimClock};
use vs_queue::QueueCoordinator;
use vs_rooms::RoomRegistry;

use crate::{BehaviorConfig, LifecyclePool};

/// Shared collaborators, borrowed for one tick.
///
/// Everything here is `Sync`, so one `AgentEnv` can be handed to agents
/// stepping on different threads.  The optional fields mirror references a
/// venue may fail to provide; [`Agent::initialize`](crate::Agent::initialize)
/// rejects an agent when the queue or spawn anchor is missing.
#[derive(Clone, Copy)]
pub struct AgentEnv<'a> {
    pub registry:     &'a RoomRegistry,
    pub queue:        Option<&'a dyn QueueCoordinator>,
    /// Where retired agents go; `None` destroys them.
    pub pool:         Option<&'a dyn LifecyclePool>,
    pub behavior:     &'a BehaviorConfig,
    pub clock:        &'a SimClock,
    pub spawn_anchor: Option<Point>,
}

impl<'a> AgentEnv<'a> {
    /// An environment with a registry, queue and spawn anchor but no pool.
    pub fn new(
        registry:     &'a RoomRegistry,
        queue:        &'a dyn QueueCoordinator,
        behavior:     &'a BehaviorConfig,
        clock:        &'a SimClock,
        spawn_anchor: Point,
    ) -> Self {
        Self {
            registry,
            queue: Some(queue),
            pool: None,
            behavior,
            clock,
            spawn_anchor: Some(spawn_anchor),
        }
    }

    pub fn with_pool(mut self, pool: &'a dyn LifecyclePool) -> Self {
        self.pool = Some(pool);
        self
    }
}
