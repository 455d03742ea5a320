//! Where retired agents go.

use std::sync::{Mutex, PoisonError};

use vs_core::AgentId;

/// Receives agents that finished their visit (or were force-recycled).
///
/// Called from agent steps, possibly on several threads at once.
pub trait LifecyclePool: Send + Sync {
    fn return_to_pool(&self, agent: AgentId);
}

/// A [`LifecyclePool`] that remembers returned ids for respawning.
#[derive(Debug, Default)]
pub struct SpawnPool {
    pooled: Mutex<Vec<AgentId>>,
}

impl SpawnPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove up to `max` pooled ids, lowest first.
    pub fn take(&self, max: usize) -> Vec<AgentId> {
        let mut pooled = self.pooled.lock().unwrap_or_else(PoisonError::into_inner);
        pooled.sort_unstable();
        let n = max.min(pooled.len());
        pooled.drain(..n).collect()
    }

    pub fn len(&self) -> usize {
        self.pooled.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LifecyclePool for SpawnPool {
    fn return_to_pool(&self, agent: AgentId) {
        let mut pooled = self.pooled.lock().unwrap_or_else(PoisonError::into_inner);
        if !pooled.contains(&agent) {
            pooled.push(agent);
        }
    }
}
