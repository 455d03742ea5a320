//! The `QueueCoordinator` trait.

use vs_core::{AgentId, Point, Tick};

/// Queue membership and turn-taking for one service counter.
///
/// Shared by every agent (`Arc<dyn QueueCoordinator>`), so implementations
/// synchronise internally and every method takes `&self`.
pub trait QueueCoordinator: Send + Sync {
    /// Ask to join the queue.  `false` means refused (queue full).
    /// Joining twice is a no-op that returns `true`.
    fn try_join(&self, agent: AgentId) -> bool;

    /// `true` when `agent` is at the front and the counter is free.
    /// Agents poll this once they stand at their slot.
    fn can_receive_service(&self, agent: AgentId) -> bool;

    /// Begin a service session for `agent`.  Returns `false` (and does
    /// nothing) if `agent` may not be served right now.
    fn start_service(&self, agent: AgentId, now: Tick) -> bool;

    /// Remove `agent` from the queue, ending its service session if it had
    /// one.  Unknown agents are ignored.
    fn leave(&self, agent: AgentId);

    /// Where `agent` should stand, or `None` if it is not a member.
    fn slot_position(&self, agent: AgentId) -> Option<Point>;

    /// The counter itself; agents treat it as the queue anchor.
    fn counter_position(&self) -> Point;

    /// Finish every session due at or before `now`, removing those agents
    /// from the queue, and return them in completion order.
    fn tick_completions(&self, now: Tick) -> Vec<AgentId>;

    /// Current member count (including the agent being served).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
