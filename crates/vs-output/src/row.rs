//! Plain data row types written by output backends.

use vs_agent::{AgentState, Transition};
use vs_core::RoomId;

/// One state change.  `from == None` is a spawn, `to == None` a retirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRow {
    pub tick:     u64,
    pub agent_id: u32,
    pub from:     Option<AgentState>,
    pub to:       Option<AgentState>,
    pub room:     Option<RoomId>,
}

impl From<&Transition> for TransitionRow {
    fn from(t: &Transition) -> Self {
        Self {
            tick:     t.tick.0,
            agent_id: t.agent.0,
            from:     t.from,
            to:       t.to,
            room:     t.room,
        }
    }
}

/// Where one active agent is and what it is doing.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id: u32,
    pub tick:     u64,
    pub state:    AgentState,
    /// Status label, e.g. `"using Room_3_4"`.
    pub status:   String,
    pub room:     Option<RoomId>,
    pub x:        f32,
    pub z:        f32,
}

/// Summary statistics for one snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:           u64,
    pub unix_time_secs: i64,
    pub woken_agents:   u64,
    pub active_agents:  u64,
    pub using_room:     u64,
    pub occupied_rooms: u64,
    pub total_rooms:    u64,
}
