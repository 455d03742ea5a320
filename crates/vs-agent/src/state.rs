//! Agent states, queue roles, and transition records.

use std::fmt;

use vs_core::{AgentId, RoomId, Tick};

// ── AgentState ────────────────────────────────────────────────────────────────

/// Where an agent is in its visit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentState {
    Wandering,
    MovingToQueue,
    WaitingInQueue,
    MovingToRoom,
    UsingRoom,
    ReportingRoom,
    ReturningToSpawn,
}

impl AgentState {
    pub const ALL: [AgentState; 7] = [
        AgentState::Wandering,
        AgentState::MovingToQueue,
        AgentState::WaitingInQueue,
        AgentState::MovingToRoom,
        AgentState::UsingRoom,
        AgentState::ReportingRoom,
        AgentState::ReturningToSpawn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentState::Wandering        => "Wandering",
            AgentState::MovingToQueue    => "MovingToQueue",
            AgentState::WaitingInQueue   => "WaitingInQueue",
            AgentState::MovingToRoom     => "MovingToRoom",
            AgentState::UsingRoom        => "UsingRoom",
            AgentState::ReportingRoom    => "ReportingRoom",
            AgentState::ReturningToSpawn => "ReturningToSpawn",
        }
    }

    /// Human-readable status label, e.g. `"moving to Room_3_4"`.
    pub fn description(self, room: Option<RoomId>) -> String {
        match (self, room) {
            (AgentState::Wandering, _)              => "wandering".to_owned(),
            (AgentState::MovingToQueue, _)          => "moving to queue".to_owned(),
            (AgentState::WaitingInQueue, _)         => "waiting in queue".to_owned(),
            (AgentState::MovingToRoom, Some(room))  => format!("moving to {room}"),
            (AgentState::MovingToRoom, None)        => "moving to room".to_owned(),
            (AgentState::UsingRoom, Some(room))     => format!("using {room}"),
            (AgentState::UsingRoom, None)           => "using room".to_owned(),
            (AgentState::ReportingRoom, Some(room)) => format!("reporting {room} vacant"),
            (AgentState::ReportingRoom, None)       => "reporting room vacant".to_owned(),
            (AgentState::ReturningToSpawn, _)       => "leaving".to_owned(),
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── QueueRole ─────────────────────────────────────────────────────────────────

/// Why an agent is standing in the counter queue.
///
/// Not stored: an agent holding a room is reporting it vacant, anyone else is
/// asking for one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QueueRole {
    Assignment,
    VacancyReport,
}

impl QueueRole {
    pub fn for_room(held: Option<RoomId>) -> QueueRole {
        match held {
            Some(_) => QueueRole::VacancyReport,
            None    => QueueRole::Assignment,
        }
    }
}

// ── Transition ────────────────────────────────────────────────────────────────

/// One state change, as reported to observers.
///
/// `from == None` marks a spawn, `to == None` a retirement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub tick:  Tick,
    pub agent: AgentId,
    pub from:  Option<AgentState>,
    pub to:    Option<AgentState>,
    /// Room held at the moment of the change.
    pub room:  Option<RoomId>,
}
