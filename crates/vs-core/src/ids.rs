//! Strongly typed identifiers.
//!
//! `AgentId` is a zero-cost index wrapper: the inner integer is the agent's
//! slot in the simulator's agent `Vec`.  `RoomId` is different — it is derived
//! from the room's floor position so that a room keeps its identity across
//! re-scans even when the scanned descriptor objects are brand new.

use std::fmt;

use crate::Point;

// ── AgentId ───────────────────────────────────────────────────────────────────

/// Index of an agent in the simulator's agent table.  Max ~4.3 billion agents.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u32);

impl AgentId {
    /// Sentinel meaning "no valid agent" — equivalent to `u32::MAX`.
    pub const INVALID: AgentId = AgentId(u32::MAX);

    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for AgentId {
    /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.0)
    }
}

impl From<AgentId> for usize {
    #[inline(always)]
    fn from(id: AgentId) -> usize {
        id.0 as usize
    }
}

impl TryFrom<usize> for AgentId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<AgentId, Self::Error> {
        u32::try_from(n).map(AgentId)
    }
}

// ── RoomId ────────────────────────────────────────────────────────────────────

/// Position-derived room identity: the anchor's floor coordinates rounded to
/// whole metres.
///
/// Two descriptors whose anchors round to the same `(x, z)` cell are the same
/// room.  Height is ignored so a re-scan that nudges an anchor vertically does
/// not mint a new room.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomId {
    pub x: i32,
    pub z: i32,
}

impl RoomId {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Derive the id of a room anchored at `anchor`.
    pub fn from_anchor(anchor: Point) -> Self {
        Self {
            x: anchor.x.round() as i32,
            z: anchor.z.round() as i32,
        }
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Room_{}_{}", self.x, self.z)
    }
}
