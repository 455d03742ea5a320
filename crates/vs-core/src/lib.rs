//! `vs-core` — foundational types for the `rust_venue` agent simulation.
//!
//! This crate is a dependency of every other `vs-*` crate.  It has no `vs-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `RoomId`                                   |
//! | [`geo`]         | `Point`, `AreaMask`                                   |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]         | `AgentRng` (per-agent)                                |
//! | [`error`]       | `VsError`, `VsResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{VsError, VsResult};
pub use geo::{AreaMask, Point};
pub use ids::{AgentId, RoomId};
pub use rng::AgentRng;
pub use time::{SimClock, SimConfig, Tick};
