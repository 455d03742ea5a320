//! `vs-rooms` — the shared room registry.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`room`]      | `RoomDescriptor` (scan input), `Room`, `RoomView`               |
//! | [`registry`]  | `RoomRegistry` (merge / reserve / release / lookup), `MergeReport` |
//! | [`scan`]      | `RoomScanSource` trait, `StaticScan`, `ScriptedScan`, `ChannelScan` |
//!
//! # Concurrency model
//!
//! One `RoomRegistry` is shared by every agent through an `Arc`.  All
//! mutation happens inside a single `Mutex` critical section per call, and no
//! call ever blocks on anything else while holding it.  Agents never keep a
//! guard across a wait, so any number of suspended agents can coexist with a
//! live registry.
//!
//! Each room records the agent holding it, and only that agent can release
//! it.  A held room dropped by a rescan stays claimed until its holder
//! releases it, so reappearing rooms are never handed out twice.
//!
//! ```text
//!  scan source ──merge──────────────▶ Mutex<Catalog>
//!  agent A ─────try_reserve_random──▶      │
//!  agent B ─────release─────────────▶      │
//!  agent C ─────lookup──────────────▶      │
//! ```

pub mod registry;
pub mod room;
pub mod scan;

#[cfg(test)]
mod tests;

pub use registry::{MergeReport, RoomRegistry};
pub use room::{DEFAULT_ROOM_SIZE, Room, RoomDescriptor, RoomView};
pub use scan::{ChannelScan, RoomScanSource, ScanPublisher, ScriptedScan, StaticScan};
