//! `vs-agent` — the venue visitor state machine.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`state`]  | `AgentState`, `QueueRole`, `Transition` records                 |
//! | [`config`] | `BehaviorConfig` — every duration, probability and radius       |
//! | [`env`]    | `AgentEnv<'a>` — shared collaborators handed to each step       |
//! | [`agent`]  | `Agent` — one visitor; `Wake`, `Lifecycle`, `UsageMode`         |
//! | [`pool`]   | `LifecyclePool` trait, `SpawnPool`                              |
//! | [`error`]  | `AgentError`, `AgentResult<T>`                                  |
//!
//! # Visit cycle
//!
//! ```text
//!              ┌──────────── refused / no room (50 %) ─────────────┐
//!              │                                                   ▼
//!  spawn ─▶ MovingToQueue ─▶ WaitingInQueue ─▶ MovingToRoom ─▶ UsingRoom
//!    │                            ▲                                │
//!    ▼                            │                                ▼
//!  Wandering ──▶ ReturningToSpawn ◀── served (vacancy) ◀── ReportingRoom
//! ```
//!
//! Every wait in the cycle is either a timer ([`Wake::At`]) or a signal the
//! simulator delivers: arrival at the current destination, or the end of a
//! counter session.  An agent never blocks, and never holds the registry or
//! queue lock beyond a single call.

pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod pool;
pub mod state;


pub use agent::{Agent, Lifecycle, UsageMode, Wake};
pub use config::BehaviorConfig;
pub use env::AgentEnv;
pub use error::{AgentError, AgentResult};
pub use pool::{LifecyclePool, SpawnPool};
pub use state::{AgentState, QueueRole, Transition};
