//! `vs-sim` — tick loop orchestrator for the rust_venue agent simulation.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Scan       — on the first tick and every `rescan_interval_ticks`,
//!                  merge the scan source's rooms into the registry.
//!   ② Spawn      — first tick only: initialise every agent.
//!   ③ Movement   — advance every active agent's navigation adapter;
//!                  off-surface agents are force-recycled, agents waiting
//!                  on arrival that have arrived are woken.
//!   ④ Counter    — deliver service completions from the queue.
//!   ⑤ Wake       — drain timers due this tick (stale epochs dropped).
//!   ⑥ Step       — step every woken agent in ascending AgentId order
//!                  (parallel with the `parallel` feature).
//!   ⑦ Respawn    — every `respawn.interval_ticks`, re-initialise pooled
//!                  agents up to `respawn.max_active`.
//!   ⑧ Reschedule — push the new timers of every touched agent and hand
//!                  their transition records to the observer.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the step phase on Rayon's thread pool.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use vs_core::SimConfig;
//! use vs_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(config, navs.len())
//!     .navigation(navs)
//!     .queue(Arc::new(counter))
//!     .scan_source(Box::new(StaticScan::new(rooms)))
//!     .spawn_anchor(spawn)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod wake_queue;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{RespawnPolicy, Sim};
pub use wake_queue::WakeQueue;
