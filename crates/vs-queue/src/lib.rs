//! `vs-queue` — turn-taking at the shared service counter.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`coordinator`] | `QueueCoordinator` trait — the contract agents rely on    |
//! | [`counter`]     | `CounterQueue` (bounded FIFO, one counter), `CounterConfig` |
//!
//! # Service protocol
//!
//! ```text
//!   try_join ──▶ member (standing slot i)
//!                  │  agent walks to slot_position, polls can_receive_service
//!                  ▼
//!   start_service ──▶ serving (until now + service ticks)
//!                  │
//!   tick_completions(now) ──▶ removed from queue, id reported to the caller
//! ```
//!
//! Both the assignment request and the vacancy report go through the same
//! queue; the coordinator does not know which one an agent is making.

pub mod coordinator;
pub mod counter;


pub use coordinator::QueueCoordinator;
pub use counter::{CounterConfig, CounterQueue};
