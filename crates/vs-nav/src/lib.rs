//! `vs-nav` — movement contract, walkable surface, and position sampling.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`adapter`]  | `NavigationAdapter` trait — what agents need from movement   |
//! | [`surface`]  | `NavSurface` (R-tree of walkable areas), `NavSurfaceBuilder` |
//! | [`walker`]   | `Walker` — straight-line `NavigationAdapter` over a surface  |
//! | [`sampler`]  | `PositionSampler` — bounded-retry point search               |
//! | [`error`]    | `NavError`, `NavResult<T>`                                   |
//!
//! # Scope
//!
//! Path planning is not done here.  `Walker` moves in a straight line and is
//! only meant for convex floor plans, tests, and demos; a real deployment
//! plugs its own navigation service in behind [`NavigationAdapter`].

pub mod adapter;
pub mod error;
pub mod sampler;
pub mod surface;
pub mod walker;


pub use adapter::NavigationAdapter;
pub use error::{NavError, NavResult};
pub use sampler::PositionSampler;
pub use surface::{NavArea, NavSurface, NavSurfaceBuilder};
pub use walker::Walker;
