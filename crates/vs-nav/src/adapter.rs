//! The `NavigationAdapter` trait — the movement service each agent drives.

use vs_core::{AreaMask, Point};

/// Per-agent movement service.
///
/// An agent owns exactly one adapter.  It issues destinations and asks
/// whether it has arrived; the simulator advances the adapter once per tick
/// and checks that the agent is still on walkable ground.
///
/// # Thread safety
///
/// Adapters move with their agent onto Rayon workers, so they must be `Send`.
/// They are never shared between agents.
pub trait NavigationAdapter: Send {
    /// Start moving toward `point`, replacing any previous destination.
    fn set_destination(&mut self, point: Point);

    /// `true` once the current destination is within the arrival threshold.
    /// With no destination the agent counts as arrived where it stands.
    fn has_arrived(&self) -> bool;

    /// `false` once the agent has left the walkable surface.
    fn is_on_navigable_surface(&self) -> bool;

    /// Nearest walkable point to `point` within `radius` on an area in
    /// `mask`, or `None`.
    fn snap_to_surface(&self, point: Point, radius: f32, mask: AreaMask) -> Option<Point>;

    /// Current position.
    fn position(&self) -> Point;

    /// Current destination, if any.
    fn destination(&self) -> Option<Point>;

    /// Whether the surface defines navigation area `area` at all.
    ///
    /// Default: every area exists.
    fn has_area(&self, _area: u8) -> bool {
        true
    }

    /// Advance movement by `dt_secs` of simulated time.
    fn advance(&mut self, dt_secs: f32);

    /// Teleport to `point` and clear the destination (spawn placement).
    fn warp(&mut self, point: Point);
}

impl<N: NavigationAdapter + ?Sized> NavigationAdapter for Box<N> {
    fn set_destination(&mut self, point: Point) {
        (**self).set_destination(point)
    }
    fn has_arrived(&self) -> bool {
        (**self).has_arrived()
    }
    fn is_on_navigable_surface(&self) -> bool {
        (**self).is_on_navigable_surface()
    }
    fn snap_to_surface(&self, point: Point, radius: f32, mask: AreaMask) -> Option<Point> {
        (**self).snap_to_surface(point, radius, mask)
    }
    fn position(&self) -> Point {
        (**self).position()
    }
    fn destination(&self) -> Option<Point> {
        (**self).destination()
    }
    fn has_area(&self, area: u8) -> bool {
        (**self).has_area(area)
    }
    fn advance(&mut self, dt_secs: f32) {
        (**self).advance(dt_secs)
    }
    fn warp(&mut self, point: Point) {
        (**self).warp(point)
    }
}
