//! `Walker` — a straight-line [`NavigationAdapter`] over a [`NavSurface`].

use std::sync::Arc;

use vs_core::{AreaMask, Point};

use crate::{NavSurface, NavigationAdapter};

/// Default walking speed in metres per second.
pub const DEFAULT_SPEED: f32 = 1.5;

/// Moves its agent in a straight line toward the destination at a constant
/// speed.
///
/// There is no obstacle avoidance: on a non-convex surface a walker can step
/// off the walkable area, which the simulator treats as an environment fault.
pub struct Walker {
    surface:           Arc<NavSurface>,
    position:          Point,
    destination:       Option<Point>,
    speed:             f32,
    arrival_threshold: f32,
}

impl Walker {
    pub fn new(surface: Arc<NavSurface>, position: Point, arrival_threshold: f32) -> Self {
        Self {
            surface,
            position,
            destination: None,
            speed: DEFAULT_SPEED,
            arrival_threshold,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed.max(0.0);
        self
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Distance left to the current destination; zero when there is none.
    pub fn remaining_distance(&self) -> f32 {
        self.destination
            .map(|d| self.position.distance(d))
            .unwrap_or(0.0)
    }
}

impl NavigationAdapter for Walker {
    fn set_destination(&mut self, point: Point) {
        self.destination = Some(point);
    }

    fn has_arrived(&self) -> bool {
        self.remaining_distance() < self.arrival_threshold
    }

    fn is_on_navigable_surface(&self) -> bool {
        self.surface.contains(self.position)
    }

    fn snap_to_surface(&self, point: Point, radius: f32, mask: AreaMask) -> Option<Point> {
        self.surface.snap(point, radius, mask)
    }

    fn position(&self) -> Point {
        self.position
    }

    fn destination(&self) -> Option<Point> {
        self.destination
    }

    fn has_area(&self, area: u8) -> bool {
        self.surface.has_area(area)
    }

    fn advance(&mut self, dt_secs: f32) {
        if let Some(dest) = self.destination {
            self.position = self.position.step_toward(dest, self.speed * dt_secs);
        }
    }

    fn warp(&mut self, point: Point) {
        self.position = point;
        self.destination = None;
    }
}
