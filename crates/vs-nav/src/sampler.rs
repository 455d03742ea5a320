//! `PositionSampler` — finds points for agents to walk to.

use vs_core::{AgentRng, AreaMask, Point};

use crate::NavigationAdapter;

/// Fraction of the requested radius actually searched by
/// [`PositionSampler::sample_within_radius`]; keeps targets off room edges.
pub const RADIUS_SHRINK: f32 = 0.8;

/// Bounded-retry random point search on top of a [`NavigationAdapter`]'s
/// surface snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionSampler {
    /// Attempts made by [`sample_within_radius`](Self::sample_within_radius).
    pub retries: u32,
}

impl Default for PositionSampler {
    fn default() -> Self {
        Self { retries: 3 }
    }
}

impl PositionSampler {
    pub fn new(retries: u32) -> Self {
        Self { retries }
    }

    /// Up to `retries` attempts to find a walkable point within
    /// `radius * 0.8` of `center`.
    ///
    /// Each attempt draws a uniform point in the shrunk disc around `center`
    /// (floor plane), snaps it with the same radius, and accepts the hit only
    /// if it is still within the shrunk radius of `center`.
    pub fn sample_within_radius<N>(
        &self,
        nav:    &N,
        center: Point,
        radius: f32,
        mask:   AreaMask,
        rng:    &mut AgentRng,
    ) -> Option<Point>
    where
        N: NavigationAdapter + ?Sized,
    {
        let search = radius * RADIUS_SHRINK;
        for _ in 0..self.retries {
            let (dx, dz) = rng.in_unit_circle();
            let candidate = center + Point::new(dx * search, 0.0, dz * search);
            match nav.snap_to_surface(candidate, search, mask) {
                Some(hit) if hit.distance(center) <= search => return Some(hit),
                _ => {}
            }
        }
        None
    }

    /// Single attempt: snap a uniform point from the ball of `radius` around
    /// `center`.  Used for unconstrained wandering.
    pub fn sample_free_roam<N>(
        &self,
        nav:    &N,
        center: Point,
        radius: f32,
        mask:   AreaMask,
        rng:    &mut AgentRng,
    ) -> Option<Point>
    where
        N: NavigationAdapter + ?Sized,
    {
        let (dx, dy, dz) = rng.in_unit_sphere();
        let candidate = center + Point::new(dx, dy, dz).scale(radius);
        nav.snap_to_surface(candidate, radius, mask)
    }

    /// Single attempt like [`sample_free_roam`](Self::sample_free_roam), but
    /// the candidate is flattened to height `y` before snapping.
    pub fn sample_free_roam_level<N>(
        &self,
        nav:    &N,
        center: Point,
        radius: f32,
        y:      f32,
        mask:   AreaMask,
        rng:    &mut AgentRng,
    ) -> Option<Point>
    where
        N: NavigationAdapter + ?Sized,
    {
        let (dx, dy, dz) = rng.in_unit_sphere();
        let candidate = (center + Point::new(dx, dy, dz).scale(radius)).with_y(y);
        nav.snap_to_surface(candidate, radius, mask)
    }
}
