//! Walkable surface: a set of floor rectangles tagged with navigation areas.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over the rectangles' floor-plane footprints answers
//! the two queries the simulation needs:
//!
//! - `snap` — nearest walkable point to an arbitrary point, restricted to an
//!   area mask and a search radius (used by position sampling);
//! - `contains` — is this position on any walkable rectangle (used to detect
//!   agents that have left the surface).

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use vs_core::{AreaMask, Point};

use crate::{NavError, NavResult};

// ── NavArea ───────────────────────────────────────────────────────────────────

/// One axis-aligned walkable rectangle at a fixed floor height.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavArea {
    /// `[x, z]` of the minimum corner.
    pub min:    [f32; 2],
    /// `[x, z]` of the maximum corner.
    pub max:    [f32; 2],
    /// Floor height (`y`) of the rectangle.
    pub height: f32,
    /// Navigation area index (see [`AreaMask`]).
    pub area:   u8,
}

impl NavArea {
    /// Closest point of this rectangle to `p`, at the rectangle's height.
    pub fn closest_point(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.min[0], self.max[0]),
            self.height,
            p.z.clamp(self.min[1], self.max[1]),
        )
    }

    #[inline]
    fn contains_xz(&self, x: f32, z: f32) -> bool {
        x >= self.min[0] && x <= self.max[0] && z >= self.min[1] && z <= self.max[1]
    }
}

impl RTreeObject for NavArea {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

impl PointDistance for NavArea {
    /// Squared floor-plane distance to the rectangle; zero inside it.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = (self.min[0] - point[0]).max(0.0).max(point[0] - self.max[0]);
        let dz = (self.min[1] - point[1]).max(0.0).max(point[1] - self.max[1]);
        dx * dx + dz * dz
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        self.contains_xz(point[0], point[1])
    }
}

// ── NavSurface ────────────────────────────────────────────────────────────────

/// The venue's walkable surface.  Immutable once built; share with `Arc`.
pub struct NavSurface {
    index: RTree<NavArea>,
    /// Bit `i` set if any rectangle carries area `i`.
    areas: AreaMask,
}

impl NavSurface {
    pub fn builder() -> NavSurfaceBuilder {
        NavSurfaceBuilder::new()
    }

    /// Number of walkable rectangles.
    pub fn len(&self) -> usize {
        self.index.size()
    }

    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }

    /// `true` if at least one rectangle carries navigation area `area`.
    pub fn has_area(&self, area: u8) -> bool {
        self.areas.contains(area)
    }

    /// `true` if `p` lies over a walkable rectangle (height is ignored).
    pub fn contains(&self, p: Point) -> bool {
        self.index.locate_all_at_point(&[p.x, p.z]).next().is_some()
    }

    /// Nearest walkable point to `p` within `radius` metres on an area whose
    /// bit is set in `mask`.
    ///
    /// Candidates are visited in order of floor distance; the first one whose
    /// full 3-D distance is within `radius` wins.
    pub fn snap(&self, p: Point, radius: f32, mask: AreaMask) -> Option<Point> {
        if mask.is_empty() || radius < 0.0 {
            return None;
        }
        let r2 = radius * radius;
        self.index
            .nearest_neighbor_iter_with_distance_2(&[p.x, p.z])
            .take_while(|(_, d2)| *d2 <= r2)
            .filter(|(area, _)| mask.contains(area.area))
            .map(|(area, _)| area.closest_point(p))
            .find(|hit| hit.distance(p) <= radius)
    }
}

// ── NavSurfaceBuilder ─────────────────────────────────────────────────────────

/// Collect walkable rectangles, then [`build`](Self::build) the indexed
/// surface.
#[derive(Debug, Default)]
pub struct NavSurfaceBuilder {
    areas: Vec<NavArea>,
}

impl NavSurfaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rectangle spanning `(min_x, min_z)`–`(max_x, max_z)` at height
    /// `height`, tagged with navigation area `area`.
    pub fn add_rect(mut self, min: [f32; 2], max: [f32; 2], height: f32, area: u8) -> Self {
        self.areas.push(NavArea { min, max, height, area });
        self
    }

    /// Convenience: a ground-area rectangle at height 0.
    pub fn add_floor(self, min: [f32; 2], max: [f32; 2]) -> Self {
        self.add_rect(min, max, 0.0, AreaMask::GROUND_AREA)
    }

    /// Validate and bulk-load the R-tree.
    ///
    /// # Errors
    ///
    /// - [`NavError::Empty`] if no rectangle was added.
    /// - [`NavError::InvalidBounds`] for inverted or non-finite corners.
    /// - [`NavError::AreaOutOfRange`] for an area index above 31.
    pub fn build(self) -> NavResult<NavSurface> {
        if self.areas.is_empty() {
            return Err(NavError::Empty);
        }
        let mut mask = AreaMask::NONE;
        for (index, a) in self.areas.iter().enumerate() {
            let finite = a.min.iter().chain(a.max.iter()).all(|v| v.is_finite()) && a.height.is_finite();
            if !finite || a.min[0] > a.max[0] || a.min[1] > a.max[1] {
                return Err(NavError::InvalidBounds {
                    index,
                    min_x: a.min[0],
                    min_z: a.min[1],
                    max_x: a.max[0],
                    max_z: a.max[1],
                });
            }
            if a.area > 31 {
                return Err(NavError::AreaOutOfRange(a.area));
            }
            mask = mask.union(AreaMask::of(a.area));
        }
        tracing::debug!(areas = self.areas.len(), mask = mask.0, "navigation surface built");
        Ok(NavSurface {
            index: RTree::bulk_load(self.areas),
            areas: mask,
        })
    }
}
