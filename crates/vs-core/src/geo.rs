//! Venue-space coordinates and navigation area masks.
//!
//! The venue is a y-up space measured in metres: `x`/`z` span the floor plan
//! and `y` is height.  `f32` is plenty for a building-sized world.

use std::ops::{Add, Sub};

/// A point in venue space (metres, y-up).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// A point on the floor plane (`y = 0`).
    #[inline]
    pub const fn on_floor(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    /// Straight-line distance in metres.
    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        (self - other).length()
    }

    /// Distance projected onto the floor plane (ignores `y`).
    #[inline]
    pub fn floor_distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    #[inline]
    pub fn scale(self, k: f32) -> Point {
        Point::new(self.x * k, self.y * k, self.z * k)
    }

    /// Same point with its height replaced.
    #[inline]
    pub fn with_y(self, y: f32) -> Point {
        Point { y, ..self }
    }

    /// Move from `self` toward `target` by at most `max_step` metres.
    ///
    /// Returns `target` exactly once it is within reach so callers can test
    /// arrival with `==` as well as with a distance threshold.
    pub fn step_toward(self, target: Point, max_step: f32) -> Point {
        let delta = target - self;
        let dist = delta.length();
        if dist <= max_step || dist == 0.0 {
            return target;
        }
        self + delta.scale(max_step / dist)
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ── AreaMask ──────────────────────────────────────────────────────────────────

/// Bitmask over navigation area indices (up to 32 areas).
///
/// Walkable regions are tagged with one area index; snapping queries accept a
/// mask and only consider regions whose bit is set.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaMask(pub u32);

impl AreaMask {
    /// Index of the general-purpose "Ground" area.
    pub const GROUND_AREA: u8 = 0;

    pub const NONE: AreaMask = AreaMask(0);
    pub const ALL: AreaMask = AreaMask(u32::MAX);
    pub const GROUND: AreaMask = AreaMask(1 << Self::GROUND_AREA);

    /// Mask containing only `area`.
    #[inline]
    pub const fn of(area: u8) -> AreaMask {
        AreaMask(1 << (area as u32 & 31))
    }

    #[inline]
    pub const fn contains(self, area: u8) -> bool {
        self.0 & (1 << (area as u32 & 31)) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: AreaMask) -> AreaMask {
        AreaMask(self.0 | other.0)
    }
}

impl Default for AreaMask {
    fn default() -> Self {
        Self::ALL
    }
}
