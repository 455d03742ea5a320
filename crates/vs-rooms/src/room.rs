//! Room records and the descriptors scanners produce.

use tracing::warn;
use vs_core::{AgentId, Point, RoomId};

/// Radius used for rooms whose descriptor has no bounding extent.
pub const DEFAULT_ROOM_SIZE: f32 = 2.0;

/// Fraction of the bounding-box diagonal used as the usable room radius.
const EXTENT_TO_RADIUS: f32 = 0.3;

/// One detected room, as reported by a [`RoomScanSource`][crate::RoomScanSource].
///
/// Descriptors carry no identity of their own: the registry derives a
/// [`RoomId`] from `anchor`, so a re-scan that produces fresh descriptors for
/// the same physical rooms maps onto the same registry entries.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomDescriptor {
    /// Reference point agents walk to when assigned the room.
    pub anchor: Point,
    /// Size of the room's bounding box, if the scanner could measure one.
    pub extent: Option<Point>,
}

impl RoomDescriptor {
    pub fn new(anchor: Point, extent: Option<Point>) -> Self {
        Self { anchor, extent }
    }

    /// Descriptor for a room with a square floor of side `side` metres.
    pub fn square(anchor: Point, side: f32) -> Self {
        Self { anchor, extent: Some(Point::new(side, 0.0, side)) }
    }

    #[inline]
    pub fn id(&self) -> RoomId {
        RoomId::from_anchor(self.anchor)
    }
}

/// A registry entry.
///
/// `holder` is only ever written while the registry lock is held; copies
/// handed out by [`RoomRegistry::snapshot`][crate::RoomRegistry::snapshot]
/// are point-in-time views.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub id:       RoomId,
    pub anchor:   Point,
    /// Effective radius bounding in-room position sampling.
    pub size:     f32,
    /// The agent holding the room, if any.
    pub holder:   Option<AgentId>,
}

impl Room {
    /// Build an unoccupied room from a scan descriptor.
    pub fn from_descriptor(desc: &RoomDescriptor) -> Self {
        let id = desc.id();
        let size = match desc.extent {
            Some(extent) => extent.length() * EXTENT_TO_RADIUS,
            None => {
                warn!(room = %id, size = DEFAULT_ROOM_SIZE, "room has no extent, using default size");
                DEFAULT_ROOM_SIZE
            }
        };
        Self { id, anchor: desc.anchor, size, holder: None }
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.holder.is_some()
    }

    #[inline]
    pub fn view(&self) -> RoomView {
        RoomView { id: self.id, anchor: self.anchor, size: self.size }
    }
}

/// Read-only geometry of a room, returned by
/// [`RoomRegistry::lookup`][crate::RoomRegistry::lookup].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomView {
    pub id:     RoomId,
    pub anchor: Point,
    pub size:   f32,
}
