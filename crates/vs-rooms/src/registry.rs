//! `RoomRegistry` — the single piece of mutable state shared by all agents.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::Rng;
use tracing::{debug, info, warn};
use vs_core::{AgentId, RoomId};

use crate::{Room, RoomDescriptor, RoomView};

// ── MergeReport ───────────────────────────────────────────────────────────────

/// What a [`RoomRegistry::merge`] call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Rooms present before and after; their holder was carried over.
    pub kept:       usize,
    /// Rooms new to this scan, added unoccupied.
    pub added:      usize,
    /// Rooms that had been dropped while held and came back to their holder.
    pub restored:   usize,
    /// Rooms absent from this scan and therefore removed.
    pub dropped:    usize,
    /// Descriptors skipped because an earlier descriptor had the same id.
    pub duplicates: usize,
    /// Room count after the merge.
    pub total:      usize,
}

impl MergeReport {
    /// `true` if the merge was skipped (empty scan).
    pub fn is_noop(&self) -> bool {
        *self == MergeReport::default()
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// Everything behind the registry lock.
#[derive(Debug, Default)]
struct Catalog {
    /// Live rooms in scan order.
    rooms:    Vec<Room>,
    /// Holders of rooms a rescan dropped.  The claim survives until the
    /// holder releases it, so a room that reappears goes back to its holder
    /// instead of being handed out twice.
    detached: HashMap<RoomId, AgentId>,
}

impl Catalog {
    fn find(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }
}

// ── RoomRegistry ──────────────────────────────────────────────────────────────

/// Shared catalog of rooms and who holds them.
///
/// Share with `Arc<RoomRegistry>`.  Every method takes `&self` and performs
/// its whole read-modify-write inside one lock acquisition, so there is no
/// window in which two callers can both observe a room as free and both claim
/// it.
///
/// A room is held by at most one agent, and only that agent can release it.
/// Holds outlive rescans: see [`merge`](Self::merge).
///
/// Room order is scan order and is the only ordering the registry keeps;
/// reservation indexes into it.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    catalog: Mutex<Catalog>,
}

impl RoomRegistry {
    /// An empty registry.  Populated by the first [`merge`](Self::merge).
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated from one scan.
    pub fn with_rooms(scan: &[RoomDescriptor]) -> Self {
        let registry = Self::new();
        registry.merge(scan);
        registry
    }

    /// No method panics while holding the guard, so a poisoned lock still
    /// guards a consistent catalog and is safe to keep using.
    fn lock(&self) -> MutexGuard<'_, Catalog> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Merge ─────────────────────────────────────────────────────────────

    /// Replace the room list with the result of a re-scan.
    ///
    /// - Descriptors are deduplicated by id; the first occurrence wins.
    /// - Rooms whose id already exists keep their holder.
    /// - Rooms missing from `scan` are dropped.  A dropped room that was held
    ///   stays claimed by its holder until released; if it reappears first,
    ///   it comes back held.
    /// - Other new rooms start unoccupied.
    ///
    /// An empty scan is ignored entirely (a scanner that momentarily sees
    /// nothing must not wipe the registry).
    pub fn merge(&self, scan: &[RoomDescriptor]) -> MergeReport {
        if scan.is_empty() {
            return MergeReport::default();
        }

        let mut catalog = self.lock();
        let mut report = MergeReport::default();
        let mut seen: HashSet<RoomId> = HashSet::with_capacity(scan.len());
        let mut merged: Vec<Room> = Vec::with_capacity(scan.len());

        for desc in scan {
            let mut room = Room::from_descriptor(desc);
            if !seen.insert(room.id) {
                report.duplicates += 1;
                continue;
            }
            let existing = catalog.find(room.id).map(|r| r.holder);
            if let Some(holder) = existing {
                room.holder = holder;
                report.kept += 1;
                debug!(room = %room.id, holder = ?room.holder, "room kept");
            } else if let Some(holder) = catalog.detached.remove(&room.id) {
                room.holder = Some(holder);
                report.restored += 1;
                info!(room = %room.id, agent = %holder, "dropped room reappeared, still held");
            } else {
                report.added += 1;
                debug!(room = %room.id, "room added");
            }
            merged.push(room);
        }

        let Catalog { rooms, detached } = &mut *catalog;
        for old in rooms.iter().filter(|r| !seen.contains(&r.id)) {
            report.dropped += 1;
            if let Some(holder) = old.holder {
                warn!(room = %old.id, agent = %holder, "occupied room dropped by rescan");
                detached.insert(old.id, holder);
            }
        }

        report.total = merged.len();
        *rooms = merged;

        info!(
            kept = report.kept,
            added = report.added,
            restored = report.restored,
            dropped = report.dropped,
            total = report.total,
            "room list merged"
        );
        report
    }

    // ── Reservation ───────────────────────────────────────────────────────

    /// Claim a uniformly random unoccupied room on behalf of `holder`.
    ///
    /// Returns `None` when every room is taken (or the registry is empty).
    ///
    /// The chosen room is checked again before it is marked.  Selection and
    /// mutation share one critical section, so the check cannot fail today;
    /// it is kept only so that a room already taken is skipped rather than
    /// double-booked should the locking ever be narrowed.
    pub fn try_reserve_random<R: Rng + ?Sized>(&self, holder: AgentId, rng: &mut R) -> Option<RoomId> {
        let mut catalog = self.lock();
        let rooms = &mut catalog.rooms;

        let mut free: Vec<usize> = rooms
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_occupied())
            .map(|(i, _)| i)
            .collect();

        while !free.is_empty() {
            let pick = rng.gen_range(0..free.len());
            let idx = free[pick];
            if rooms[idx].is_occupied() {
                debug!(room = %rooms[idx].id, "room taken between pick and claim, retrying");
                free.swap_remove(pick);
                continue;
            }
            rooms[idx].holder = Some(holder);
            debug!(room = %rooms[idx].id, agent = %holder, "room reserved");
            return Some(rooms[idx].id);
        }

        debug!(rooms = rooms.len(), "no room available");
        None
    }

    /// Give up `holder`'s claim on `id`.
    ///
    /// Unknown ids, rooms that are already free, and rooms held by another
    /// agent are silently ignored.  A claim on a room dropped by a rescan is
    /// cleared, so the room comes back free if it reappears.  Returns `true`
    /// only if this call freed a live room.
    pub fn release(&self, id: RoomId, holder: AgentId) -> bool {
        let mut catalog = self.lock();
        if catalog.detached.get(&id) == Some(&holder) {
            catalog.detached.remove(&id);
            debug!(room = %id, agent = %holder, "claim on dropped room cleared");
            return false;
        }
        match catalog.rooms.iter_mut().find(|r| r.id == id) {
            Some(room) if room.holder == Some(holder) => {
                room.holder = None;
                debug!(room = %id, agent = %holder, "room released");
                true
            }
            Some(room) => {
                if let Some(other) = room.holder {
                    debug!(room = %id, agent = %holder, holder = %other, "release by non-holder ignored");
                }
                false
            }
            None => {
                debug!(room = %id, "release of unknown room ignored");
                false
            }
        }
    }

    // ── Read-only queries ─────────────────────────────────────────────────

    /// Geometry of `id`, or `None` if the room no longer exists.
    pub fn lookup(&self, id: RoomId) -> Option<RoomView> {
        self.lock().find(id).map(Room::view)
    }

    /// Geometry of `id`, but only while `agent` holds it.
    pub fn lookup_held(&self, id: RoomId, agent: AgentId) -> Option<RoomView> {
        self.lock()
            .find(id)
            .filter(|r| r.holder == Some(agent))
            .map(Room::view)
    }

    /// Occupancy of `id`, or `None` if the room no longer exists.
    pub fn is_occupied(&self, id: RoomId) -> Option<bool> {
        self.lock().find(id).map(Room::is_occupied)
    }

    /// Holder of live room `id`; `None` if it is free or does not exist.
    pub fn holder(&self, id: RoomId) -> Option<AgentId> {
        self.lock().find(id).and_then(|r| r.holder)
    }

    /// `true` if live room `id` exists and `agent` holds it.
    pub fn is_held_by(&self, id: RoomId, agent: AgentId) -> bool {
        self.holder(id) == Some(agent)
    }

    pub fn len(&self) -> usize {
        self.lock().rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().rooms.is_empty()
    }

    /// Held rooms currently in the room list.
    pub fn occupied_count(&self) -> usize {
        self.lock().rooms.iter().filter(|r| r.is_occupied()).count()
    }

    /// Claims on rooms a rescan dropped, not yet released.
    pub fn detached_count(&self) -> usize {
        self.lock().detached.len()
    }

    /// Point-in-time copy of every live room, in registry order.
    pub fn snapshot(&self) -> Vec<Room> {
        self.lock().rooms.clone()
    }
}
