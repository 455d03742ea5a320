//! Room scan sources — where [`RoomRegistry::merge`][crate::RoomRegistry::merge]
//! gets its input.
//!
//! The simulator asks its source for a scan on the first tick and then every
//! `rescan_interval_ticks`.  A source returns `None` when it has nothing new;
//! a `Some` result is merged as-is.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use vs_core::Tick;

use crate::RoomDescriptor;

/// Produces lists of currently detected rooms.
///
/// Implementations must be `Send` so the simulator owning them can move
/// between threads.
pub trait RoomScanSource: Send {
    /// Return the rooms detected as of `now`, or `None` if there is no new scan.
    fn scan(&mut self, now: Tick) -> Option<Vec<RoomDescriptor>>;
}

// ── StaticScan ────────────────────────────────────────────────────────────────

/// A fixed layout: every scan reports the same rooms.
#[derive(Debug, Clone, Default)]
pub struct StaticScan {
    rooms: Vec<RoomDescriptor>,
}

impl StaticScan {
    pub fn new(rooms: Vec<RoomDescriptor>) -> Self {
        Self { rooms }
    }
}

impl RoomScanSource for StaticScan {
    fn scan(&mut self, _now: Tick) -> Option<Vec<RoomDescriptor>> {
        Some(self.rooms.clone())
    }
}

// ── ScriptedScan ──────────────────────────────────────────────────────────────

/// A layout that changes at pre-set ticks (rooms built or demolished).
///
/// Each entry becomes visible once `now` reaches its tick.  If several are due
/// at once, only the latest is returned.
#[derive(Debug, Clone, Default)]
pub struct ScriptedScan {
    pending: VecDeque<(Tick, Vec<RoomDescriptor>)>,
}

impl ScriptedScan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scan result that appears at `at`.  Entries are kept sorted.
    pub fn at(mut self, at: Tick, rooms: Vec<RoomDescriptor>) -> Self {
        let pos = self.pending.partition_point(|(t, _)| *t <= at);
        self.pending.insert(pos, (at, rooms));
        self
    }
}

impl RoomScanSource for ScriptedScan {
    fn scan(&mut self, now: Tick) -> Option<Vec<RoomDescriptor>> {
        let mut latest = None;
        while self.pending.front().is_some_and(|(t, _)| *t <= now) {
            latest = self.pending.pop_front().map(|(_, rooms)| rooms);
        }
        latest
    }
}

// ── ChannelScan ───────────────────────────────────────────────────────────────

/// Sending half of a [`ChannelScan`]; hand it to whatever detects rooms
/// (possibly on another thread).
#[derive(Debug, Clone)]
pub struct ScanPublisher {
    tx: Sender<Vec<RoomDescriptor>>,
}

impl ScanPublisher {
    /// Publish a scan.  Returns `false` if the simulator side has gone away.
    pub fn publish(&self, rooms: Vec<RoomDescriptor>) -> bool {
        self.tx.send(rooms).is_ok()
    }
}

/// Scan source fed through a channel.  Scans published between two polls are
/// coalesced; only the most recent one is merged.
#[derive(Debug)]
pub struct ChannelScan {
    rx: Receiver<Vec<RoomDescriptor>>,
}

impl ChannelScan {
    pub fn new() -> (ScanPublisher, ChannelScan) {
        let (tx, rx) = mpsc::channel();
        (ScanPublisher { tx }, ChannelScan { rx })
    }
}

impl RoomScanSource for ChannelScan {
    fn scan(&mut self, _now: Tick) -> Option<Vec<RoomDescriptor>> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(rooms) => latest = Some(rooms),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return latest,
            }
        }
    }
}
