//! Unit tests for vs-rooms.

use vs_core::{AgentId, AgentRng, Point, RoomId, Tick};

use crate::{RoomDescriptor, RoomRegistry};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn desc(x: f32, z: f32) -> RoomDescriptor {
    RoomDescriptor::square(Point::on_floor(x, z), 4.0)
}

fn rng(seed: u64) -> AgentRng {
    AgentRng::new(seed, AgentId(0))
}

const HOLDER: AgentId = AgentId(0);

// ── Room construction ─────────────────────────────────────────────────────────

#[cfg(test)]
mod room_tests {
    use super::*;
    use crate::{DEFAULT_ROOM_SIZE, Room};

    #[test]
    fn size_from_extent() {
        let room = Room::from_descriptor(&RoomDescriptor::new(
            Point::on_floor(0.0, 0.0),
            Some(Point::new(3.0, 0.0, 4.0)),
        ));
        assert!((room.size - 1.5).abs() < 1e-5);
        assert!(!room.is_occupied());
    }

    #[test]
    fn missing_extent_uses_default() {
        let room = Room::from_descriptor(&RoomDescriptor::new(Point::on_floor(0.0, 0.0), None));
        assert_eq!(room.size, DEFAULT_ROOM_SIZE);
    }

    #[test]
    fn id_derives_from_anchor() {
        assert_eq!(desc(10.2, -3.7).id(), RoomId::new(10, -4));
    }
}

// ── Merge ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod merge_tests {
    use super::*;

    #[test]
    fn first_merge_populates() {
        let reg = RoomRegistry::new();
        assert!(reg.is_empty());
        let report = reg.merge(&[desc(0.0, 0.0), desc(10.0, 0.0)]);
        assert_eq!(report.added, 2);
        assert_eq!(report.total, 2);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.occupied_count(), 0);
    }

    #[test]
    fn empty_scan_is_noop() {
        let reg = RoomRegistry::with_rooms(&[desc(0.0, 0.0)]);
        let report = reg.merge(&[]);
        assert!(report.is_noop());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn merge_preserves_occupancy() {
        let a = desc(0.0, 0.0);
        let b = desc(10.0, 0.0);
        let reg = RoomRegistry::with_rooms(&[a]);
        assert_eq!(reg.try_reserve_random(HOLDER, rng(1).inner()), Some(a.id()));

        let report = reg.merge(&[a, b]);
        assert_eq!((report.kept, report.added, report.dropped), (1, 1, 0));
        assert_eq!(reg.is_occupied(a.id()), Some(true));
        assert_eq!(reg.is_occupied(b.id()), Some(false));
    }

    #[test]
    fn merge_drops_missing_rooms() {
        let a = desc(0.0, 0.0);
        let b = desc(10.0, 0.0);
        let reg = RoomRegistry::with_rooms(&[a]);
        reg.try_reserve_random(HOLDER, rng(1).inner());

        let report = reg.merge(&[b]);
        assert_eq!((report.kept, report.added, report.dropped), (0, 1, 1));
        assert_eq!(reg.is_occupied(a.id()), None);
        assert_eq!(reg.is_occupied(b.id()), Some(false));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn duplicate_ids_first_wins() {
        let first = RoomDescriptor::square(Point::on_floor(5.1, 5.0), 2.0);
        let second = RoomDescriptor::square(Point::on_floor(4.9, 5.2), 8.0);
        assert_eq!(first.id(), second.id());

        let reg = RoomRegistry::new();
        let report = reg.merge(&[first, second]);
        assert_eq!(report.duplicates, 1);
        assert_eq!(reg.len(), 1);
        let view = reg.lookup(first.id()).unwrap();
        assert_eq!(view.anchor, first.anchor);
    }

    #[test]
    fn replaced_descriptor_keeps_identity() {
        let reg = RoomRegistry::with_rooms(&[desc(3.0, 3.0)]);
        reg.try_reserve_random(HOLDER, rng(1).inner());
        // Same room re-detected with a slightly different anchor and size.
        let moved = RoomDescriptor::square(Point::new(3.2, 0.5, 2.9), 6.0);
        reg.merge(&[moved]);
        assert_eq!(reg.is_occupied(moved.id()), Some(true));
        assert_eq!(reg.lookup(moved.id()).unwrap().anchor, moved.anchor);
    }

    #[test]
    fn merge_carries_holder() {
        let a = desc(0.0, 0.0);
        let reg = RoomRegistry::with_rooms(&[a]);
        reg.try_reserve_random(AgentId(4), rng(1).inner());
        reg.merge(&[a, desc(10.0, 0.0)]);
        assert_eq!(reg.holder(a.id()), Some(AgentId(4)));
        assert!(reg.is_held_by(a.id(), AgentId(4)));
        assert!(!reg.is_held_by(a.id(), AgentId(5)));
    }

    #[test]
    fn dropped_room_returns_to_its_holder() {
        let a = desc(0.0, 0.0);
        let b = desc(10.0, 0.0);
        let reg = RoomRegistry::with_rooms(&[a]);
        reg.try_reserve_random(AgentId(1), rng(1).inner());

        let report = reg.merge(&[b]);
        assert_eq!(report.dropped, 1);
        assert_eq!(reg.detached_count(), 1);
        assert_eq!(reg.holder(a.id()), None);

        let report = reg.merge(&[a, b]);
        assert_eq!((report.kept, report.added, report.restored), (1, 0, 1));
        assert_eq!(reg.holder(a.id()), Some(AgentId(1)));
        assert_eq!(reg.detached_count(), 0);

        // Nobody else can take it while the claim stands.
        assert_eq!(reg.try_reserve_random(AgentId(2), rng(2).inner()), Some(b.id()));
        assert_eq!(reg.try_reserve_random(AgentId(3), rng(3).inner()), None);
        assert!(!reg.release(a.id(), AgentId(2)));
        assert!(reg.release(a.id(), AgentId(1)));
        assert_eq!(reg.try_reserve_random(AgentId(3), rng(3).inner()), Some(a.id()));
    }

    #[test]
    fn released_claim_on_dropped_room_comes_back_free() {
        let a = desc(0.0, 0.0);
        let b = desc(10.0, 0.0);
        let reg = RoomRegistry::with_rooms(&[a]);
        reg.try_reserve_random(AgentId(1), rng(1).inner());
        reg.merge(&[b]);

        assert!(!reg.release(a.id(), AgentId(1)), "no live room was freed");
        assert_eq!(reg.detached_count(), 0);
        let report = reg.merge(&[a, b]);
        assert_eq!((report.added, report.restored), (1, 0));
        assert_eq!(reg.holder(a.id()), None);
    }

    #[test]
    fn only_the_holder_clears_a_detached_claim() {
        let a = desc(0.0, 0.0);
        let reg = RoomRegistry::with_rooms(&[a]);
        reg.try_reserve_random(AgentId(1), rng(1).inner());
        reg.merge(&[desc(10.0, 0.0)]);
        reg.release(a.id(), AgentId(2));
        assert_eq!(reg.detached_count(), 1);
    }

    #[test]
    fn order_follows_scan() {
        let reg = RoomRegistry::new();
        reg.merge(&[desc(20.0, 0.0), desc(0.0, 0.0), desc(10.0, 0.0)]);
        let ids: Vec<RoomId> = reg.snapshot().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RoomId::new(20, 0), RoomId::new(0, 0), RoomId::new(10, 0)]);
    }
}

// ── Reservation / release ─────────────────────────────────────────────────────

#[cfg(test)]
mod reservation_tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn empty_registry_has_nothing() {
        let reg = RoomRegistry::new();
        assert_eq!(reg.try_reserve_random(HOLDER, rng(1).inner()), None);
    }

    #[test]
    fn exhaustion_returns_none() {
        let reg = RoomRegistry::with_rooms(&[desc(0.0, 0.0), desc(10.0, 0.0), desc(20.0, 0.0)]);
        let mut r = rng(9);
        let held: HashSet<RoomId> =
            (0..3).map(|_| reg.try_reserve_random(HOLDER, r.inner()).unwrap()).collect();
        assert_eq!(held.len(), 3);
        assert_eq!(reg.try_reserve_random(HOLDER, r.inner()), None);
    }

    #[test]
    fn release_frees_and_is_idempotent() {
        let reg = RoomRegistry::with_rooms(&[desc(0.0, 0.0)]);
        let id = reg.try_reserve_random(HOLDER, rng(1).inner()).unwrap();
        assert!(reg.release(id, HOLDER));
        assert_eq!(reg.is_occupied(id), Some(false));
        assert!(!reg.release(id, HOLDER));
        assert_eq!(reg.is_occupied(id), Some(false));
    }

    #[test]
    fn release_unknown_room_is_ignored() {
        let reg = RoomRegistry::with_rooms(&[desc(0.0, 0.0)]);
        assert!(!reg.release(RoomId::new(99, 99), HOLDER));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn release_by_other_agent_is_ignored() {
        let reg = RoomRegistry::with_rooms(&[desc(0.0, 0.0)]);
        let id = reg.try_reserve_random(AgentId(1), rng(1).inner()).unwrap();
        assert!(!reg.release(id, AgentId(2)));
        assert_eq!(reg.holder(id), Some(AgentId(1)));
        assert!(reg.release(id, AgentId(1)));
        assert_eq!(reg.holder(id), None);
    }

    #[test]
    fn released_room_can_be_reserved_again() {
        let reg = RoomRegistry::with_rooms(&[desc(0.0, 0.0)]);
        let mut r = rng(3);
        let id = reg.try_reserve_random(HOLDER, r.inner()).unwrap();
        assert_eq!(reg.try_reserve_random(HOLDER, r.inner()), None);
        reg.release(id, HOLDER);
        assert_eq!(reg.try_reserve_random(HOLDER, r.inner()), Some(id));
    }

    #[test]
    fn pick_is_uniform_over_free_rooms() {
        let rooms: Vec<RoomDescriptor> = (0..4).map(|i| desc(i as f32 * 10.0, 0.0)).collect();
        let mut counts = [0usize; 4];
        let mut r = rng(11);
        for _ in 0..4_000 {
            let reg = RoomRegistry::with_rooms(&rooms);
            let id = reg.try_reserve_random(HOLDER, r.inner()).unwrap();
            counts[(id.x / 10) as usize] += 1;
        }
        for c in counts {
            assert!((800..1200).contains(&c), "skewed distribution: {counts:?}");
        }
    }

    #[test]
    fn seeded_pick_is_reproducible() {
        let rooms: Vec<RoomDescriptor> = (0..8).map(|i| desc(i as f32 * 10.0, 0.0)).collect();
        let a = RoomRegistry::with_rooms(&rooms).try_reserve_random(HOLDER, rng(5).inner());
        let b = RoomRegistry::with_rooms(&rooms).try_reserve_random(HOLDER, rng(5).inner());
        assert_eq!(a, b);
    }

    #[test]
    fn concurrent_reservations_never_double_book() {
        const ROOMS: usize = 8;
        const THREADS: u32 = 32;
        let rooms: Vec<RoomDescriptor> = (0..ROOMS).map(|i| desc(i as f32 * 10.0, 0.0)).collect();
        let reg = Arc::new(RoomRegistry::with_rooms(&rooms));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let reg = Arc::clone(&reg);
                thread::spawn(move || {
                    let mut r = AgentRng::new(77, AgentId(t));
                    reg.try_reserve_random(AgentId(t), r.inner())
                })
            })
            .collect();

        let won: Vec<RoomId> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();
        let distinct: HashSet<RoomId> = won.iter().copied().collect();
        assert_eq!(won.len(), ROOMS);
        assert_eq!(distinct.len(), ROOMS);
        assert_eq!(reg.occupied_count(), ROOMS);
    }

    #[test]
    fn concurrent_churn_keeps_exclusion() {
        let rooms: Vec<RoomDescriptor> = (0..3).map(|i| desc(i as f32 * 10.0, 0.0)).collect();
        let reg = Arc::new(RoomRegistry::with_rooms(&rooms));
        let holders = Arc::new(std::sync::Mutex::new(HashSet::<RoomId>::new()));

        let handles: Vec<_> = (0..8u32)
            .map(|t| {
                let reg = Arc::clone(&reg);
                let holders = Arc::clone(&holders);
                thread::spawn(move || {
                    let mut r = AgentRng::new(1, AgentId(t));
                    for _ in 0..500 {
                        if let Some(id) = reg.try_reserve_random(AgentId(t), r.inner()) {
                            assert!(holders.lock().unwrap().insert(id), "{id} double-booked");
                            holders.lock().unwrap().remove(&id);
                            assert!(reg.release(id, AgentId(t)));
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(reg.occupied_count(), 0);
    }
}

// ── Scan sources ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod scan_tests {
    use super::*;
    use crate::{ChannelScan, RoomScanSource, ScriptedScan, StaticScan};

    #[test]
    fn static_scan_repeats() {
        let mut src = StaticScan::new(vec![desc(0.0, 0.0)]);
        assert_eq!(src.scan(Tick(0)).unwrap().len(), 1);
        assert_eq!(src.scan(Tick(50)).unwrap().len(), 1);
    }

    #[test]
    fn scripted_scan_releases_in_order() {
        let mut src = ScriptedScan::new()
            .at(Tick(10), vec![desc(1.0, 0.0), desc(2.0, 0.0)])
            .at(Tick(0), vec![desc(0.0, 0.0)]);
        assert_eq!(src.scan(Tick(0)).unwrap().len(), 1);
        assert!(src.scan(Tick(5)).is_none());
        assert_eq!(src.scan(Tick(10)).unwrap().len(), 2);
        assert!(src.scan(Tick(11)).is_none());
    }

    #[test]
    fn scripted_scan_coalesces_overdue_entries() {
        let mut src = ScriptedScan::new()
            .at(Tick(1), vec![desc(0.0, 0.0)])
            .at(Tick(2), vec![desc(0.0, 0.0), desc(5.0, 0.0), desc(9.0, 0.0)]);
        assert_eq!(src.scan(Tick(100)).unwrap().len(), 3);
    }

    #[test]
    fn channel_scan_keeps_latest() {
        let (publisher, mut src) = ChannelScan::new();
        assert!(src.scan(Tick(0)).is_none());
        assert!(publisher.publish(vec![desc(0.0, 0.0)]));
        assert!(publisher.publish(vec![desc(0.0, 0.0), desc(5.0, 0.0)]));
        assert_eq!(src.scan(Tick(1)).unwrap().len(), 2);
        assert!(src.scan(Tick(2)).is_none());
    }

    #[test]
    fn channel_scan_from_other_thread() {
        let (publisher, mut src) = ChannelScan::new();
        std::thread::spawn(move || {
            publisher.publish(vec![desc(0.0, 0.0)]);
        })
        .join()
        .unwrap();
        let reg = RoomRegistry::new();
        reg.merge(&src.scan(Tick(0)).unwrap());
        assert_eq!(reg.len(), 1);
    }
}
