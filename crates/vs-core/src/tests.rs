//! Unit tests for vs-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, Point, RoomId};

    #[test]
    fn agent_index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn agent_default_is_invalid() {
        assert_eq!(AgentId::default(), AgentId::INVALID);
        assert_eq!(AgentId::INVALID.0, u32::MAX);
    }

    #[test]
    fn room_id_from_anchor_rounds_floor_coords() {
        let id = RoomId::from_anchor(Point::new(3.4, 7.9, -2.6));
        assert_eq!(id, RoomId::new(3, -3));
    }

    #[test]
    fn room_id_ignores_height() {
        let a = RoomId::from_anchor(Point::new(5.0, 0.0, 5.0));
        let b = RoomId::from_anchor(Point::new(5.1, 3.0, 4.9));
        assert_eq!(a, b);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(RoomId::new(12, -4).to_string(), "Room_12_-4");
    }
}

#[cfg(test)]
mod geo {
    use crate::{AreaMask, Point};

    #[test]
    fn distances() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(3.0, 12.0, 4.0);
        assert!((a.floor_distance(b) - 5.0).abs() < 1e-5);
        assert!((a.distance(b) - 13.0).abs() < 1e-5);
    }

    #[test]
    fn step_toward_stops_on_target() {
        let a = Point::on_floor(0.0, 0.0);
        let b = Point::on_floor(10.0, 0.0);
        let mid = a.step_toward(b, 4.0);
        assert!((mid.x - 4.0).abs() < 1e-5);
        assert_eq!(mid.step_toward(b, 100.0), b);
    }

    #[test]
    fn area_masks() {
        assert!(AreaMask::ALL.contains(5));
        assert!(AreaMask::GROUND.contains(AreaMask::GROUND_AREA));
        assert!(!AreaMask::GROUND.contains(1));
        assert!(AreaMask::NONE.is_empty());
        let m = AreaMask::of(1).union(AreaMask::of(3));
        assert!(m.contains(1) && m.contains(3) && !m.contains(2));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(3).since(Tick(10)), 0);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = SimClock::new(0, 100);
        assert_eq!(clock.ticks_for_secs(0.1), 1);
        assert_eq!(clock.ticks_for_secs(1.0), 10);
        assert_eq!(clock.ticks_for_secs(0.01), 1);
        assert_eq!(clock.ticks_for_secs(2.55), 26);
        assert_eq!(clock.ticks_for_secs(0.0), 0);
    }

    #[test]
    fn clock_elapsed() {
        let mut clock = SimClock::new(1_000, 250);
        for _ in 0..8 {
            clock.advance();
        }
        assert_eq!(clock.elapsed_ms(), 2_000);
        assert_eq!(clock.current_unix_secs(), 1_002);
        assert!((clock.tick_secs() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn sim_config_defaults() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.tick_duration_ms, 100);
        assert_eq!(cfg.end_tick(), Tick(cfg.total_ticks));
        assert_eq!(cfg.make_clock().current_tick, Tick::ZERO);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn sim_config_validation() {
        let zero_tick = SimConfig { tick_duration_ms: 0, ..SimConfig::default() };
        assert!(matches!(zero_tick.validate(), Err(crate::VsError::Config(_))));
        let zero_threads = SimConfig { num_threads: Some(0), ..SimConfig::default() };
        assert!(zero_threads.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng};

    #[test]
    fn agent_rng_is_deterministic() {
        let mut a = AgentRng::new(42, AgentId(3));
        let mut b = AgentRng::new(42, AgentId(3));
        let xs: Vec<u32> = (0..16).map(|_| a.gen_range(0..1000)).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.gen_range(0..1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn agents_get_distinct_streams() {
        let mut a = AgentRng::new(42, AgentId(0));
        let mut b = AgentRng::new(42, AgentId(1));
        let xs: Vec<u32> = (0..16).map(|_| a.gen_range(0..u32::MAX)).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.gen_range(0..u32::MAX)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn secs_between_stays_in_range() {
        let mut rng = AgentRng::new(7, AgentId(0));
        for _ in 0..200 {
            let s = rng.secs_between((15.0, 30.0));
            assert!((15.0..=30.0).contains(&s));
        }
        assert_eq!(rng.secs_between((5.0, 5.0)), 5.0);
    }

    #[test]
    fn unit_shapes() {
        let mut rng = AgentRng::new(7, AgentId(1));
        for _ in 0..200 {
            let (x, z) = rng.in_unit_circle();
            assert!(x * x + z * z <= 1.0);
            let (x, y, z) = rng.in_unit_sphere();
            assert!(x * x + y * y + z * z <= 1.0);
        }
    }
}

