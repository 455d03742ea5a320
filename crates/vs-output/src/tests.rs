//! Integration tests for vs-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;
    use vs_agent::AgentState;
    use vs_core::RoomId;

    use crate::csv::CsvWriter;
    use crate::row::{AgentSnapshotRow, TickSummaryRow, TransitionRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(path: std::path::PathBuf) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created_in_new_dir() {
        let dir = tmp();
        let out = dir.path().join("nested").join("run");
        let _w = CsvWriter::new(&out).unwrap();
        assert!(out.join("agent_transitions.csv").exists());
        assert!(out.join("agent_snapshots.csv").exists());
        assert!(out.join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(
            headers(dir.path().join("agent_transitions.csv")),
            ["tick", "agent_id", "from", "to", "room"]
        );
        assert_eq!(
            headers(dir.path().join("agent_snapshots.csv")),
            ["agent_id", "tick", "state", "status", "room", "x", "z"]
        );
        assert_eq!(
            headers(dir.path().join("tick_summaries.csv")),
            ["tick", "unix_time_secs", "woken_agents", "active_agents", "using_room", "occupied_rooms", "total_rooms"]
        );
    }

    #[test]
    fn transitions_mark_missing_fields() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_transition(&TransitionRow {
            tick:     0,
            agent_id: 4,
            from:     None,
            to:       Some(AgentState::MovingToQueue),
            room:     None,
        })
        .unwrap();
        w.write_transition(&TransitionRow {
            tick:     170,
            agent_id: 4,
            from:     Some(AgentState::WaitingInQueue),
            to:       Some(AgentState::MovingToRoom),
            room:     Some(RoomId::new(10, 30)),
        })
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_transitions.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][2], "-");
        assert_eq!(&rows[0][3], "MovingToQueue");
        assert_eq!(&rows[0][4], "-");
        assert_eq!(&rows[1][0], "170");
        assert_eq!(&rows[1][4], "Room_10_30");
    }

    #[test]
    fn snapshot_and_summary_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[AgentSnapshotRow {
            agent_id: 1,
            tick:     20,
            state:    AgentState::UsingRoom,
            status:   "using Room_3_4".to_owned(),
            room:     Some(RoomId::new(3, 4)),
            x:        3.25,
            z:        4.0,
        }])
        .unwrap();
        w.write_tick_summary(&TickSummaryRow {
            tick:           20,
            unix_time_secs: 2,
            woken_agents:   1,
            active_agents:  1,
            using_room:     1,
            occupied_rooms: 1,
            total_rooms:    3,
        })
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let snap: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&snap[0][3], "using Room_3_4");
        assert_eq!(&snap[0][5], "3.25");

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let sum: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(sum.len(), 1);
        assert_eq!(&sum[0][1], "2");
        assert_eq!(&sum[0][6], "3");
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use std::sync::Arc;

    use tempfile::TempDir;
    use vs_core::{Point, SimConfig};
    use vs_nav::{NavSurface, NavigationAdapter, Walker};
    use vs_queue::{CounterConfig, CounterQueue};
    use vs_rooms::{RoomDescriptor, StaticScan};
    use vs_sim::SimBuilder;

    use crate::row::{AgentSnapshotRow, TickSummaryRow, TransitionRow};
    use crate::writer::OutputWriter;
    use crate::{CsvWriter, OutputError, OutputResult, SimOutputObserver};

    fn config() -> SimConfig {
        SimConfig {
            start_unix_secs:       1_000,
            tick_duration_ms:      100,
            total_ticks:           300,
            seed:                  9,
            num_threads:           Some(1),
            output_interval_ticks: 50,
            rescan_interval_ticks: 0,
        }
    }

    fn lobby_sim(agents: usize) -> vs_sim::Sim {
        let spawn = Point::on_floor(2.0, 2.0);
        let surface = Arc::new(NavSurface::builder().add_floor([0.0, 0.0], [30.0, 30.0]).build().unwrap());
        let navs = (0..agents)
            .map(|_| Some(Box::new(Walker::new(surface.clone(), spawn, 0.5)) as Box<dyn NavigationAdapter>))
            .collect();
        let counter = CounterConfig { counter: Point::on_floor(15.0, 5.0), ..CounterConfig::default() };
        let rooms = vec![RoomDescriptor::square(Point::on_floor(10.0, 25.0), 4.0)];
        SimBuilder::new(config(), agents)
            .navigation(navs)
            .queue(Arc::new(CounterQueue::new(counter, &config().make_clock())))
            .scan_source(Box::new(StaticScan::new(rooms)))
            .spawn_anchor(spawn)
            .build()
            .unwrap()
    }

    #[test]
    fn run_writes_all_files() {
        let dir: TempDir = tempfile::tempdir().unwrap();
        let mut sim = lobby_sim(3);
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap(), &config());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_transitions.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        let spawns = rows.iter().filter(|r| &r[2] == "-").count();
        assert_eq!(spawns, 3);

        // Snapshots at ticks 0, 50, …, 250.
        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let sums: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(sums.len(), 6);
        assert_eq!(&sums[0][1], "1000");
        assert_eq!(&sums[1][1], "1005");
        assert_eq!(&sums[0][6], "1");
    }

    /// Fails every transition write with a distinct message.
    #[derive(Default)]
    struct Broken {
        calls: usize,
    }

    impl OutputWriter for Broken {
        fn write_transition(&mut self, _row: &TransitionRow) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(std::io::Error::other(format!("write {}", self.calls))))
        }
        fn write_snapshots(&mut self, _rows: &[AgentSnapshotRow]) -> OutputResult<()> {
            Ok(())
        }
        fn write_tick_summary(&mut self, _row: &TickSummaryRow) -> OutputResult<()> {
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn first_error_is_kept() {
        let mut sim = lobby_sim(2);
        let mut obs = SimOutputObserver::new(Broken::default(), &config());
        sim.run(&mut obs).unwrap();
        let err = obs.take_error().expect("writes failed");
        assert_eq!(err.to_string(), "I/O error: write 1");
        assert!(obs.take_error().is_none());
        assert!(obs.into_writer().calls >= 2);
    }
}
