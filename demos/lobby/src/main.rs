//! lobby — a small venue for the rust_venue agent simulation.
//!
//! A 40 × 30 m lobby with a service counter near the south wall, six rooms
//! along the north wall, and a balcony with two more rooms.  Visitors spawn
//! at the south-west door, queue at the counter for a room, use it, queue
//! again to hand it back, and leave.  Retired visitors are pooled and
//! respawned.  Halfway through, one north room closes and reopens a minute
//! later, exercising the rescan path.
//!
//! Usage: `lobby [config.json]`.  Without a file the built-in defaults run.
//! Logging follows `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vs_agent::{Agent, AgentState, BehaviorConfig, SpawnPool, Transition};
use vs_core::{Point, RoomId, SimConfig, Tick};
use vs_nav::{NavSurface, NavigationAdapter, Walker};
use vs_output::{CsvWriter, OutputWriter, SimOutputObserver};
use vs_queue::{CounterConfig, CounterQueue};
use vs_rooms::{RoomDescriptor, RoomRegistry, ScriptedScan};
use vs_sim::{SimBuilder, SimObserver};

// ── Layout ────────────────────────────────────────────────────────────────────

const SPAWN:   Point = Point::on_floor(2.0, 2.0);
const COUNTER: Point = Point::on_floor(20.0, 4.0);
/// Balcony height; its area is tagged 1 so ground wandering never goes up.
const BALCONY_Y:    f32 = 3.0;
const BALCONY_AREA: u8  = 1;
const OUTPUT_DIR:   &str = "output/lobby";

fn build_surface() -> Result<Arc<NavSurface>> {
    let surface = NavSurface::builder()
        .add_floor([0.0, 0.0], [40.0, 30.0])
        .add_rect([28.0, 18.0], [40.0, 30.0], BALCONY_Y, BALCONY_AREA)
        .build()
        .context("building the lobby surface")?;
    Ok(Arc::new(surface))
}

fn north_rooms() -> Vec<RoomDescriptor> {
    [4.0, 8.0, 12.0, 16.0, 20.0, 24.0]
        .into_iter()
        .map(|x| RoomDescriptor::square(Point::on_floor(x, 26.0), 3.5))
        .collect()
}

fn all_rooms() -> Vec<RoomDescriptor> {
    let mut rooms = north_rooms();
    rooms.push(RoomDescriptor::square(Point::new(32.0, BALCONY_Y, 26.0), 4.0));
    // No measured extent: gets the default size.
    rooms.push(RoomDescriptor::new(Point::new(37.0, BALCONY_Y, 22.0), None));
    rooms
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Everything tunable from the JSON file; missing fields keep their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct LobbyConfig {
    sim:                    SimConfig,
    agents:                 usize,
    behavior:               BehaviorConfig,
    /// Capacity and service time.  Position and direction come from the
    /// layout.
    counter:                CounterConfig,
    respawn_interval_ticks: u64,
    max_active:             usize,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig {
                start_unix_secs:       1_700_000_000,
                total_ticks:           9_000, // 15 simulated minutes
                output_interval_ticks: 50,
                rescan_interval_ticks: 10,
                ..SimConfig::default()
            },
            agents:                 12,
            behavior:               BehaviorConfig::default(),
            counter:                CounterConfig::default(),
            respawn_interval_ticks: 100,
            max_active:             10,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<LobbyConfig> {
    let Some(path) = path else {
        return Ok(LobbyConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

// ── Observer wrapper to count rows ────────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:       SimOutputObserver<W>,
    transitions: usize,
    visits:      usize,
    peak_using:  usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, transitions: 0, visits: 0, peak_using: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_transition(&mut self, transition: &Transition) {
        self.transitions += 1;
        if transition.to == Some(AgentState::UsingRoom) {
            self.visits += 1;
        }
        self.inner.on_transition(transition);
    }

    fn on_tick_end(&mut self, tick: Tick, woken: usize) {
        self.inner.on_tick_end(tick, woken);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[Agent], registry: &RoomRegistry) {
        let using = agents
            .iter()
            .filter(|a| a.is_active() && a.state() == AgentState::UsingRoom)
            .count();
        self.peak_using = self.peak_using.max(using);
        self.inner.on_snapshot(tick, agents, registry);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = load_config(config_path.as_deref())?;
    cfg.sim.validate()?;

    #[cfg(feature = "parallel")]
    {
        if let Some(threads) = cfg.sim.num_threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .context("configuring the rayon pool")?;
        }
    }

    println!("=== lobby — rust_venue agent simulation ===");
    println!(
        "Agents: {}  |  Ticks: {} × {} ms  |  Seed: {}",
        cfg.agents, cfg.sim.total_ticks, cfg.sim.tick_duration_ms, cfg.sim.seed
    );
    println!();

    // 1. Walkable surface and one walker per agent.
    let surface = build_surface()?;
    let navs: Vec<Option<Box<dyn NavigationAdapter>>> = (0..cfg.agents)
        .map(|_| {
            let walker = Walker::new(surface.clone(), SPAWN, cfg.behavior.arrival_threshold);
            Some(Box::new(walker) as Box<dyn NavigationAdapter>)
        })
        .collect();

    // 2. Counter: the line runs north from the counter.
    let counter = CounterConfig {
        counter:        COUNTER,
        slot_direction: Point::new(0.0, 0.0, 1.0),
        ..cfg.counter
    };
    let queue = Arc::new(CounterQueue::new(counter, &cfg.sim.make_clock()));

    // 3. Rooms: one closes halfway through and reopens a minute later.
    let half = cfg.sim.total_ticks / 2;
    let minute = cfg.sim.make_clock().ticks_for_secs(60.0);
    let mut reduced = all_rooms();
    let closed = reduced.remove(2);
    let scan = ScriptedScan::new()
        .at(Tick::ZERO, all_rooms())
        .at(Tick(half), reduced)
        .at(Tick(half + minute), all_rooms());
    info!(room = %closed.id(), from = half, until = half + minute, "scheduled room closure");

    // 4. Build sim.
    let registry = Arc::new(RoomRegistry::new());
    let mut sim = SimBuilder::new(cfg.sim.clone(), cfg.agents)
        .navigation(navs)
        .behavior(cfg.behavior)
        .registry(registry.clone())
        .queue(queue)
        .scan_source(Box::new(scan))
        .pool(Arc::new(SpawnPool::new()))
        .spawn_anchor(SPAWN)
        .respawn(cfg.respawn_interval_ticks, cfg.max_active)
        .build()?;

    // 5. Output.
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer, &cfg.sim));

    // 6. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 7. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  transitions written : {}", obs.transitions);
    println!("  room visits started : {}", obs.visits);
    println!("  peak rooms in use   : {} of {}", obs.peak_using, registry.len());
    println!("  output directory    : {OUTPUT_DIR}");
    println!();

    // 8. Final agent table.
    println!("{:<8} {:<10} {:<24} {:<12}", "Agent", "Lifecycle", "Status", "Room");
    println!("{}", "-".repeat(56));
    for agent in &sim.agents {
        let room = agent.assigned_room().map_or_else(|| "-".to_owned(), |r: RoomId| r.to_string());
        println!(
            "{:<8} {:<10} {:<24} {:<12}",
            agent.id().to_string(),
            format!("{:?}", agent.lifecycle()),
            if agent.is_active() { agent.description() } else { "-".to_owned() },
            room,
        );
    }

    Ok(())
}
