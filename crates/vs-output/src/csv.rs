//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `agent_transitions.csv`
//! - `agent_snapshots.csv`
//! - `tick_summaries.csv`
//!
//! A missing state or room is written as `-`.

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;
use vs_agent::AgentState;
use vs_core::RoomId;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow, TransitionRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    transitions: Writer<File>,
    snapshots:   Writer<File>,
    summaries:   Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the three CSV files in it, and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut transitions = Writer::from_path(dir.join("agent_transitions.csv"))?;
        transitions.write_record(["tick", "agent_id", "from", "to", "room"])?;

        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(["agent_id", "tick", "state", "status", "room", "x", "z"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record([
            "tick",
            "unix_time_secs",
            "woken_agents",
            "active_agents",
            "using_room",
            "occupied_rooms",
            "total_rooms",
        ])?;

        Ok(Self {
            transitions,
            snapshots,
            summaries,
            finished: false,
        })
    }
}

fn state_field(state: Option<AgentState>) -> &'static str {
    state.map_or("-", AgentState::as_str)
}

fn room_field(room: Option<RoomId>) -> String {
    room.map_or_else(|| "-".to_owned(), |r| r.to_string())
}

impl OutputWriter for CsvWriter {
    fn write_transition(&mut self, row: &TransitionRow) -> OutputResult<()> {
        self.transitions.write_record(&[
            row.tick.to_string(),
            row.agent_id.to_string(),
            state_field(row.from).to_owned(),
            state_field(row.to).to_owned(),
            room_field(row.room),
        ])?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.state.as_str().to_owned(),
                row.status.clone(),
                room_field(row.room),
                format!("{:.2}", row.x),
                format!("{:.2}", row.z),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.unix_time_secs.to_string(),
            row.woken_agents.to_string(),
            row.active_agents.to_string(),
            row.using_room.to_string(),
            row.occupied_rooms.to_string(),
            row.total_rooms.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.transitions.flush()?;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
