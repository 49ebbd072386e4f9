//! Where per-step field snapshots go. The simulation never reads them back.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{Result, SweError};
use crate::index_partition::IndexRange;
use crate::tile_state::Field;
use crate::WorkingPrecision;

/// Interior values of one field of one tile at one step, `i` fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSnapshot {
    pub field: Field,
    pub step: u32,
    pub rank: usize,
    pub i_range: IndexRange,
    pub j_range: IndexRange,
    pub values: Vec<WorkingPrecision>,
}

impl FieldSnapshot {
    /// Global `(i, j, value)` triples.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, WorkingPrecision)> + '_ {
        let i_range = self.i_range;
        self.j_range
            .iter()
            .flat_map(move |j| i_range.iter().map(move |i| (i, j)))
            .zip(self.values.iter())
            .map(|((i, j), &value)| (i, j, value))
    }
}

pub trait FieldSink: Send + Sync {
    fn write_field(&self, snapshot: FieldSnapshot) -> Result<()>;

    /// Kernel timing table of the primary worker, once per run.
    fn write_timings(&self, _timings_csv: &str) -> Result<()> {
        Ok(())
    }
}

/// Discards everything.
pub struct NullSink;

impl FieldSink for NullSink {
    fn write_field(&self, _snapshot: FieldSnapshot) -> Result<()> {
        Ok(())
    }
}

/// Keeps every snapshot in memory.
#[derive(Default)]
pub struct MemorySink {
    snapshots: Mutex<Vec<FieldSnapshot>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<FieldSnapshot> {
        self.snapshots.lock().clone()
    }

    /// Assembles the global `im x jm` field at `step` from all tiles, `i` fastest.
    pub fn global_field(
        &self,
        field: Field,
        step: u32,
        im: usize,
        jm: usize,
    ) -> Option<Vec<WorkingPrecision>> {
        let snapshots = self.snapshots.lock();
        let mut global = vec![WorkingPrecision::NAN; im * jm];
        let mut found = false;

        for snapshot in snapshots
            .iter()
            .filter(|s| s.field == field && s.step == step)
        {
            found = true;
            for (i, j, value) in snapshot.cells() {
                global[(i - 1) + (j - 1) * im] = value;
            }
        }

        if found {
            Some(global)
        } else {
            None
        }
    }
}

impl FieldSink for MemorySink {
    fn write_field(&self, snapshot: FieldSnapshot) -> Result<()> {
        self.snapshots.lock().push(snapshot);
        Ok(())
    }
}

/// One CSV file per field, tile and step.
pub struct CsvFieldSink {
    output_dir: PathBuf,
}

impl CsvFieldSink {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir).map_err(|source| SweError::Io {
            path: output_dir.clone(),
            source,
        })?;

        Ok(CsvFieldSink { output_dir })
    }

    pub fn file_path(&self, field: Field, rank: usize, step: u32) -> PathBuf {
        self.output_dir.join(format!(
            "swe2d_{}_r{:03}_{:0>5}.csv",
            field.name(),
            rank,
            step
        ))
    }
}

impl FieldSink for CsvFieldSink {
    fn write_field(&self, snapshot: FieldSnapshot) -> Result<()> {
        let output_path = self.file_path(snapshot.field, snapshot.rank, snapshot.step);
        let io_error = |source| SweError::Io {
            path: output_path.clone(),
            source,
        };

        let file = File::create(&output_path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "i, j, {}", snapshot.field.name()).map_err(io_error)?;
        for (i, j, value) in snapshot.cells() {
            writeln!(writer, "{}, {}, {:6.8E}", i, j, value).map_err(io_error)?;
        }
        writer.flush().map_err(io_error)?;

        debug!(
            "Wrote {} for step {} to file {}.",
            snapshot.field.name(),
            snapshot.step,
            output_path.display()
        );
        Ok(())
    }

    fn write_timings(&self, timings_csv: &str) -> Result<()> {
        let output_path = self.output_dir.join("swe2d_timings.csv");

        std::fs::write(&output_path, timings_csv).map_err(|source| SweError::Io {
            path: output_path.clone(),
            source,
        })?;

        info!("Wrote kernel timings data to file {}.", output_path.display());
        Ok(())
    }
}
