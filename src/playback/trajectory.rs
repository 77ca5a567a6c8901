//! Trajectory ingestion and cleaning
//!
//! The integrator writes a CSV table: a header row followed by records with at
//! least the columns `x, y, z, body_id, step` (any order, extra columns ignored).
//! Loading:
//! - coerces those five fields to numbers and drops any row where one fails,
//! - orders body ids by first appearance in the cleaned rows ([`BodyIndex`]),
//! - collects the distinct steps in ascending order, gaps allowed,
//! - indexes `(step, body_id)` to the first matching record.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};

use crate::simulation::states::NVec3;

#[derive(Debug, thiserror::Error)]
pub enum TrajectoryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("trajectory file has no header row")]
    MissingHeader,

    #[error("trajectory header has no `{0}` column")]
    MissingColumn(&'static str),
}

/// One cleaned trajectory row
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryRecord {
    pub step: u64,    // raw step number from the integrator
    pub body_id: u64, // integrator body id
    pub x: NVec3,     // position, m
}

/// Stable body id -> rendering slot mapping, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct BodyIndex {
    ids: Vec<u64>,
    slots: HashMap<u64, usize>,
}

impl BodyIndex {
    /// Register `id` if unseen and return its slot
    pub fn insert(&mut self, id: u64) -> usize {
        if let Some(&slot) = self.slots.get(&id) {
            return slot;
        }
        let slot = self.ids.len();
        self.ids.push(id);
        self.slots.insert(id, slot);
        slot
    }

    pub fn slot(&self, id: u64) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    /// Body ids in slot order
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// Column positions of the required fields in the header
#[derive(Debug, Clone, Copy)]
struct Columns {
    x: usize,
    y: usize,
    z: usize,
    body_id: usize,
    step: usize,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, TrajectoryError> {
        let find = |name: &'static str| {
            header
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
                .ok_or(TrajectoryError::MissingColumn(name))
        };

        Ok(Self {
            x: find("x")?,
            y: find("y")?,
            z: find("z")?,
            body_id: find("body_id")?,
            step: find("step")?,
        })
    }
}

fn parse_float(record: &StringRecord, col: usize) -> Option<f64> {
    let value = record.get(col)?.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

// Integer columns accept float spellings (`3.0`) but not fractions or negatives
fn parse_index(record: &StringRecord, col: usize) -> Option<u64> {
    let raw = record.get(col)?;
    if let Ok(n) = raw.parse::<u64>() {
        return Some(n);
    }
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
        .then_some(value as u64)
}

fn parse_record(record: &StringRecord, cols: &Columns) -> Option<TrajectoryRecord> {
    Some(TrajectoryRecord {
        step: parse_index(record, cols.step)?,
        body_id: parse_index(record, cols.body_id)?,
        x: NVec3::new(
            parse_float(record, cols.x)?,
            parse_float(record, cols.y)?,
            parse_float(record, cols.z)?,
        ),
    })
}

/// A cleaned, indexed trajectory ready for playback
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    records: Vec<TrajectoryRecord>,
    bodies: BodyIndex,
    steps: Vec<u64>,
    lookup: HashMap<(u64, u64), usize>,
    dropped: usize,
}

impl Trajectory {
    /// Build from already-cleaned records, keeping their order
    pub fn from_records(records: Vec<TrajectoryRecord>) -> Self {
        let mut bodies = BodyIndex::default();
        let mut lookup = HashMap::with_capacity(records.len());

        for (i, r) in records.iter().enumerate() {
            bodies.insert(r.body_id);
            lookup.entry((r.step, r.body_id)).or_insert(i);
        }

        let mut steps: Vec<u64> = records.iter().map(|r| r.step).collect();
        steps.sort_unstable();
        steps.dedup();

        Self {
            records,
            bodies,
            steps,
            lookup,
            dropped: 0,
        }
    }

    /// Parse and clean a trajectory table. Quoted fields may contain commas;
    /// blank lines are skipped and a leading UTF-8 BOM is ignored.
    pub fn from_reader<R: Read>(input: R) -> Result<Self, TrajectoryError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(input);

        let header = reader.headers()?.clone();
        if header.iter().all(|h| h.trim_start_matches('\u{feff}').is_empty()) {
            return Err(TrajectoryError::MissingHeader);
        }
        let cols = Columns::from_header(&header)?;

        let mut records = Vec::new();
        let mut dropped = 0;
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(e.into()),
                // undecodable rows are cleaned away like any other bad row
                Err(_) => {
                    dropped += 1;
                    continue;
                }
            };
            match parse_record(&row, &cols) {
                Some(r) => records.push(r),
                None => dropped += 1,
            }
        }

        let mut trajectory = Self::from_records(records);
        trajectory.dropped = dropped;

        if dropped > 0 {
            debug!("dropped {dropped} malformed trajectory rows");
        }
        info!(
            "Loaded {} valid rows for {} bodies over {} steps.",
            trajectory.records.len(),
            trajectory.bodies.len(),
            trajectory.steps.len()
        );
        Ok(trajectory)
    }

    /// Open and load a trajectory file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TrajectoryError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn records(&self) -> &[TrajectoryRecord] {
        &self.records
    }

    pub fn bodies(&self) -> &BodyIndex {
        &self.bodies
    }

    /// Distinct step numbers, ascending
    pub fn steps(&self) -> &[u64] {
        &self.steps
    }

    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    /// Rows discarded while cleaning
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// First record for `body_id` at raw step `step`
    pub fn position(&self, step: u64, body_id: u64) -> Option<NVec3> {
        self.lookup.get(&(step, body_id)).map(|&i| self.records[i].x)
    }
}
