//! C8: the durable, machine-readable analytics record.
//!
//! One CSV writer per measurement stream, keyed by satellite or ground
//! station id. Writes are buffered in memory and only reach disk on an
//! explicit [`LogEmitter::flush`], keeping the step loop's hot path free
//! of blocking I/O (see the concurrency notes: log writes are not on the
//! critical path). Distinct from the console narration in
//! [`crate::logger`], which is for a human operator, not downstream
//! analysis tooling.

use crate::error::LogError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn writer_for(log_dir: &Path, stream: &str) -> Result<csv::Writer<std::fs::File>, LogError> {
    let path: PathBuf = log_dir.join(format!("{stream}.csv"));
    csv::Writer::from_path(&path).map_err(|source| LogError { stream: stream.to_string(), source })
}

/// Owns one writer per `(stream kind, id)` pair, created lazily on first
/// use so a run with N satellites and M ground stations only opens the
/// files it actually needs.
pub struct LogEmitter {
    log_dir: PathBuf,
    overflow: HashMap<u32, csv::Writer<std::fs::File>>,
    buffered: HashMap<u32, csv::Writer<std::fs::File>>,
    downlink: HashMap<u32, csv::Writer<std::fs::File>>,
    connection_change: HashMap<u32, csv::Writer<std::fs::File>>,
    trigger_time: Option<csv::Writer<std::fs::File>>,
}

impl LogEmitter {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            overflow: HashMap::new(),
            buffered: HashMap::new(),
            downlink: HashMap::new(),
            connection_change: HashMap::new(),
            trigger_time: None,
        }
    }

    /// `buffer-overflow-sat-<id>`: cumulative lost data in MB.
    pub fn record_overflow(
        &mut self,
        sat_id: u32,
        step: u64,
        now: DateTime<Utc>,
        total_lost_mb: f64,
    ) -> Result<(), LogError> {
        let log_dir = &self.log_dir;
        let w = match self.overflow.entry(sat_id) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(writer_for(log_dir, &format!("buffer-overflow-sat-{sat_id}"))?)
            }
        };
        w.write_record(&[step.to_string(), now.to_rfc3339(), format!("{total_lost_mb}")])
            .map_err(|source| LogError { stream: format!("buffer-overflow-sat-{sat_id}"), source })
    }

    /// `bits-buffered-sat-<id>`: per-step buffered bits.
    pub fn record_buffered(
        &mut self,
        sat_id: u32,
        step: u64,
        now: DateTime<Utc>,
        bits_buffered: u64,
    ) -> Result<(), LogError> {
        let log_dir = &self.log_dir;
        let w = match self.buffered.entry(sat_id) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(writer_for(log_dir, &format!("bits-buffered-sat-{sat_id}"))?)
            }
        };
        w.write_record(&[step.to_string(), now.to_rfc3339(), bits_buffered.to_string()])
            .map_err(|source| LogError { stream: format!("bits-buffered-sat-{sat_id}"), source })
    }

    /// `downlink-gnd-<id>`: per-step `(sat_id, bits_drained)` when connected.
    pub fn record_downlink(
        &mut self,
        gnd_id: u32,
        step: u64,
        now: DateTime<Utc>,
        sat_id: u32,
        bits_drained: u64,
    ) -> Result<(), LogError> {
        let log_dir = &self.log_dir;
        let w = match self.downlink.entry(gnd_id) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(writer_for(log_dir, &format!("downlink-gnd-{gnd_id}"))?)
            }
        };
        w.write_record(&[step.to_string(), now.to_rfc3339(), sat_id.to_string(), bits_drained.to_string()])
            .map_err(|source| LogError { stream: format!("downlink-gnd-{gnd_id}"), source })
    }

    /// `connection-change-gnd-<id>`: emitted whenever `current_sat_id` changes.
    pub fn record_connection_change(
        &mut self,
        gnd_id: u32,
        step: u64,
        now: DateTime<Utc>,
        new_sat: Option<u32>,
    ) -> Result<(), LogError> {
        let log_dir = &self.log_dir;
        let w = match self.connection_change.entry(gnd_id) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(writer_for(log_dir, &format!("connection-change-gnd-{gnd_id}"))?)
            }
        };
        let sat_field = new_sat.map_or_else(|| "none".to_string(), |id| id.to_string());
        w.write_record(&[step.to_string(), now.to_rfc3339(), sat_field])
            .map_err(|source| LogError { stream: format!("connection-change-gnd-{gnd_id}"), source })
    }

    /// Global `trigger-time` event, emitted whenever a spacing strategy
    /// initiates a capture.
    pub fn record_trigger(&mut self, sat_id: u32, step: u64, now: DateTime<Utc>) -> Result<(), LogError> {
        let log_dir = &self.log_dir;
        if self.trigger_time.is_none() {
            self.trigger_time = Some(writer_for(log_dir, "trigger-time")?);
        }
        let w = self.trigger_time.as_mut().expect("just initialized above");
        w.write_record(&[step.to_string(), now.to_rfc3339(), sat_id.to_string()])
            .map_err(|source| LogError { stream: "trigger-time".to_string(), source })
    }

    /// Flushes every open writer. Call at the end of the run (and
    /// optionally at a configured cadence) rather than after every record.
    pub fn flush(&mut self) -> Result<(), LogError> {
        for (id, w) in &mut self.overflow {
            w.flush().map_err(|e| LogError { stream: format!("buffer-overflow-sat-{id}"), source: e.into() })?;
        }
        for (id, w) in &mut self.buffered {
            w.flush().map_err(|e| LogError { stream: format!("bits-buffered-sat-{id}"), source: e.into() })?;
        }
        for (id, w) in &mut self.downlink {
            w.flush().map_err(|e| LogError { stream: format!("downlink-gnd-{id}"), source: e.into() })?;
        }
        for (id, w) in &mut self.connection_change {
            w.flush()
                .map_err(|e| LogError { stream: format!("connection-change-gnd-{id}"), source: e.into() })?;
        }
        if let Some(w) = self.trigger_time.as_mut() {
            w.flush().map_err(|e| LogError { stream: "trigger-time".to_string(), source: e.into() })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc)
    }

    #[test]
    fn writes_and_flushes_each_stream_to_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut emitter = LogEmitter::new(dir.path());

        emitter.record_overflow(1, 0, t0(), 2.5).unwrap();
        emitter.record_buffered(1, 0, t0(), 12_345).unwrap();
        emitter.record_downlink(7, 0, t0(), 1, 900).unwrap();
        emitter.record_connection_change(7, 0, t0(), Some(1)).unwrap();
        emitter.record_trigger(1, 0, t0()).unwrap();
        emitter.flush().unwrap();

        for name in [
            "buffer-overflow-sat-1.csv",
            "bits-buffered-sat-1.csv",
            "downlink-gnd-7.csv",
            "connection-change-gnd-7.csv",
            "trigger-time.csv",
        ] {
            let contents = std::fs::read_to_string(dir.path().join(name)).unwrap();
            assert!(!contents.is_empty(), "{name} should not be empty");
        }
    }

    #[test]
    fn connection_change_records_none_when_station_disconnects() {
        let dir = tempfile::tempdir().unwrap();
        let mut emitter = LogEmitter::new(dir.path());
        emitter.record_connection_change(3, 10, t0(), None).unwrap();
        emitter.flush().unwrap();
        let contents = std::fs::read_to_string(dir.path().join("connection-change-gnd-3.csv")).unwrap();
        assert!(contents.contains("none"));
    }
}
