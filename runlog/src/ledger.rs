//! Append-only experiment run ledger.
//!
//! Records are created exactly once and never updated or deleted. Each
//! append persists one JSON document under the runs directory before
//! returning; the CSV summary is re-derived from the full in-memory
//! sequence on every export, never cached.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// One logged experiment run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    /// Unique within the ledger's lifetime; ordered by sequence number.
    pub run_id: String,
    /// Free-form label, not unique.
    pub name: String,
    /// RFC 3339 creation instant.
    pub timestamp: String,
    /// Opaque experiment configuration.
    pub config: BTreeMap<String, Value>,
    /// Numeric results. The summary derives `best_metric` from these.
    pub metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub notes: String,
}

impl RunRecord {
    /// Maximum metric value, ignoring NaN. `None` when nothing is rankable.
    pub fn best_metric(&self) -> Option<f64> {
        self.metrics
            .values()
            .copied()
            .filter(|value| !value.is_nan())
            .fold(None, |best, value| match best {
                Some(current) if current >= value => Some(current),
                _ => Some(value),
            })
    }
}

/// Append-only in-process collection of run records.
#[derive(Debug)]
pub struct RunLedger {
    runs_dir: PathBuf,
    records: Vec<RunRecord>,
    next_seq: u64,
}

impl RunLedger {
    /// Open a ledger rooted at `runs_dir`, creating the directory if absent.
    pub fn new(runs_dir: impl Into<PathBuf>) -> Result<Self> {
        let runs_dir = runs_dir.into();
        fs::create_dir_all(&runs_dir)
            .with_context(|| format!("create runs dir {}", runs_dir.display()))?;
        Ok(Self {
            runs_dir,
            records: Vec::new(),
            next_seq: 0,
        })
    }

    /// Append one run and persist it as `<runs_dir>/<run_id>.json`.
    ///
    /// The sequence number makes ids unique even within one clock tick. On a
    /// persistence failure the in-memory record stands and the error is
    /// returned; the caller decides whether that is acceptable.
    pub fn append(
        &mut self,
        name: &str,
        config: BTreeMap<String, Value>,
        metrics: BTreeMap<String, f64>,
        notes: Option<&str>,
    ) -> Result<String> {
        let now = Utc::now();
        let seq = self.next_seq;
        self.next_seq += 1;
        let run_id = format!("run_{seq:04}_{}", now.format("%Y%m%d_%H%M%S"));

        let record = RunRecord {
            run_id: run_id.clone(),
            name: name.to_string(),
            timestamp: now.to_rfc3339(),
            config,
            metrics,
            notes: notes.unwrap_or_default().to_string(),
        };
        self.records.push(record.clone());

        let path = self.runs_dir.join(format!("{run_id}.json"));
        write_json(&path, &record)?;
        debug!(run_id = %run_id, path = %path.display(), "run appended");
        Ok(run_id)
    }

    /// Write the CSV summary to `destination`, overwriting any existing file.
    ///
    /// Columns are fixed: `run_id,name,timestamp,best_metric,notes`, one row
    /// per record in insertion order. An empty ledger writes nothing and
    /// returns `false`.
    pub fn export_summary(&self, destination: &Path) -> Result<bool> {
        if self.records.is_empty() {
            info!("no runs to export");
            return Ok(false);
        }
        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }

        let mut out = String::from("run_id,name,timestamp,best_metric,notes\n");
        for record in &self.records {
            let best = record
                .best_metric()
                .map(|value| value.to_string())
                .unwrap_or_default();
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                csv_escape(&record.run_id),
                csv_escape(&record.name),
                csv_escape(&record.timestamp),
                best,
                csv_escape(&record.notes),
            ));
        }
        fs::write(destination, out)
            .with_context(|| format!("write summary {}", destination.display()))?;
        debug!(
            destination = %destination.display(),
            rows = self.records.len(),
            "summary exported"
        );
        Ok(true)
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn runs_dir(&self) -> &Path {
        &self.runs_dir
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(value)
        .with_context(|| format!("serialize {}", path.display()))?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write {}", path.display()))
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
