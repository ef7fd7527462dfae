use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical vessel name: trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VesselName(String);

impl VesselName {
    /// Normalises a raw vessel name. Returns `None` when nothing is left after
    /// trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = normalize_key(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VesselName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upper-case, trimmed form shared by vessel names and owner-map keys.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// How a requested sheet is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetTreatment {
    /// Rendered to a PDF fragment and merged into the vessel bundle.
    Pdf,
    /// Copied into a standalone workbook written to both backup folders.
    Workbook,
}

/// Tagged outcome used for sheets, backup writes, and whole vessels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Produced,
    SkippedNotFound,
    Failed(String),
}

impl Outcome {
    pub fn is_produced(&self) -> bool {
        matches!(self, Outcome::Produced)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Produced => f.write_str("produced"),
            Outcome::SkippedNotFound => f.write_str("skipped (not found)"),
            Outcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Result of exporting one requested sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetReport {
    pub sheet: String,
    pub treatment: SheetTreatment,
    pub outcome: Outcome,
}

/// Result of writing a backup workbook to one destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupWrite {
    pub sheet: String,
    pub destination: PathBuf,
    pub outcome: Outcome,
}

/// Per-vessel export outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResult {
    pub vessel: VesselName,
    pub owner: String,
    /// Source workbook the artifacts were produced from, if one was found.
    pub source: Option<PathBuf>,
    pub status: Outcome,
    pub sheets: Vec<SheetReport>,
    pub backups: Vec<BackupWrite>,
    /// Path of the merged PDF; absent when no fragment was produced or the
    /// merge failed.
    pub merged_pdf: Option<PathBuf>,
}

impl ExportResult {
    pub(crate) fn new(vessel: VesselName, owner: String) -> Self {
        Self {
            vessel,
            owner,
            source: None,
            status: Outcome::SkippedNotFound,
            sheets: Vec::new(),
            backups: Vec::new(),
            merged_pdf: None,
        }
    }

    /// Names of the sheets that produced a PDF fragment, in request order.
    pub fn pdf_fragments(&self) -> Vec<&str> {
        self.sheets
            .iter()
            .filter(|report| report.treatment == SheetTreatment::Pdf && report.outcome.is_produced())
            .map(|report| report.sheet.as_str())
            .collect()
    }

    /// Number of backup files actually written.
    pub fn successful_backup_writes(&self) -> usize {
        self.backups
            .iter()
            .filter(|write| write.outcome.is_produced())
            .count()
    }
}

/// Outcome of a whole batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    /// Vessels attempted, regardless of their individual outcome.
    pub attempted: usize,
    pub produced: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<ExportResult>,
}

impl BatchSummary {
    pub(crate) fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            attempted: 0,
            produced: 0,
            skipped: 0,
            failed: 0,
            results: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, result: ExportResult) {
        self.attempted += 1;
        match result.status {
            Outcome::Produced => self.produced += 1,
            Outcome::SkippedNotFound => self.skipped += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
        self.results.push(result);
    }

    /// Human readable one-line description of the batch.
    pub fn message(&self) -> String {
        format!("Processed {} vessel(s)", self.attempted)
    }

    /// Logs the summary at info level.
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            attempted = self.attempted,
            produced = self.produced,
            skipped = self.skipped,
            failed = self.failed,
            "batch completed"
        );
    }
}
