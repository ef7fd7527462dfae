//! Output folder layout.
//!
//! Every artifact lands in `<root>/<Month> - <Year>/<OwnerFolder>/`, where the
//! root is one of the PDF, backup, or secondary-backup roots and the owner
//! folder is derived with [`sanitize_owner_folder`].

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};

use crate::error::Result;

/// Source of "today" for time-partitioned folders.
pub trait Calendar {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock calendar in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCalendar;

impl Calendar for SystemCalendar {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Calendar pinned to a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedCalendar(pub NaiveDate);

impl Calendar for FixedCalendar {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Calendar month used to partition output folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingPeriod {
    first_day: NaiveDate,
}

impl ReportingPeriod {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn current(calendar: &dyn Calendar) -> Self {
        Self::containing(calendar.today())
    }

    /// Folder label such as `August - 2025`.
    pub fn label(&self) -> String {
        self.first_day.format("%B - %Y").to_string()
    }
}

/// Turns an owner name into its folder name: `" - "` becomes `_`, then any
/// remaining space becomes `_`. Distinct owners may collapse to the same
/// folder.
pub fn sanitize_owner_folder(owner: &str) -> String {
    owner.replace(" - ", "_").replace(' ', "_")
}

/// Root folders the per-month trees are created under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub pdf_root: PathBuf,
    pub backup_root: PathBuf,
    pub secondary_backup_root: PathBuf,
}

/// Resolved per-owner destinations for one vessel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub owner_folder: String,
    pub pdf_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub secondary_backup_dir: PathBuf,
}

impl OutputPaths {
    fn directories(&self) -> [&Path; 3] {
        [
            self.pdf_dir.as_path(),
            self.backup_dir.as_path(),
            self.secondary_backup_dir.as_path(),
        ]
    }
}

impl OutputLayout {
    /// Computes the destinations without touching the filesystem.
    pub fn plan(&self, owner: &str, period: &ReportingPeriod) -> OutputPaths {
        let owner_folder = sanitize_owner_folder(owner);
        let month = period.label();
        let under = |root: &Path| root.join(&month).join(&owner_folder);
        OutputPaths {
            pdf_dir: under(&self.pdf_root),
            backup_dir: under(&self.backup_root),
            secondary_backup_dir: under(&self.secondary_backup_root),
            owner_folder,
        }
    }

    /// Computes the destinations and creates any directory that is missing.
    pub fn resolve(&self, owner: &str, period: &ReportingPeriod) -> Result<OutputPaths> {
        let paths = self.plan(owner, period);
        for dir in paths.directories() {
            fs::create_dir_all(dir)?;
        }
        Ok(paths)
    }
}
