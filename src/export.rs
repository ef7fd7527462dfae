use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::classify::classify;
use crate::engine::{EngineSession, OpenWorkbook, ProcessSupervisor, SpreadsheetEngine};
use crate::error::{Result, ToolError};
use crate::io::excel_read::is_spreadsheet;
use crate::io::pdf_merge;
use crate::model::{
    BackupWrite, ExportResult, Outcome, SheetReport, SheetTreatment, VesselName,
};
use crate::owners::OwnerDirectory;
use crate::paths::{Calendar, OutputLayout, OutputPaths, ReportingPeriod};

/// Prefix of office lock files that sit next to an open workbook.
const LOCK_FILE_PREFIX: &str = "~$";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Report a missing source workbook or a missing sheet as a failure
    /// instead of a skip.
    pub strict: bool,
}

/// Read-only collaborators shared by every vessel of a run.
pub struct ExportContext<'a> {
    pub owners: &'a OwnerDirectory,
    pub layout: &'a OutputLayout,
    pub calendar: &'a dyn Calendar,
    pub input_dir: &'a Path,
    pub options: ExportOptions,
}

/// Exports the requested sheets of one vessel at a time.
pub struct VesselExporter<'a, E: SpreadsheetEngine> {
    context: ExportContext<'a>,
    engine: E,
    supervisor: ProcessSupervisor,
}

impl<'a, E: SpreadsheetEngine> VesselExporter<'a, E> {
    pub fn new(context: ExportContext<'a>, engine: E, supervisor: ProcessSupervisor) -> Self {
        Self {
            context,
            engine,
            supervisor,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Exports `sheets` for `vessel`. Never fails: faults are recorded in
    /// the returned result and logged.
    #[instrument(level = "info", skip_all, fields(vessel = %vessel))]
    pub fn export_vessel(&mut self, vessel: &VesselName, sheets: &[String]) -> ExportResult {
        let owner = self.context.owners.lookup(vessel.as_str()).to_string();
        let mut result = ExportResult::new(vessel.clone(), owner);

        if let Err(err) = self.try_export(vessel, sheets, &mut result) {
            warn!(error = %err, "vessel export failed");
            result.status = Outcome::Failed(err.to_string());
        }
        result
    }

    fn try_export(
        &mut self,
        vessel: &VesselName,
        sheets: &[String],
        result: &mut ExportResult,
    ) -> Result<()> {
        let strict = self.context.options.strict;

        let Some(source) = find_source_workbook(self.context.input_dir, vessel)? else {
            info!(input = %self.context.input_dir.display(), "no source workbook found");
            result.status = if strict {
                Outcome::Failed(format!("no source workbook for {vessel}"))
            } else {
                Outcome::SkippedNotFound
            };
            return Ok(());
        };
        info!(source = %source.display(), owner = %result.owner, "source workbook found");
        result.source = Some(source.clone());

        let base_name = source_base_name(&source)?;
        let period = ReportingPeriod::current(self.context.calendar);
        let paths = self.context.layout.resolve(&result.owner, &period)?;
        let classified = classify(sheets);

        let mut session = EngineSession::acquire(&mut self.engine, &self.supervisor)?;
        let mut workbook = session.open(&source)?;

        let mut fragments: Vec<PathBuf> = Vec::new();
        for sheet in &classified.pdf {
            let fragment = paths.pdf_dir.join(fragment_file_name(sheet));
            let outcome = match workbook.export_sheet_pdf(sheet, &fragment) {
                Ok(()) => {
                    debug!(sheet = %sheet, fragment = %fragment.display(), "sheet rendered");
                    fragments.push(fragment);
                    Outcome::Produced
                }
                Err(err) => sheet_failure(err, sheet, strict),
            };
            result.sheets.push(SheetReport {
                sheet: sheet.clone(),
                treatment: SheetTreatment::Pdf,
                outcome,
            });
        }

        for sheet in &classified.backup {
            let outcome = write_backup(
                &mut workbook,
                sheet,
                &base_name,
                &paths,
                strict,
                &mut result.backups,
            );
            result.sheets.push(SheetReport {
                sheet: sheet.clone(),
                treatment: SheetTreatment::Workbook,
                outcome,
            });
        }

        drop(workbook);
        drop(session);

        if !fragments.is_empty() {
            let merged = paths.pdf_dir.join(format!("{base_name}.pdf"));
            pdf_merge::merge_in_order(&fragments, &merged)?;
            remove_fragments(&fragments);
            info!(merged = %merged.display(), fragments = fragments.len(), "merged PDF written");
            result.merged_pdf = Some(merged);
        }

        result.status = vessel_status(&result.sheets, strict);
        Ok(())
    }
}

/// Finds the first `.xlsx`/`.xlsm` file in `input_dir`, by file name order,
/// whose name contains the vessel name (case-insensitive).
pub fn find_source_workbook(input_dir: &Path, vessel: &VesselName) -> Result<Option<PathBuf>> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    candidates.sort();

    Ok(candidates.into_iter().find(|path| {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        !name.starts_with(LOCK_FILE_PREFIX)
            && is_spreadsheet(path)
            && name.to_uppercase().contains(vessel.as_str())
    }))
}

/// Temporary per-sheet PDF file name inside the owner PDF folder.
pub fn fragment_file_name(sheet: &str) -> String {
    format!("__temp_{}.pdf", sheet.replace(['/', '\\'], "_"))
}

/// Backup workbook file name: `<source base name>_<sheet>.xlsx`.
pub fn backup_file_name(base_name: &str, sheet: &str) -> String {
    format!("{base_name}_{sheet}.xlsx")
}

fn source_base_name(source: &Path) -> Result<String> {
    source
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            ToolError::InvalidWorkbook(format!("unusable file name {}", source.display()))
        })
}

fn write_backup(
    workbook: &mut OpenWorkbook<'_>,
    sheet: &str,
    base_name: &str,
    paths: &OutputPaths,
    strict: bool,
    writes: &mut Vec<BackupWrite>,
) -> Outcome {
    let bytes = match workbook.isolate_sheet(sheet) {
        Ok(bytes) => bytes,
        Err(err) => return sheet_failure(err, sheet, strict),
    };

    let file_name = backup_file_name(base_name, sheet);
    let mut written = 0;
    for dir in [&paths.backup_dir, &paths.secondary_backup_dir] {
        let destination = dir.join(&file_name);
        let outcome = match fs::write(&destination, &bytes) {
            Ok(()) => {
                written += 1;
                Outcome::Produced
            }
            Err(err) => {
                warn!(sheet, destination = %destination.display(), error = %err, "backup write failed");
                Outcome::Failed(err.to_string())
            }
        };
        writes.push(BackupWrite {
            sheet: sheet.to_string(),
            destination,
            outcome,
        });
    }

    if written > 0 {
        info!(sheet, written, "backup workbook saved");
        Outcome::Produced
    } else {
        Outcome::Failed("backup could not be written to any destination".into())
    }
}

fn sheet_failure(err: ToolError, sheet: &str, strict: bool) -> Outcome {
    match err {
        ToolError::SheetNotFound(_) if !strict => {
            info!(sheet, "sheet not in workbook, skipped");
            Outcome::SkippedNotFound
        }
        other => {
            warn!(sheet, error = %other, "sheet export failed");
            Outcome::Failed(other.to_string())
        }
    }
}

fn remove_fragments(fragments: &[PathBuf]) {
    for fragment in fragments {
        if let Err(err) = fs::remove_file(fragment) {
            warn!(fragment = %fragment.display(), error = %err, "could not remove PDF fragment");
        }
    }
}

fn vessel_status(sheets: &[SheetReport], strict: bool) -> Outcome {
    let failed = sheets.iter().filter(|report| report.outcome.is_failed()).count();
    if strict && failed > 0 {
        return Outcome::Failed(format!("{failed} of {} sheet(s) failed", sheets.len()));
    }
    if sheets.iter().any(|report| report.outcome.is_produced()) {
        Outcome::Produced
    } else if sheets
        .iter()
        .all(|report| report.outcome == Outcome::SkippedNotFound)
    {
        Outcome::SkippedNotFound
    } else {
        Outcome::Failed("no requested sheet produced output".into())
    }
}
