use tracing::{info, instrument};

use crate::engine::SpreadsheetEngine;
use crate::error::{Result, ToolError};
use crate::export::VesselExporter;
use crate::model::{BatchSummary, VesselName};

/// Rejects empty requests before any filesystem or engine work happens.
pub fn ensure_valid_input(vessels: &[VesselName], sheets: &[String]) -> Result<()> {
    if vessels.is_empty() {
        return Err(ToolError::NoValidInput("no vessel names provided".into()));
    }
    if sheets.iter().all(|sheet| sheet.trim().is_empty()) {
        return Err(ToolError::NoValidInput("no sheets selected".into()));
    }
    Ok(())
}

/// Exports every vessel in order, one engine session at a time. A failing
/// vessel never stops the batch; only empty input is an error.
#[instrument(level = "info", skip_all, fields(vessels = vessels.len(), sheets = sheets.len()))]
pub fn run_batch<E: SpreadsheetEngine>(
    exporter: &mut VesselExporter<'_, E>,
    vessels: &[VesselName],
    sheets: &[String],
) -> Result<BatchSummary> {
    ensure_valid_input(vessels, sheets)?;

    let mut summary = BatchSummary::new();
    for (index, vessel) in vessels.iter().enumerate() {
        info!(vessel = %vessel, position = index + 1, total = vessels.len(), "processing vessel");
        let result = exporter.export_vessel(vessel, sheets);
        info!(vessel = %vessel, status = %result.status, "vessel processed");
        summary.record(result);
    }

    summary.log_summary();
    Ok(summary)
}
