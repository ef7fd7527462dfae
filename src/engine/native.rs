use std::path::{Path, PathBuf};

use crate::engine::{SourceWorkbook, SpreadsheetEngine};
use crate::error::{Result, ToolError};
use crate::io::excel_read::{self, SourceReader};
use crate::io::{excel_write, pdf_render};

/// In-process engine: reads with calamine, writes sheet copies with
/// rust_xlsxwriter, and renders sheets to PDF with lopdf.
#[derive(Debug, Default)]
pub struct NativeEngine {
    running: bool,
}

impl NativeEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpreadsheetEngine for NativeEngine {
    fn name(&self) -> &str {
        "native"
    }

    fn start(&mut self) -> Result<()> {
        self.running = true;
        Ok(())
    }

    fn open(&mut self, path: &Path) -> Result<Box<dyn SourceWorkbook>> {
        if !self.running {
            return Err(ToolError::Engine("engine not started".into()));
        }
        let reader = excel_read::open_source(path)?;
        Ok(Box::new(NativeWorkbook {
            path: path.to_path_buf(),
            reader: Some(reader),
        }))
    }

    fn shutdown(&mut self) {
        self.running = false;
    }
}

struct NativeWorkbook {
    path: PathBuf,
    reader: Option<SourceReader>,
}

impl NativeWorkbook {
    fn reader(&mut self) -> Result<&mut SourceReader> {
        let path = &self.path;
        self.reader
            .as_mut()
            .ok_or_else(|| ToolError::Engine(format!("workbook {} already closed", path.display())))
    }
}

impl SourceWorkbook for NativeWorkbook {
    fn export_sheet_pdf(&mut self, sheet: &str, destination: &Path) -> Result<()> {
        let (name, range) = excel_read::read_sheet(self.reader()?, sheet)?;
        let rows = excel_read::range_to_text(&range);
        pdf_render::render_sheet(&name, &rows, destination)
    }

    fn isolate_sheet(&mut self, sheet: &str) -> Result<Vec<u8>> {
        let (name, range) = excel_read::read_sheet(self.reader()?, sheet)?;
        excel_write::isolate_sheet(&name, &range)
    }

    fn close(&mut self) {
        self.reader = None;
    }
}
