//! Spreadsheet-engine capability.
//!
//! The orchestrator never talks to an engine directly. It acquires an
//! [`EngineSession`], which first clears stray engine processes and is shut
//! down when dropped, and opens source files through it as [`OpenWorkbook`]
//! guards, which are closed without saving when dropped. Both releases run on
//! every exit path, including early returns and unwinding.

mod native;
mod supervisor;

use std::marker::PhantomData;
use std::path::Path;

pub use native::NativeEngine;
pub use supervisor::ProcessSupervisor;

use crate::error::Result;

/// An engine able to open source workbooks.
pub trait SpreadsheetEngine {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Brings the engine up. Called once per session.
    fn start(&mut self) -> Result<()>;

    /// Opens a source workbook read-only.
    fn open(&mut self, path: &Path) -> Result<Box<dyn SourceWorkbook>>;

    /// Releases the engine. Must tolerate being called after a failed start.
    fn shutdown(&mut self);
}

/// Operations on an opened source workbook. Sheet lookups that miss return
/// [`ToolError::SheetNotFound`](crate::ToolError::SheetNotFound).
pub trait SourceWorkbook {
    /// Renders one sheet to a fixed-format (PDF) file.
    fn export_sheet_pdf(&mut self, sheet: &str, destination: &Path) -> Result<()>;

    /// Copies one sheet into a new standalone workbook and returns its bytes.
    fn isolate_sheet(&mut self, sheet: &str) -> Result<Vec<u8>>;

    /// Closes the workbook, discarding any change.
    fn close(&mut self);
}

/// Exclusive handle on an engine for the processing of one vessel.
pub struct EngineSession<'e, E: SpreadsheetEngine + ?Sized> {
    engine: &'e mut E,
}

impl<'e, E: SpreadsheetEngine + ?Sized> EngineSession<'e, E> {
    /// Terminates stray engine processes, then starts the engine.
    pub fn acquire(engine: &'e mut E, supervisor: &ProcessSupervisor) -> Result<Self> {
        supervisor.terminate_strays();
        if let Err(err) = engine.start() {
            engine.shutdown();
            return Err(err);
        }
        tracing::debug!(engine = engine.name(), "engine session acquired");
        Ok(Self { engine })
    }

    /// Opens a workbook bound to this session's lifetime.
    pub fn open(&mut self, path: &Path) -> Result<OpenWorkbook<'_>> {
        let inner = self.engine.open(path)?;
        Ok(OpenWorkbook {
            inner,
            _session: PhantomData,
        })
    }
}

impl<E: SpreadsheetEngine + ?Sized> Drop for EngineSession<'_, E> {
    fn drop(&mut self) {
        self.engine.shutdown();
        tracing::debug!(engine = self.engine.name(), "engine session released");
    }
}

/// A source workbook that is closed without saving when dropped.
pub struct OpenWorkbook<'s> {
    inner: Box<dyn SourceWorkbook>,
    _session: PhantomData<&'s mut ()>,
}

impl OpenWorkbook<'_> {
    pub fn export_sheet_pdf(&mut self, sheet: &str, destination: &Path) -> Result<()> {
        self.inner.export_sheet_pdf(sheet, destination)
    }

    pub fn isolate_sheet(&mut self, sheet: &str) -> Result<Vec<u8>> {
        self.inner.isolate_sheet(sheet)
    }
}

impl Drop for OpenWorkbook<'_> {
    fn drop(&mut self) {
        self.inner.close();
    }
}
