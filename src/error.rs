use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur while the
/// tool loads its configuration, reads source workbooks, or writes artifacts.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the batch summary cannot be serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the configuration file is not valid TOML.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a PDF fragment cannot be produced, parsed, or merged.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Raised when the configuration is missing values or fails validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// Raised when a workbook does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a requested sheet does not exist in the opened workbook.
    #[error("sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    /// Raised when the merger is invoked without any fragment.
    #[error("cannot merge an empty list of PDF fragments")]
    EmptyMerge,

    /// Raised when a batch is requested without vessels or sheets.
    #[error("no valid input: {0}")]
    NoValidInput(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the spreadsheet engine cannot be started or used.
    #[error("spreadsheet engine error: {0}")]
    Engine(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
