//! Core library for the vessel-export command line application.
//!
//! For each requested vessel the library finds its source workbook, resolves
//! the owner and the month-partitioned output folders, renders the reporting
//! sheets into one merged PDF, and writes the backup sheet as a standalone
//! workbook to two backup locations. IO adapters live under [`io`], the
//! spreadsheet-engine capability under [`engine`], per-vessel orchestration in
//! [`export`], and the batch loop in [`batch`].

pub mod batch;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod io;
pub mod logging;
pub mod model;
pub mod owners;
pub mod paths;
pub mod request;

pub use error::{Result, ToolError};
