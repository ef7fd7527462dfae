#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;
use vessel_export::engine::{SourceWorkbook, SpreadsheetEngine};
use vessel_export::io::pdf_render;
use vessel_export::owners::OwnerDirectory;
use vessel_export::paths::{FixedCalendar, OutputLayout};
use vessel_export::{Result, ToolError};

pub type SheetData<'a> = (&'a str, Vec<Vec<&'a str>>);

/// Writes a workbook whose sheets hold the given string cells.
pub fn write_workbook(path: &Path, sheets: &[SheetData<'_>]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("sheet name accepted");
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                worksheet
                    .write_string(row_idx as u32, col_idx as u16, *cell)
                    .expect("cell written");
            }
        }
    }
    workbook.save(path).expect("workbook saved");
}

/// Writes a vessel report with the four standard sheets.
pub fn write_vessel_report(path: &Path) {
    write_workbook(
        path,
        &[
            (
                "Reporting Page",
                vec![vec!["Vessel", "Period"], vec!["FRONT CHEETAH", "2025-07"]],
            ),
            ("EUA", vec![vec!["Allowances", "Cost"], vec!["120", "9000"]]),
            ("Fuel EU", vec![vec!["Penalty"], vec!["0"]]),
            ("Backup", vec![vec!["Raw"], vec!["data"]]),
        ],
    );
}

pub fn august_2025() -> FixedCalendar {
    FixedCalendar(NaiveDate::from_ymd_opt(2025, 8, 14).expect("valid date"))
}

pub fn frontline_owners() -> OwnerDirectory {
    OwnerDirectory::from_pairs([
        ("FRONT CHEETAH", "Frontline - Oslo"),
        ("AAL BRISBANE", "AAL Shipping"),
    ])
}

/// Temporary working tree with an input folder and three output roots.
pub struct Workspace {
    pub dir: tempfile::TempDir,
    pub input: PathBuf,
    pub layout: OutputLayout,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temporary directory");
        let input = dir.path().join("input");
        fs::create_dir_all(&input).expect("input folder");
        let layout = OutputLayout {
            pdf_root: dir.path().join("pdf"),
            backup_root: dir.path().join("xls"),
            secondary_backup_root: dir.path().join("secondary"),
        };
        Self { dir, input, layout }
    }

    pub fn month_dir(root: &Path, owner_folder: &str) -> PathBuf {
        root.join("August - 2025").join(owner_folder)
    }

    pub fn pdf_dir(&self, owner_folder: &str) -> PathBuf {
        Self::month_dir(&self.layout.pdf_root, owner_folder)
    }

    pub fn backup_dir(&self, owner_folder: &str) -> PathBuf {
        Self::month_dir(&self.layout.backup_root, owner_folder)
    }

    pub fn secondary_dir(&self, owner_folder: &str) -> PathBuf {
        Self::month_dir(&self.layout.secondary_backup_root, owner_folder)
    }
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Everything the fake engine was asked to do.
#[derive(Debug, Default)]
pub struct EngineLog {
    pub starts: usize,
    pub shutdowns: usize,
    pub opened: Vec<PathBuf>,
    pub closed: usize,
    pub exported: Vec<String>,
}

/// Engine double with scriptable faults.
#[derive(Clone, Default)]
pub struct FakeEngine {
    pub log: Rc<RefCell<EngineLog>>,
    pub sheets: Vec<String>,
    pub fail_start: bool,
    pub fail_open: bool,
    pub failing_sheets: Vec<String>,
    pub corrupt_pdfs: bool,
}

impl FakeEngine {
    pub fn with_sheets(sheets: &[&str]) -> Self {
        Self {
            sheets: sheets.iter().map(|sheet| sheet.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl SpreadsheetEngine for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    fn start(&mut self) -> Result<()> {
        self.log.borrow_mut().starts += 1;
        if self.fail_start {
            return Err(ToolError::Engine("engine refused to start".into()));
        }
        Ok(())
    }

    fn open(&mut self, path: &Path) -> Result<Box<dyn SourceWorkbook>> {
        if self.fail_open {
            return Err(ToolError::Engine(format!("cannot open {}", path.display())));
        }
        self.log.borrow_mut().opened.push(path.to_path_buf());
        Ok(Box::new(FakeWorkbook {
            engine: self.clone(),
        }))
    }

    fn shutdown(&mut self) {
        self.log.borrow_mut().shutdowns += 1;
    }
}

struct FakeWorkbook {
    engine: FakeEngine,
}

impl FakeWorkbook {
    fn check(&self, sheet: &str) -> Result<()> {
        if !self
            .engine
            .sheets
            .iter()
            .any(|known| known.eq_ignore_ascii_case(sheet))
        {
            return Err(ToolError::SheetNotFound(sheet.to_string()));
        }
        if self.engine.failing_sheets.iter().any(|failing| failing == sheet) {
            return Err(ToolError::Engine(format!("export of {sheet} crashed")));
        }
        Ok(())
    }
}

impl SourceWorkbook for FakeWorkbook {
    fn export_sheet_pdf(&mut self, sheet: &str, destination: &Path) -> Result<()> {
        self.check(sheet)?;
        self.engine.log.borrow_mut().exported.push(sheet.to_string());
        if self.engine.corrupt_pdfs {
            fs::write(destination, b"not a pdf")?;
            return Ok(());
        }
        pdf_render::render_sheet(sheet, &[vec![sheet.to_string()]], destination)
    }

    fn isolate_sheet(&mut self, sheet: &str) -> Result<Vec<u8>> {
        self.check(sheet)?;
        Ok(format!("copy of {sheet}").into_bytes())
    }

    fn close(&mut self) {
        self.engine.log.borrow_mut().closed += 1;
    }
}
