use std::collections::HashMap;
use std::path::Path;

use calamine::{DataType, Range};
use tracing::{info, instrument, warn};

use crate::error::{Result, ToolError};
use crate::io::excel_read::{self, cell_to_string};
use crate::model::normalize_key;

/// Where the vessel and owner values live inside the mapping workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerColumns {
    /// Sheet holding the table; the first sheet when `None`.
    pub sheet: Option<String>,
    pub vessel: String,
    pub owner: String,
}

impl Default for OwnerColumns {
    fn default() -> Self {
        Self {
            sheet: None,
            vessel: "Vessel".to_string(),
            owner: "Owner".to_string(),
        }
    }
}

/// Immutable vessel → owner lookup table, built once at start-up.
#[derive(Debug, Clone, Default)]
pub struct OwnerDirectory {
    owners: HashMap<String, String>,
}

impl OwnerDirectory {
    /// Builds a directory from `(vessel, owner)` pairs. Later duplicates win.
    pub fn from_pairs<I, V, O>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, O)>,
        V: AsRef<str>,
        O: Into<String>,
    {
        let owners = pairs
            .into_iter()
            .map(|(vessel, owner)| (normalize_key(vessel.as_ref()), owner.into()))
            .filter(|(vessel, _)| !vessel.is_empty())
            .collect();
        Self { owners }
    }

    /// Loads the mapping table from an Excel workbook whose header row names
    /// the vessel and owner columns. Any failure here is fatal for the run.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path, columns: &OwnerColumns) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let mut workbook = excel_read::open_source(path)?;
        let (sheet, range) = match &columns.sheet {
            Some(name) => excel_read::read_sheet(&mut workbook, name)?,
            None => excel_read::read_first_sheet(&mut workbook)?,
        };
        let directory = Self::from_range(&range, columns)
            .map_err(|err| ToolError::InvalidWorkbook(format!("sheet '{sheet}': {err}")))?;
        info!(vessels = directory.len(), sheet = %sheet, "owner map loaded");
        Ok(directory)
    }

    fn from_range(range: &Range<DataType>, columns: &OwnerColumns) -> std::result::Result<Self, String> {
        let mut rows = range.rows();
        let header: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(|cell| cell_to_string(Some(cell))).collect())
            .unwrap_or_default();

        let vessel_idx = column_index(&header, &columns.vessel)?;
        let owner_idx = column_index(&header, &columns.owner)?;

        let mut pairs = Vec::new();
        for row in rows {
            let vessel = cell_to_string(row.get(vessel_idx));
            let owner = cell_to_string(row.get(owner_idx));
            if vessel.trim().is_empty() {
                continue;
            }
            if owner.trim().is_empty() {
                warn!(vessel = %vessel.trim(), "owner map row without owner, skipped");
                continue;
            }
            pairs.push((vessel, owner));
        }
        Ok(Self::from_pairs(pairs))
    }

    /// Returns the stored owner for `vessel`, or `vessel` itself when the
    /// table has no entry. Matching ignores case and surrounding whitespace.
    pub fn lookup<'a>(&'a self, vessel: &'a str) -> &'a str {
        self.owners
            .get(&normalize_key(vessel))
            .map(String::as_str)
            .unwrap_or(vessel)
    }

    pub fn contains(&self, vessel: &str) -> bool {
        self.owners.contains_key(&normalize_key(vessel))
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

fn column_index(header: &[String], name: &str) -> std::result::Result<usize, String> {
    header
        .iter()
        .position(|cell| cell.trim().eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| format!("missing '{name}' column"))
}
