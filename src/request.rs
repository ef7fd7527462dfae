//! Translation of user-facing requests into vessel names and literal sheet
//! names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::VesselName;

pub const REPORTING_SHEET: &str = "Reporting Page";
pub const EUA_SHEET: &str = "EUA";
pub const FUEL_EU_SHEET: &str = "Fuel EU";
pub const BACKUP_SHEET_NAME: &str = "Backup";

/// Output categories a caller may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportCategory {
    Reporting,
    Eua,
    FuelEu,
    Backup,
    All,
}

impl ExportCategory {
    /// Every concrete category, in the order `all` expands to.
    pub const CONCRETE: [ExportCategory; 4] = [
        ExportCategory::Reporting,
        ExportCategory::Eua,
        ExportCategory::FuelEu,
        ExportCategory::Backup,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ExportCategory::Reporting => "reporting",
            ExportCategory::Eua => "eua",
            ExportCategory::FuelEu => "fuel-eu",
            ExportCategory::Backup => "backup",
            ExportCategory::All => "all",
        }
    }

    /// Literal sheet name for a concrete category; `None` for `All`.
    pub fn sheet_name(self) -> Option<&'static str> {
        match self {
            ExportCategory::Reporting => Some(REPORTING_SHEET),
            ExportCategory::Eua => Some(EUA_SHEET),
            ExportCategory::FuelEu => Some(FUEL_EU_SHEET),
            ExportCategory::Backup => Some(BACKUP_SHEET_NAME),
            ExportCategory::All => None,
        }
    }
}

impl fmt::Display for ExportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ExportCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::CONCRETE
            .into_iter()
            .chain([ExportCategory::All])
            .find(|category| category.id().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown export category '{value}'"))
    }
}

/// Expands categories into literal sheet names. `All` yields the full set;
/// otherwise the first occurrence of each category decides its position.
pub fn sheets_for(categories: &[ExportCategory]) -> Vec<String> {
    if categories.contains(&ExportCategory::All) {
        return ExportCategory::CONCRETE
            .iter()
            .filter_map(|category| category.sheet_name())
            .map(str::to_string)
            .collect();
    }

    let mut sheets: Vec<String> = Vec::new();
    for name in categories.iter().filter_map(|category| category.sheet_name()) {
        if !sheets.iter().any(|existing| existing == name) {
            sheets.push(name.to_string());
        }
    }
    sheets
}

/// Same as [`sheets_for`] but from category identifiers; unknown identifiers
/// are ignored.
pub fn sheets_for_ids<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    let categories: Vec<ExportCategory> = ids
        .iter()
        .filter_map(|id| id.as_ref().parse().ok())
        .collect();
    sheets_for(&categories)
}

/// Splits comma-separated vessel input into normalised names, dropping
/// empty entries.
pub fn parse_vessel_list(input: &str) -> Vec<VesselName> {
    input.split(',').filter_map(VesselName::new).collect()
}

/// Menu printed by the interactive prompt.
pub const MENU: &str = "\
1. Reporting Page
2. EUA
3. Fuel EU
4. Backup (saved as Excel)
5. All (Reporting Page + EUA + Fuel EU + Backup)";

/// Parses comma-separated menu numbers. Any `5` selects everything; unknown
/// numbers are ignored.
pub fn parse_menu_selection(input: &str) -> Vec<ExportCategory> {
    let choices: Vec<&str> = input.split(',').map(str::trim).collect();
    if choices.contains(&"5") {
        return vec![ExportCategory::All];
    }
    choices
        .into_iter()
        .filter_map(|choice| match choice {
            "1" => Some(ExportCategory::Reporting),
            "2" => Some(ExportCategory::Eua),
            "3" => Some(ExportCategory::FuelEu),
            "4" => Some(ExportCategory::Backup),
            _ => None,
        })
        .collect()
}
