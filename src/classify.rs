use crate::model::SheetTreatment;

/// Reserved sheet name selecting workbook export instead of PDF rendering.
pub const BACKUP_SHEET: &str = "backup";

/// Treatment a single sheet name selects.
pub fn treatment_of(sheet: &str) -> SheetTreatment {
    if sheet.to_lowercase() == BACKUP_SHEET {
        SheetTreatment::Workbook
    } else {
        SheetTreatment::Pdf
    }
}

/// Sheet names split by treatment, each list in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub pdf: Vec<String>,
    pub backup: Vec<String>,
}

/// Partitions requested sheet names into PDF and backup lists. Existence in
/// the source workbook is checked later, during export.
pub fn classify<S: AsRef<str>>(requested: &[S]) -> Classified {
    let mut classified = Classified::default();
    for sheet in requested {
        let sheet = sheet.as_ref();
        match treatment_of(sheet) {
            SheetTreatment::Pdf => classified.pdf.push(sheet.to_string()),
            SheetTreatment::Workbook => classified.backup.push(sheet.to_string()),
        }
    }
    classified
}
