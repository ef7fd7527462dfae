mod common;

use common::write_workbook;
use tempfile::tempdir;
use vessel_export::ToolError;
use vessel_export::owners::{OwnerColumns, OwnerDirectory};

#[test]
fn lookup_ignores_case_and_surrounding_whitespace() {
    let owners = OwnerDirectory::from_pairs([("  Front Cheetah ", "Frontline - Oslo")]);

    assert_eq!(owners.lookup("FRONT CHEETAH"), "Frontline - Oslo");
    assert_eq!(owners.lookup("front cheetah"), "Frontline - Oslo");
    assert_eq!(owners.lookup("  Front Cheetah\t"), "Frontline - Oslo");
    assert!(owners.contains("front cheetah"));
}

#[test]
fn unknown_vessel_falls_back_to_its_own_name() {
    let owners = OwnerDirectory::from_pairs([("FRONT CHEETAH", "Frontline - Oslo")]);

    assert_eq!(owners.lookup("NORDIC ZENITH"), "NORDIC ZENITH");
    assert_eq!(owners.lookup("nordic zenith "), "nordic zenith ");
    assert!(!owners.contains("NORDIC ZENITH"));
}

#[test]
fn later_duplicate_rows_win() {
    let owners = OwnerDirectory::from_pairs([
        ("AAL BRISBANE", "Old Owner"),
        ("aal brisbane", "AAL Shipping"),
    ]);

    assert_eq!(owners.len(), 1);
    assert_eq!(owners.lookup("AAL BRISBANE"), "AAL Shipping");
}

#[test]
fn loads_mapping_from_workbook_header_columns() {
    let dir = tempdir().expect("temporary directory");
    let path = dir.path().join("Vessel and Owner.xlsx");
    write_workbook(
        &path,
        &[(
            "Owners",
            vec![
                vec!["IMO", "vessel", "Owner"],
                vec!["9000001", "front cheetah ", "Frontline - Oslo"],
                vec!["9000002", "AAL BRISBANE", "AAL Shipping"],
                vec!["9000003", "", "Nobody"],
                vec!["9000004", "ORPHAN", ""],
            ],
        )],
    );

    let owners = OwnerDirectory::load(&path, &OwnerColumns::default()).expect("owner map loads");

    assert_eq!(owners.len(), 2);
    assert_eq!(owners.lookup("FRONT CHEETAH"), "Frontline - Oslo");
    assert_eq!(owners.lookup("aal brisbane"), "AAL Shipping");
    assert_eq!(owners.lookup("ORPHAN"), "ORPHAN");
}

#[test]
fn reads_configured_sheet_and_columns() {
    let dir = tempdir().expect("temporary directory");
    let path = dir.path().join("fleet.xlsx");
    write_workbook(
        &path,
        &[
            ("Notes", vec![vec!["nothing here"]]),
            (
                "Fleet",
                vec![vec!["Ship", "Manager"], vec!["FRONT CHEETAH", "Frontline - Oslo"]],
            ),
        ],
    );
    let columns = OwnerColumns {
        sheet: Some("fleet".to_string()),
        vessel: "Ship".to_string(),
        owner: "Manager".to_string(),
    };

    let owners = OwnerDirectory::load(&path, &columns).expect("owner map loads");

    assert_eq!(owners.lookup("front cheetah"), "Frontline - Oslo");
}

#[test]
fn missing_owner_column_is_fatal() {
    let dir = tempdir().expect("temporary directory");
    let path = dir.path().join("owners.xlsx");
    write_workbook(
        &path,
        &[("Sheet1", vec![vec!["Vessel", "Manager"], vec!["A", "B"]])],
    );

    let error = OwnerDirectory::load(&path, &OwnerColumns::default()).unwrap_err();

    match error {
        ToolError::InvalidWorkbook(message) => assert!(message.contains("'Owner'")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_mapping_file_is_reported() {
    let dir = tempdir().expect("temporary directory");
    let path = dir.path().join("absent.xlsx");

    let error = OwnerDirectory::load(&path, &OwnerColumns::default()).unwrap_err();

    assert!(matches!(error, ToolError::MissingInput(missing) if missing == path));
}
