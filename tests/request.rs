use vessel_export::model::VesselName;
use vessel_export::request::{
    ExportCategory, parse_menu_selection, parse_vessel_list, sheets_for, sheets_for_ids,
};

#[test]
fn all_expands_to_every_sheet() {
    assert_eq!(
        sheets_for(&[ExportCategory::Eua, ExportCategory::All]),
        vec!["Reporting Page", "EUA", "Fuel EU", "Backup"]
    );
}

#[test]
fn categories_keep_first_occurrence_order() {
    assert_eq!(
        sheets_for(&[
            ExportCategory::Backup,
            ExportCategory::Reporting,
            ExportCategory::Backup,
        ]),
        vec!["Backup", "Reporting Page"]
    );
}

#[test]
fn identifiers_translate_and_unknown_ones_are_dropped() {
    assert_eq!(
        sheets_for_ids(&["reporting", "fuel-eu", "bogus"]),
        vec!["Reporting Page", "Fuel EU"]
    );
    assert!(sheets_for_ids(&["nothing"]).is_empty());
    assert_eq!("FUEL-EU".parse::<ExportCategory>(), Ok(ExportCategory::FuelEu));
    assert!("fuel eu".parse::<ExportCategory>().is_err());
}

#[test]
fn vessel_list_is_normalised() {
    let vessels = parse_vessel_list(" front cheetah, AAL Brisbane ,, ");

    let names: Vec<&str> = vessels.iter().map(VesselName::as_str).collect();
    assert_eq!(names, vec!["FRONT CHEETAH", "AAL BRISBANE"]);
}

#[test]
fn blank_vessel_name_is_rejected() {
    assert!(VesselName::new("   ").is_none());
    assert_eq!(
        VesselName::new(" nordic ").map(|name| name.to_string()),
        Some("NORDIC".to_string())
    );
}

#[test]
fn menu_selection_maps_numbers() {
    assert_eq!(
        parse_menu_selection("1, 2"),
        vec![ExportCategory::Reporting, ExportCategory::Eua]
    );
    assert_eq!(
        parse_menu_selection("3,9,4"),
        vec![ExportCategory::FuelEu, ExportCategory::Backup]
    );
    assert_eq!(parse_menu_selection("1,5"), vec![ExportCategory::All]);
    assert!(parse_menu_selection("").is_empty());
}
