//! CSV import reconciliation
//!
//! Takes a raw byte stream and populates or extends the catalog: the
//! vehicle/place chain of every row is resolved by case-insensitive name
//! (creating missing parents appended at the end of their sibling order)
//! and items append in file order. The whole file commits in a single
//! transaction; a rejected header commits nothing.
//!
//! Two header shapes are accepted, with the Danish column names of the
//! original fire-department deployment as synonyms:
//! `Vehicle,Place,Item,Quantity,Note` and `Place,Item,Quantity,Note`.
//! Items are never merged with existing rows, so re-importing a file
//! duplicates its items; places are reused by name within their vehicle.

use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use thiserror::Error;

use crate::core::auth::AuthContext;
use crate::core::store::{queries, CatalogStore, StoreError};

/// Vehicle name used when neither the file nor the caller names one
pub const DEFAULT_VEHICLE_NAME: &str = "Untitled";

const VEHICLE_SYNONYMS: &[&str] = &["vehicle", "brandbil"];
const PLACE_SYNONYMS: &[&str] = &["place", "rum/låge"];
const ITEM_SYNONYMS: &[&str] = &["item", "udstyr"];
const QUANTITY_SYNONYMS: &[&str] = &["quantity", "antal"];
const NOTE_SYNONYMS: &[&str] = &["note"];

/// Options controlling one import run
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Vehicle context: receives 4-column files and rows with a blank
    /// vehicle cell
    pub vehicle: Option<String>,
    /// Field delimiter; auto-detected from the header line when `None`
    /// (`;` wins over `,` when both appear)
    pub delimiter: Option<u8>,
    /// Run the full pipeline, then roll back instead of committing
    pub dry_run: bool,
    /// Fallback vehicle name, typically derived from the file name
    pub fallback_vehicle: Option<String>,
}

/// A row that was skipped, with the 1-based row number and the reason
#[derive(Debug, Clone)]
pub struct RowSkip {
    pub row: usize,
    pub reason: String,
}

/// What one import run did
#[derive(Debug, Default)]
pub struct ImportReport {
    pub rows_processed: usize,
    pub vehicles_created: usize,
    pub places_created: usize,
    pub items_created: usize,
    pub skipped: Vec<RowSkip>,
    /// False after a dry run
    pub committed: bool,
}

/// Errors that abort an import before or during processing
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("empty file")]
    Empty,

    #[error(
        "unrecognized header [{0}]: expected 'Vehicle,Place,Item,Quantity,Note' \
         or 'Place,Item,Quantity,Note' (Danish synonyms accepted)"
    )]
    Header(String),

    #[error("CSV error: {0}")]
    Malformed(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The two accepted column layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderShape {
    /// `[Vehicle, Place, Item, Quantity, Note]` - vehicle read per row
    WithVehicle,
    /// `[Place, Item, Quantity, Note]` - vehicle taken from context
    PlaceFirst,
}

/// Decode import bytes: UTF-8 with BOM tolerance, Latin-1 fallback for
/// legacy spreadsheet exports.
fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Pick the delimiter from the header line; `;` wins over `,` when both
/// are plausible (European spreadsheet exports).
fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > 0 && semicolons >= commas {
        b';'
    } else {
        b','
    }
}

fn column_matches(cell: &str, synonyms: &[&str]) -> bool {
    let cell = cell.trim().to_lowercase();
    synonyms.iter().any(|synonym| cell == *synonym)
}

fn detect_shape(header: &StringRecord) -> Option<HeaderShape> {
    let cells: Vec<&str> = header.iter().collect();
    match cells.as_slice() {
        [vehicle, place, item, quantity, note]
            if column_matches(vehicle, VEHICLE_SYNONYMS)
                && column_matches(place, PLACE_SYNONYMS)
                && column_matches(item, ITEM_SYNONYMS)
                && column_matches(quantity, QUANTITY_SYNONYMS)
                && column_matches(note, NOTE_SYNONYMS) =>
        {
            Some(HeaderShape::WithVehicle)
        }
        [place, item, quantity, note]
            if column_matches(place, PLACE_SYNONYMS)
                && column_matches(item, ITEM_SYNONYMS)
                && column_matches(quantity, QUANTITY_SYNONYMS)
                && column_matches(note, NOTE_SYNONYMS) =>
        {
            Some(HeaderShape::PlaceFirst)
        }
        _ => None,
    }
}

/// Quantity is a non-negative integer; blank or garbage defaults to 1
fn parse_quantity(raw: &str) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 0 => n,
        _ => 1,
    }
}

/// Import a CSV byte stream into the catalog.
///
/// Either every valid row commits or (bad header, storage failure)
/// nothing does. Row-level skips are collected as diagnostics, never
/// partial errors.
pub fn import(
    store: &mut CatalogStore,
    auth: &AuthContext,
    bytes: &[u8],
    options: &ImportOptions,
) -> Result<ImportReport, ImportError> {
    let text = decode(bytes);
    if text.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    let delimiter = options.delimiter.unwrap_or_else(|| detect_delimiter(&text));
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ImportError::Malformed(e.to_string()))?
        .clone();
    let shape = detect_shape(&headers)
        .ok_or_else(|| ImportError::Header(headers.iter().collect::<Vec<_>>().join(",")))?;

    let mut report = ImportReport::default();
    let tx = store.transaction()?;

    // Name caches so rows created earlier in this same import resolve
    // without re-querying; keys are lowercased.
    let mut vehicles: HashMap<String, i64> = HashMap::new();
    let mut places: HashMap<(i64, String), i64> = HashMap::new();

    for (index, record) in reader.records().enumerate() {
        let row = index + 2; // 1-indexed plus the header row
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                report.rows_processed += 1;
                report.skipped.push(RowSkip {
                    row,
                    reason: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };
        report.rows_processed += 1;

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let (vehicle_cell, place_cell, item_cell, quantity_cell, note_cell) = match shape {
            HeaderShape::WithVehicle => (
                record.get(0),
                record.get(1),
                record.get(2),
                record.get(3),
                record.get(4),
            ),
            HeaderShape::PlaceFirst => (
                None,
                record.get(0),
                record.get(1),
                record.get(2),
                record.get(3),
            ),
        };

        let place_name = place_cell.unwrap_or("").trim();
        let item_name = item_cell.unwrap_or("").trim();
        if place_name.is_empty() || item_name.is_empty() {
            report.skipped.push(RowSkip {
                row,
                reason: "blank place or item".into(),
            });
            continue;
        }

        // Vehicle: the row's own cell, then the caller's context, then the
        // file-derived fallback.
        let vehicle_name = vehicle_cell
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .map(str::to_string)
            .or_else(|| options.vehicle.clone())
            .or_else(|| options.fallback_vehicle.clone())
            .unwrap_or_else(|| DEFAULT_VEHICLE_NAME.to_string());

        let vehicle_key = vehicle_name.to_lowercase();
        let vehicle_id = match vehicles.get(&vehicle_key) {
            Some(&id) => id,
            None => {
                let id = match queries::vehicle_id_by_name(&tx, &vehicle_name)? {
                    Some(id) => id,
                    None => {
                        report.vehicles_created += 1;
                        queries::insert_vehicle(&tx, &vehicle_name, "")?
                    }
                };
                vehicles.insert(vehicle_key, id);
                id
            }
        };

        let place_key = (vehicle_id, place_name.to_lowercase());
        let place_id = match places.get(&place_key) {
            Some(&id) => id,
            None => {
                let id = match queries::place_id_by_name(&tx, vehicle_id, place_name)? {
                    Some(id) => id,
                    None => {
                        report.places_created += 1;
                        queries::insert_place(&tx, vehicle_id, place_name)?
                    }
                };
                places.insert(place_key, id);
                id
            }
        };

        let quantity = parse_quantity(quantity_cell.unwrap_or(""));
        let note = note_cell.unwrap_or("").trim();
        queries::insert_item(&tx, place_id, item_name, quantity, note)?;
        report.items_created += 1;
    }

    if options.dry_run {
        // Dropping the transaction rolls everything back
        report.committed = false;
    } else {
        queries::record_audit(
            &tx,
            auth,
            "import",
            &format!(
                "{} items, {} places, {} vehicles created",
                report.items_created, report.places_created, report.vehicles_created
            ),
        )?;
        tx.commit().map_err(StoreError::from)?;
        report.committed = true;
    }

    Ok(report)
}

/// Suggested export file name for a vehicle (`<name>_packlist.csv`)
pub fn export_filename(vehicle_name: &str) -> String {
    let slug: String = vehicle_name
        .trim()
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { '_' })
        .collect();
    format!("{slug}_packlist.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::CatalogStore;

    fn fixture() -> (CatalogStore, AuthContext) {
        (
            CatalogStore::open_in_memory().unwrap(),
            AuthContext::new("tester"),
        )
    }

    fn context(vehicle: &str) -> ImportOptions {
        ImportOptions {
            vehicle: Some(vehicle.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_four_column_import_into_vehicle_context() {
        let (mut store, auth) = fixture();
        let csv = "Place,Item,Quantity,Note\n\
                   Cab,Flashlight,2,\n\
                   Cab,Gloves,,\n";

        let report = import(&mut store, &auth, csv.as_bytes(), &context("Engine 7")).unwrap();
        assert!(report.committed);
        assert_eq!(report.items_created, 2);
        assert_eq!(report.places_created, 1);
        assert_eq!(report.vehicles_created, 1);

        let vehicle = store.vehicle_by_name("Engine 7").unwrap();
        let places = store.list_places(vehicle.id).unwrap();
        assert_eq!(places.len(), 1);
        let items = store.list_items(places[0].id).unwrap();
        let view: Vec<(String, i64)> = items.into_iter().map(|i| (i.name, i.quantity)).collect();
        assert_eq!(
            view,
            [
                ("Flashlight".to_string(), 2),
                ("Gloves".to_string(), 1), // blank quantity defaults to 1
            ]
        );
    }

    #[test]
    fn test_five_column_import_reads_vehicle_per_row() {
        let (mut store, auth) = fixture();
        let csv = "Vehicle,Place,Item,Quantity,Note\n\
                   Engine 7,Cab,Flashlight,2,spare batteries\n\
                   Ladder 2,Bucket,Harness,4,\n\
                   ,Cab,Radio,1,\n";

        let options = ImportOptions {
            vehicle: Some("Engine 7".to_string()),
            ..Default::default()
        };
        let report = import(&mut store, &auth, csv.as_bytes(), &options).unwrap();
        assert_eq!(report.vehicles_created, 2);
        assert_eq!(report.items_created, 3);

        // The blank vehicle cell fell back to the context vehicle
        let engine = store.vehicle_by_name("Engine 7").unwrap();
        let cab = store.list_places(engine.id).unwrap();
        assert_eq!(cab.len(), 1);
        assert_eq!(store.list_items(cab[0].id).unwrap().len(), 2);
    }

    #[test]
    fn test_danish_headers_with_semicolons_and_latin1() {
        let (mut store, auth) = fixture();
        // "Brandbil;Rum/Låge;Udstyr;Antal;Note" with Latin-1 'å' (0xE5)
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"Brandbil;Rum/L");
        bytes.push(0xE5);
        bytes.extend_from_slice(b"ge;Udstyr;Antal;Note\n");
        bytes.extend_from_slice(b"Spr");
        bytes.push(0xF8); // 'ø'
        bytes.extend_from_slice(b"jte 1;Kabine;Lygte;2;\n");

        let report = import(&mut store, &auth, &bytes, &ImportOptions::default()).unwrap();
        assert_eq!(report.items_created, 1);

        let vehicle = store.vehicle_by_name("Sprøjte 1").unwrap();
        let places = store.list_places(vehicle.id).unwrap();
        assert_eq!(places[0].name, "Kabine");
    }

    #[test]
    fn test_utf8_bom_is_tolerated() {
        let (mut store, auth) = fixture();
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(b"Place,Item,Quantity,Note\nCab,Axe,1,\n");

        let report = import(&mut store, &auth, &bytes, &context("Engine 7")).unwrap();
        assert_eq!(report.items_created, 1);
    }

    #[test]
    fn test_bad_header_rejects_whole_file() {
        let (mut store, auth) = fixture();
        let csv = "Foo,Bar\nCab,Flashlight\n";

        let err = import(&mut store, &auth, csv.as_bytes(), &ImportOptions::default())
            .unwrap_err();
        assert!(matches!(err, ImportError::Header(_)));
        assert!(store.list_vehicles().unwrap().is_empty());
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let (mut store, auth) = fixture();
        let err = import(&mut store, &auth, b"  \n ", &ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::Empty));
    }

    #[test]
    fn test_blank_required_columns_skip_with_diagnostics() {
        let (mut store, auth) = fixture();
        let csv = "Place,Item,Quantity,Note\n\
                   ,Flashlight,1,\n\
                   Cab,,1,\n\
                   Cab,Gloves,1,\n";

        let report = import(&mut store, &auth, csv.as_bytes(), &context("Engine 7")).unwrap();
        assert_eq!(report.items_created, 1);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].row, 2);
        assert_eq!(report.skipped[1].row, 3);
    }

    #[test]
    fn test_places_reused_case_insensitively_items_always_appended() {
        let (mut store, auth) = fixture();
        let csv = "Place,Item,Quantity,Note\n\
                   Cab,Flashlight,1,\n\
                   CAB,Flashlight,1,\n";

        let report = import(&mut store, &auth, csv.as_bytes(), &context("Engine 7")).unwrap();
        assert_eq!(report.places_created, 1);
        assert_eq!(report.items_created, 2);

        let vehicle = store.vehicle_by_name("Engine 7").unwrap();
        let places = store.list_places(vehicle.id).unwrap();
        assert_eq!(places.len(), 1);
        // Same-named items coexist; they are never merged
        assert_eq!(store.list_items(places[0].id).unwrap().len(), 2);
    }

    #[test]
    fn test_reimport_duplicates_items() {
        let (mut store, auth) = fixture();
        let csv = "Place,Item,Quantity,Note\nCab,Flashlight,1,\n";

        import(&mut store, &auth, csv.as_bytes(), &context("Engine 7")).unwrap();
        import(&mut store, &auth, csv.as_bytes(), &context("Engine 7")).unwrap();

        let vehicle = store.vehicle_by_name("Engine 7").unwrap();
        let places = store.list_places(vehicle.id).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(store.list_items(places[0].id).unwrap().len(), 2);
    }

    #[test]
    fn test_existing_vehicle_is_extended_not_replaced() {
        let (mut store, auth) = fixture();
        let vehicle = store.create_vehicle(&auth, "Engine 7", "").unwrap();
        let cab = store.create_place(&auth, vehicle.id, "Cab").unwrap();
        store.create_item(&auth, cab.id, "Radio", 1, "").unwrap();

        let csv = "Place,Item,Quantity,Note\ncab,Flashlight,1,\n";
        let report = import(&mut store, &auth, csv.as_bytes(), &context("Engine 7")).unwrap();
        assert_eq!(report.vehicles_created, 0);
        assert_eq!(report.places_created, 0);

        let items = store.list_items(cab.id).unwrap();
        let names: Vec<String> = items.into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["Radio", "Flashlight"]);
    }

    #[test]
    fn test_dry_run_commits_nothing() {
        let (mut store, auth) = fixture();
        let csv = "Place,Item,Quantity,Note\nCab,Flashlight,1,\n";
        let options = ImportOptions {
            vehicle: Some("Engine 7".to_string()),
            dry_run: true,
            ..Default::default()
        };

        let report = import(&mut store, &auth, csv.as_bytes(), &options).unwrap();
        assert!(!report.committed);
        assert_eq!(report.items_created, 1);
        assert!(store.list_vehicles().unwrap().is_empty());
    }

    #[test]
    fn test_quantity_defaults_on_garbage() {
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("zwei"), 1);
        assert_eq!(parse_quantity("-4"), 1);
        assert_eq!(parse_quantity("0"), 0);
        assert_eq!(parse_quantity(" 12 "), 12);
    }

    #[test]
    fn test_delimiter_detection_prefers_semicolon() {
        assert_eq!(detect_delimiter("Place;Item;Quantity;Note\n"), b';');
        assert_eq!(detect_delimiter("Place,Item,Quantity,Note\n"), b',');
        // Both plausible: the semicolon wins
        assert_eq!(detect_delimiter("Rum/Låge;Udstyr;Antal;Note,x\n"), b';');
    }

    #[test]
    fn test_fallback_vehicle_comes_from_file_name() {
        let (mut store, auth) = fixture();
        let csv = "Place,Item,Quantity,Note\nCab,Axe,1,\n";
        let options = ImportOptions {
            fallback_vehicle: Some("pumper-3".to_string()),
            ..Default::default()
        };

        import(&mut store, &auth, csv.as_bytes(), &options).unwrap();
        assert!(store.vehicle_by_name("pumper-3").is_ok());
    }

    #[test]
    fn test_export_filename_slug() {
        assert_eq!(export_filename("Engine 7"), "Engine_7_packlist.csv");
        assert_eq!(export_filename("Sprøjte 1"), "Sprøjte_1_packlist.csv");
    }
}
