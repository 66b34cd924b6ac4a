use std::collections::HashMap;
use std::path::PathBuf;

use elreg_prep::{map_csv, transform_csv, PdLookup, PrepError, SynonymTable, TransformConfig};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

fn rows_by_id(csv_text: &str) -> HashMap<String, HashMap<String, String>> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let headers = reader.headers().unwrap().clone();
    reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            let row: HashMap<String, String> = headers
                .iter()
                .zip(r.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect();
            (row["Elector ID"].clone(), row)
        })
        .collect()
}

fn prepare() -> (String, elreg_prep::TransformReport) {
    let table = SynonymTable::builtin().unwrap();
    let mapped = map_csv(&read_fixture("electors.csv"), b',', &table).unwrap();
    assert_eq!(mapped.rows, 5);

    let lookup = PdLookup::from_csv(&read_fixture("pd.csv")).unwrap();
    let out = transform_csv(&mapped.csv, &lookup, &TransformConfig::default()).unwrap();
    (out.csv, out.report)
}

// -------------------------------------------------------------------------
// Map
// -------------------------------------------------------------------------

#[test]
fn mapped_file_uses_canonical_header() {
    let table = SynonymTable::builtin().unwrap();
    let mapped = map_csv(&read_fixture("electors.csv"), b',', &table).unwrap();
    let header = mapped.csv.lines().next().unwrap();
    assert!(header.starts_with("\"Elector ID\",\"PDCode\""));
    assert!(mapped.unmapped_fields.contains(&"UPRN".to_string()));
    assert!(!mapped.unmapped_fields.contains(&"Status".to_string()));
}

#[test]
fn unknown_supplier_column_names_header() {
    let table = SynonymTable::builtin().unwrap();
    let err = map_csv(&read_fixture("electors-unknown-column.csv"), b',', &table).unwrap_err();
    assert!(matches!(err, PrepError::UnknownHeader(ref h) if h == "Ward"));
}

// -------------------------------------------------------------------------
// Transform
// -------------------------------------------------------------------------

#[test]
fn transformed_rows_are_keyed() {
    let (csv_text, report) = prepare();
    let rows = rows_by_id(&csv_text);

    assert_eq!(report.rows, 5);
    let mut ids: Vec<&String> = rows.keys().collect();
    ids.sort();
    assert_eq!(ids, vec!["AA-101/0", "AA-102/0", "AB-7/1", "ZZ-5/0", "ZZ-6/0"]);
}

#[test]
fn names_and_addresses_are_cleaned() {
    let (csv_text, _) = prepare();
    let rows = rows_by_id(&csv_text);

    let ann = &rows["AA-101/0"];
    assert_eq!(ann["Elector Name First"], "Ann");
    assert_eq!(ann["Elector Name Last"], "O'Brien");
    assert_eq!(ann["Address1"], "Flat 2");
    assert_eq!(ann["Address6"], "Northtown");
    assert_eq!(ann["Address4"], "Rose Cottage");

    let donald = &rows["AA-102/0"];
    assert_eq!(donald["Elector Name Last"], "McDonald");
    assert_eq!(donald["Address1"], "12 High Street");

    let pat = &rows["AB-7/1"];
    assert_eq!(pat["Address1"], "1 Church Road");
    assert_eq!(pat["PostCode"], "AB2 9XY");
}

#[test]
fn status_flags_become_months() {
    let (csv_text, report) = prepare();
    let rows = rows_by_id(&csv_text);

    assert_eq!(report.status.added, 3);
    assert_eq!(report.status.modified, 1);
    assert_eq!(report.status.deleted, 1);

    let pat = &rows["AB-7/1"];
    assert_eq!(pat["ElectorDeletedMonth"], "1");
    assert_eq!(pat["ElectorCreatedMonth"], "0");
    assert_eq!(rows["AA-102/0"]["ElectorChangedMonth"], "1");
}

#[test]
fn lookup_enrichment_and_missing_codes() {
    let (csv_text, report) = prepare();
    let rows = rows_by_id(&csv_text);

    assert_eq!(report.enriched, 3);
    assert_eq!(report.missing_pd_codes, vec!["ZZ"]);
    assert_eq!(rows["AB-7/1"]["O-code"], "E05000102");
    assert_eq!(rows["AA-101/0"]["LAD"], "Northtown");
    assert_eq!(rows["ZZ-5/0"]["Constituency"], "");

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["missing_pd_codes"][0], "ZZ");
    assert_eq!(json["status"]["added"], 3);
}

#[test]
fn malformed_lookup_names_line() {
    let err = PdLookup::from_csv(&read_fixture("pd-malformed.csv")).unwrap_err();
    assert!(matches!(err, PrepError::LookupRow { line: 2, fields: 3 }));
}
