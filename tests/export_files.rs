// tests/export_files.rs
//
// Writes real files through export_all.
//
use std::fs;

use directory_scraper_lib::export;
use directory_scraper_lib::{ListingRecord, ScraperConfig};

fn config_in(dir: &tempfile::TempDir) -> ScraperConfig {
    ScraperConfig::default().with_output(dir.path().join("out.csv"), dir.path().join("out.json"))
}

#[test]
fn writes_both_files_with_sparse_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let mut a = ListingRecord::new("Ramen Ya");
    a.insert("Social Media Account (1)", "https://instagram.com/ramenya");
    let mut b = ListingRecord::new("Żurek Bar");
    b.insert("Languages Spoken", "English, Polish");

    assert!(export::export_all(&config, &[a, b]).unwrap());

    let csv = fs::read_to_string(&config.csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("title,Social Media Account (1),Languages Spoken"));
    assert_eq!(lines.next(), Some("Ramen Ya,https://instagram.com/ramenya,"));
    assert_eq!(lines.next(), Some("Żurek Bar,,\"English, Polish\""));

    let json = fs::read_to_string(&config.json_path).unwrap();
    assert!(json.contains("\"title\": \"Żurek Bar\""));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(2));
    assert!(value[0].get("Languages Spoken").is_none());
}

#[test]
fn empty_collection_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    assert!(!export::export_all(&config, &[]).unwrap());
    assert!(!config.csv_path.exists());
    assert!(!config.json_path.exists());
}

#[test]
fn unwritable_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ScraperConfig::default().with_output(
        dir.path().join("missing").join("out.csv"),
        dir.path().join("out.json"),
    );
    let result = export::export_all(&config, &[ListingRecord::new("x")]);
    assert!(result.is_err());
}
