use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexSet;
use log::info;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::config::ScraperConfig;
use crate::error::ExportError;
use crate::record::ListingRecord;

const JSON_INDENT: &[u8] = b"    ";

/// Union of every record's keys, in the order they were first seen.
pub fn collect_headers(records: &[ListingRecord]) -> Vec<String> {
    let headers: IndexSet<&str> = records.iter().flat_map(|r| r.keys()).collect();
    headers.into_iter().map(str::to_string).collect()
}

pub fn write_csv<W: Write>(writer: W, records: &[ListingRecord]) -> Result<(), ExportError> {
    let headers = collect_headers(records);
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(&headers)?;
    for record in records {
        let row = headers.iter().map(|h| record.get(h).unwrap_or_default());
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Pretty JSON array, four-space indent, non-ASCII written as-is.
pub fn write_json<W: Write>(writer: W, records: &[ListingRecord]) -> Result<(), ExportError> {
    let mut serializer =
        serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(JSON_INDENT));
    records.serialize(&mut serializer)?;
    serializer.into_inner().flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, records: &[ListingRecord]) -> Result<(), ExportError> {
    write_csv(BufWriter::new(File::create(path)?), records)
}

pub fn write_json_file(path: &Path, records: &[ListingRecord]) -> Result<(), ExportError> {
    write_json(BufWriter::new(File::create(path)?), records)
}

/// Writes both files. Returns `false` without touching disk when there is nothing to write.
pub fn export_all(config: &ScraperConfig, records: &[ListingRecord]) -> Result<bool, ExportError> {
    if records.is_empty() {
        info!("No data collected. Nothing exported.");
        return Ok(false);
    }
    write_csv_file(&config.csv_path, records)?;
    write_json_file(&config.json_path, records)?;
    info!(
        "Scraping complete. {} records saved to {:?} and {:?}",
        records.len(),
        config.csv_path,
        config.json_path
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ListingRecord> {
        let mut first = ListingRecord::new("Pizza Place");
        first.insert("phone_1", "416-555-0100");
        first.insert("Address", "1 Main St, Toronto, ON M5V 1A1");

        let mut second = ListingRecord::new("Café Crème");
        second.insert("website_1", "https://creme.ca");
        second.insert("phone_1", "416-555-0200");
        vec![first, second]
    }

    #[test]
    fn headers_are_union_in_first_seen_order() {
        assert_eq!(
            collect_headers(&records()),
            vec!["title", "phone_1", "Address", "website_1"]
        );
    }

    #[test]
    fn csv_leaves_missing_cells_blank() {
        let mut out = Vec::new();
        write_csv(&mut out, &records()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "title,phone_1,Address,website_1");
        assert_eq!(lines[1], "Pizza Place,416-555-0100,\"1 Main St, Toronto, ON M5V 1A1\",");
        assert_eq!(lines[2], "Café Crème,416-555-0200,,https://creme.ca");
    }

    #[test]
    fn json_keeps_unicode_and_uses_four_spaces() {
        let mut out = Vec::new();
        write_json(&mut out, &records()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Café Crème"));
        assert!(!text.contains("\\u"));
        assert!(text.contains("\n    {\n        \"title\": \"Pizza Place\""));

        let parsed: Vec<ListingRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, records());
    }
}
