//! Turning raw tabular rows into normalized [`Record`]s.
//!
//! A row is a fixed 28-column layout of strings. The parser applies the
//! normalization tables and scalar cleanups in column order so that
//! everything downstream of it works on clean values; the advisory
//! validation at the end logs problems without failing.

use crate::error::{MarcError, Result};
use crate::normalize::{
    check_for_approx, normalize_barcode, normalize_country, normalize_isbn, normalize_languages,
    normalize_pages, normalize_size, normalize_year, split_sale_dates, trim_mistaken_decimals,
};
use crate::record::{Record, Title};
use chrono::{DateTime, Utc};
use std::io::Read;

/// Number of columns a row must have.
pub const COLUMN_COUNT: usize = 28;

/// Parse one normalized row into a [`Record`].
///
/// Columns, in order: sublibrary, languages, ISBN, four title pairs
/// (original + transliteration for title, subtitle, parallel title,
/// parallel subtitle), country, state, place, publisher, publication year,
/// copyright year, extent, size, series title, series enumeration, volume,
/// notes, sale code, sale dates, holdings notes, donation, barcode.
///
/// # Errors
///
/// Returns [`MarcError::MalformedRow`] when the row does not have exactly
/// [`COLUMN_COUNT`] columns.
pub fn parse_row(row: &[String], timestamp: DateTime<Utc>) -> Result<Record> {
    if row.len() != COLUMN_COUNT {
        return Err(MarcError::MalformedRow(format!(
            "expected {COLUMN_COUNT} columns, got {}",
            row.len()
        )));
    }
    let mut columns = row.iter().map(String::as_str);
    // The length was checked above; each `next` below is guaranteed.
    let mut next = move || columns.next().unwrap_or_default();

    let mut record = Record::new(timestamp);
    record.sublibrary = next().to_string();
    record.languages = normalize_languages(next());
    record.isbn = normalize_isbn(next());
    record.title = Title::new(next(), next());
    record.subtitle = Title::new(next(), next());
    record.parallel_title = Title::new(next(), next());
    record.parallel_subtitle = Title::new(next(), next());
    record.country_name = next().to_string();
    record.country_code = normalize_country(&record.country_name);
    record.state = next().to_string();
    record.place = next().to_string();
    record.publisher = next().to_string();
    let (pub_year, pub_year_is_approx) = check_for_approx(&normalize_year(next()));
    record.pub_year = pub_year;
    record.pub_year_is_approx = pub_year_is_approx;
    record.copyright_year = next().replace('\u{a9}', "").trim().to_string();
    let (extent, extent_is_approx) = check_for_approx(&normalize_pages(next()));
    record.extent = extent;
    record.extent_is_approx = extent_is_approx;
    record.size = normalize_size(next());
    record.series_title = next().to_string();
    record.series_enum = next().to_string();
    record.volume = next().to_string();
    record.notes = next().to_string();
    record.sales_code = next().to_string();
    record.sale_dates = split_sale_dates(next());
    record.holdings_notes = next().to_string();
    record.donation = next().to_string();
    record.barcode = normalize_barcode(next());

    record.check_mandatory_presence();
    Ok(record)
}

/// Parse a sequence of rows, one record per row, with a shared timestamp.
///
/// # Errors
///
/// Returns the first [`MarcError::MalformedRow`] encountered.
pub fn parse_rows(rows: &[Vec<String>], timestamp: DateTime<Utc>) -> Result<Vec<Record>> {
    rows.iter().map(|row| parse_row(row, timestamp)).collect()
}

/// Read delimited rows (CSV or TSV by delimiter byte) from any reader.
///
/// Spreadsheet exports are messy: cells are trimmed, a stray trailing `.0`
/// left by float coercion is stripped, and rows are allowed to vary in
/// length (the column count is enforced later by [`parse_row`]). When
/// `has_header` is set the first row is discarded.
///
/// # Errors
///
/// Returns [`MarcError::Csv`] on malformed delimited input.
pub fn read_rows<R: Read>(reader: R, delimiter: u8, has_header: bool) -> Result<Vec<Vec<String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_header)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        rows.push(
            row.iter()
                .map(|cell| trim_mistaken_decimals(cell.trim()).to_string())
                .collect(),
        );
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 9, 30, 12, 37, 55).unwrap()
    }

    fn sample_row() -> Vec<String> {
        [
            "ART",                  // sublibrary
            "English / Chinese",    // languages
            "978-0-306-40615-7",    // isbn
            "中國書畫",             // title, original script
            "Zhongguo shu hua",     // title, transliteration
            "",                     // subtitle
            "",
            "Chinese paintings",    // parallel title
            "",
            "",                     // parallel subtitle
            "",
            "USA",                  // country
            "New York",             // state
            "New York",             // place
            "Sotheby's",            // publisher
            "[2020?]",              // publication year
            "© 2019",               // copyright
            "approximately 250 pages", // extent
            "30 cm",                // size
            "",                     // series title
            "",                     // series enumeration
            "",                     // volume
            "",                     // notes
            "N10538",               // sale code
            "20200930, 20201001.0", // sale dates
            "",                     // holdings notes
            "Gift of the estate",   // donation
            "312345678",            // barcode
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }

    #[test]
    fn test_parse_row_normalizes_in_column_order() {
        let record = parse_row(&sample_row(), timestamp()).unwrap();
        assert_eq!(record.languages, vec!["eng", "chi"]);
        assert_eq!(record.isbn, "9780306406157");
        assert_eq!(record.title, Title::new("中國書畫", "Zhongguo shu hua"));
        assert_eq!(record.country_name, "USA");
        assert_eq!(record.country_code, "xxu");
        assert_eq!(record.pub_year, "2020");
        assert!(record.pub_year_is_approx);
        assert_eq!(record.copyright_year, "2019");
        assert_eq!(record.extent, "250");
        assert!(record.extent_is_approx);
        assert_eq!(record.size, 30);
        assert_eq!(record.sale_dates, vec!["20200930", "20201001"]);
        assert_eq!(record.barcode, "312345678");
    }

    #[test]
    fn test_parse_row_rejects_wrong_column_count() {
        let error = parse_row(&vec![String::new(); 5], timestamp()).unwrap_err();
        assert!(error.to_string().contains("expected 28 columns, got 5"));
    }

    #[test]
    fn test_read_rows_trims_and_strips_decimals() {
        let csv = "a, 312345678.0 ,c\nd,e,f\n";
        let rows = read_rows(csv.as_bytes(), b',', false).unwrap();
        assert_eq!(rows[0], vec!["a", "312345678", "c"]);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_read_rows_skips_header() {
        let csv = "one\ttwo\nthree\tfour\n";
        let rows = read_rows(csv.as_bytes(), b'\t', true).unwrap();
        assert_eq!(rows, vec![vec!["three", "four"]]);
    }
}
