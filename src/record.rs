//! The normalized catalogue entry the field builders consume.
//!
//! One [`Record`] corresponds to one input row. It is constructed by the row
//! parser with every free-text column already trimmed, type-coerced and run
//! through the normalization tables; the builder pipeline assumes normalized
//! input and does not re-normalize.
//!
//! Two members are mutated during the builder pass and nowhere else:
//! `sequence_number`, which labels linked alternate-script field pairs, and
//! `links`, which accumulates tag-880 fields produced as a side effect of
//! title processing.

use crate::field::Field;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A title column pair: the text as printed and an optional romanization.
///
/// When `transliteration` is non-empty the original is in a non-Latin
/// script; the transliteration becomes the primary MARC title and the
/// original is diverted into a linked tag-880 field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Title text in the original script.
    pub original: String,
    /// Latin transliteration, empty for titles already in Latin script.
    pub transliteration: String,
}

impl Title {
    /// Create a title pair.
    pub fn new(original: impl Into<String>, transliteration: impl Into<String>) -> Self {
        Title {
            original: original.into(),
            transliteration: transliteration.into(),
        }
    }

    /// True when both the original and the transliteration are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.original.is_empty() && self.transliteration.is_empty()
    }
}

/// One normalized catalogue entry.
///
/// Constructed once per input row, mutated only by the builder pipeline
/// (`sequence_number` increments, `links` appends), discarded after
/// encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Owning sub-library code.
    pub sublibrary: String,
    /// MARC language codes, primary language first.
    pub languages: Vec<String>,
    /// ISBN with spaces and hyphens stripped; may be empty.
    pub isbn: String,
    /// Main title.
    pub title: Title,
    /// Subtitle.
    pub subtitle: Title,
    /// Parallel (added-entry) title.
    pub parallel_title: Title,
    /// Parallel subtitle.
    pub parallel_subtitle: Title,
    /// Country of publication as supplied.
    pub country_name: String,
    /// Normalized MARC country code, possibly a 3-character sentinel
    /// (`xxu`/`xxk`/`xxc`/`xxa`) resolved per state at build time.
    pub country_code: String,
    /// State or province of publication, raw.
    pub state: String,
    /// Place (city) of publication, raw.
    pub place: String,
    /// Publisher name.
    pub publisher: String,
    /// Publication year as a string (MARC dates are not always numeric).
    pub pub_year: String,
    /// Whether the publication year was flagged uncertain.
    pub pub_year_is_approx: bool,
    /// Copyright year, empty when none was supplied.
    pub copyright_year: String,
    /// Extent (page count) as a string.
    pub extent: String,
    /// Whether the extent was flagged approximate.
    pub extent_is_approx: bool,
    /// Physical size in centimetres; -1 when unparseable.
    pub size: i32,
    /// Series title, empty when the item is not part of a series.
    pub series_title: String,
    /// Series enumeration.
    pub series_enum: String,
    /// Volume designation, emitted as a 020 `$q` qualifier.
    pub volume: String,
    /// Free-text note for field 500.
    pub notes: String,
    /// Auction sale code.
    pub sales_code: String,
    /// Sale dates; a single date and multiple dates are distinguished in
    /// the 033 indicator.
    pub sale_dates: Vec<String>,
    /// Holdings note.
    pub holdings_notes: String,
    /// Donation note.
    pub donation: String,
    /// Item barcode; mandatory.
    pub barcode: String,
    /// Processing timestamp feeding fields 005 and 008.
    pub timestamp: DateTime<Utc>,
    /// Next occurrence number for linked alternate-script field pairs.
    pub sequence_number: u32,
    /// Fields generated as a side effect of processing another field,
    /// appended to the record after the main builder pass.
    pub links: Vec<Field>,
}

impl Record {
    /// Create an empty record with the given processing timestamp.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Record {
            sublibrary: String::new(),
            languages: Vec::new(),
            isbn: String::new(),
            title: Title::default(),
            subtitle: Title::default(),
            parallel_title: Title::default(),
            parallel_subtitle: Title::default(),
            country_name: String::new(),
            country_code: String::new(),
            state: String::new(),
            place: String::new(),
            publisher: String::new(),
            pub_year: String::new(),
            pub_year_is_approx: false,
            copyright_year: String::new(),
            extent: String::new(),
            extent_is_approx: false,
            size: -1,
            series_title: String::new(),
            series_enum: String::new(),
            volume: String::new(),
            notes: String::new(),
            sales_code: String::new(),
            sale_dates: Vec::new(),
            holdings_notes: String::new(),
            donation: String::new(),
            barcode: String::new(),
            timestamp,
            sequence_number: 1,
            links: Vec::new(),
        }
    }

    /// Hand out the next linkage occurrence number, zero-padded to two
    /// digits, and advance the counter. Called exactly once per linked
    /// field pair so both sides share the number.
    pub fn allocate_occurrence(&mut self) -> String {
        let occurrence = format!("{:02}", self.sequence_number);
        self.sequence_number += 1;
        occurrence
    }

    /// Advisory presence check for the columns the pipeline treats as
    /// mandatory. Logs a warning per missing column and returns whether all
    /// were present; never fails.
    pub fn check_mandatory_presence(&self) -> bool {
        let missing: Vec<&str> = [
            ("sublibrary", self.sublibrary.is_empty()),
            (
                "languages",
                self.languages.iter().all(std::string::String::is_empty),
            ),
            ("title", self.title.is_empty()),
            ("country", self.country_code.is_empty()),
            ("publisher", self.publisher.is_empty()),
            ("publication year", self.pub_year.is_empty()),
            ("extent", self.extent.is_empty()),
            ("size", self.size <= 0),
            (
                "sale dates",
                self.sale_dates.iter().all(std::string::String::is_empty),
            ),
            ("barcode", self.barcode.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, is_missing)| is_missing.then_some(name))
        .collect();

        for name in &missing {
            warn!(column = *name, "record is missing a mandatory column");
        }
        if self.place.is_empty() && self.state.is_empty() {
            warn!("a record must have either a place or a state; this has neither");
        }
        missing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 9, 30, 12, 37, 55).unwrap()
    }

    #[test]
    fn test_allocate_occurrence_is_zero_padded_and_monotonic() {
        let mut record = Record::new(timestamp());
        assert_eq!(record.allocate_occurrence(), "01");
        assert_eq!(record.allocate_occurrence(), "02");
        assert_eq!(record.sequence_number, 3);
    }

    #[test]
    fn test_title_is_empty() {
        assert!(Title::default().is_empty());
        assert!(!Title::new("中國書畫", "Zhongguo shu hua").is_empty());
        assert!(!Title::new("War", "").is_empty());
    }

    #[test]
    fn test_check_mandatory_presence() {
        let mut record = Record::new(timestamp());
        assert!(!record.check_mandatory_presence());

        record.sublibrary = "ART".to_string();
        record.languages = vec!["eng".to_string()];
        record.title = Title::new("War", "");
        record.country_code = "enk".to_string();
        record.publisher = "Sotheby's".to_string();
        record.pub_year = "2020".to_string();
        record.extent = "250".to_string();
        record.size = 30;
        record.sale_dates = vec!["20200930".to_string()];
        record.barcode = "312345678".to_string();
        record.place = "London".to_string();
        assert!(record.check_mandatory_presence());
    }

    #[test]
    fn test_record_serializes_to_json() {
        let record = Record::new(timestamp());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"sequence_number\":1"));
    }
}
