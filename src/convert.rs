//! Batch conversion: records in, encoded records out.

use crate::builders::build_fields;
use crate::encoder::{encode_binary, encode_display};
use crate::error::Result;
use crate::record::Record;
use tracing::warn;

/// Both serializations of one finished record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    /// Display lines, one per field.
    pub display: Vec<String>,
    /// ISO 2709 binary bytes.
    pub binary: Vec<u8>,
}

/// Build and encode a single record.
///
/// # Errors
///
/// Returns [`crate::MarcError::MissingField`] when a mandatory field cannot
/// be built.
pub fn convert_record(record: &mut Record) -> Result<EncodedRecord> {
    let fields = build_fields(record)?;
    Ok(EncodedRecord {
        display: encode_display(&fields),
        binary: encode_binary(&fields),
    })
}

/// Convert a batch of records.
///
/// A record whose mandatory fields cannot be built is logged and skipped;
/// the rest of the batch is unaffected.
#[must_use]
pub fn convert_records(records: &mut [Record]) -> Vec<EncodedRecord> {
    let mut encoded = Vec::with_capacity(records.len());
    for (index, record) in records.iter_mut().enumerate() {
        match convert_record(record) {
            Ok(result) => encoded.push(result),
            Err(error) => {
                warn!(index, %error, "skipping record");
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Title;
    use chrono::{TimeZone, Utc};

    fn sample_record() -> Record {
        let mut record = Record::new(Utc.with_ymd_and_hms(2020, 9, 30, 12, 37, 55).unwrap());
        record.sublibrary = "ART".to_string();
        record.languages = vec!["eng".to_string()];
        record.title = Title::new("The Art of War", "");
        record.country_name = "UK".to_string();
        record.country_code = "xxk".to_string();
        record.place = "London".to_string();
        record.publisher = "Sotheby's".to_string();
        record.pub_year = "2020".to_string();
        record.extent = "250".to_string();
        record.size = 30;
        record.sale_dates = vec!["20200930".to_string()];
        record.barcode = "312345678".to_string();
        record
    }

    #[test]
    fn test_convert_record_produces_both_forms() {
        let mut record = sample_record();
        let encoded = convert_record(&mut record).unwrap();
        assert!(encoded
            .display
            .iter()
            .any(|line| line == "=245  04$aThe Art of War."));
        assert_eq!(*encoded.binary.last().unwrap(), 0x1d);
    }

    #[test]
    fn test_convert_records_skips_failed_record() {
        let mut records = vec![sample_record(), sample_record(), sample_record()];
        records[1].barcode = String::new();
        let encoded = convert_records(&mut records);
        assert_eq!(encoded.len(), 2);
    }

    #[test]
    fn test_convert_record_is_deterministic() {
        let mut first = sample_record();
        let mut second = sample_record();
        assert_eq!(
            convert_record(&mut first).unwrap(),
            convert_record(&mut second).unwrap()
        );
    }
}
