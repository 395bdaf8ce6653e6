//! Writing encoded records to their two file formats.
//!
//! [`MrkWriter`] produces the human-readable text format (one line per
//! field, records separated by a blank line); [`MrcWriter`] produces the
//! ISO 2709 binary format (records simply concatenated, each already
//! carrying its own terminator). Both write to any destination implementing
//! [`std::io::Write`], one record at a time.
//!
//! # Examples
//!
//! ```ignore
//! use artmarc::{convert_record, MrkWriter};
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut file = File::create("output.mrk")?;
//! let mut writer = MrkWriter::new(&mut file);
//! let encoded = convert_record(&mut record)?;
//! writer.write_record(&encoded)?;
//! writer.finish()?;
//! # Ok(())
//! # }
//! ```

use crate::convert::EncodedRecord;
use crate::error::{MarcError, Result};
use std::io::Write;

/// Writer for the human-readable display format.
///
/// Records are separated by a single blank line; no blank line follows the
/// last record.
#[derive(Debug)]
pub struct MrkWriter<W: Write> {
    writer: W,
    records_written: usize,
    finished: bool,
}

impl<W: Write> MrkWriter<W> {
    /// Create a new display-format writer.
    pub fn new(writer: W) -> Self {
        MrkWriter {
            writer,
            records_written: 0,
            finished: false,
        }
    }

    /// Write one record's display lines.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::FinishedWriter`] after [`finish`](Self::finish),
    /// or [`MarcError::Io`] on a write failure.
    pub fn write_record(&mut self, record: &EncodedRecord) -> Result<()> {
        if self.finished {
            return Err(MarcError::FinishedWriter);
        }
        if self.records_written > 0 {
            self.writer.write_all(b"\n")?;
        }
        for line in &record.display {
            self.writer.write_all(line.as_bytes())?;
            self.writer.write_all(b"\n")?;
        }
        self.records_written += 1;
        Ok(())
    }

    /// Flush the writer and mark it as finished.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing the underlying writer fails.
    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }

    /// Returns the number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }
}

/// Writer for the ISO 2709 binary format.
#[derive(Debug)]
pub struct MrcWriter<W: Write> {
    writer: W,
    records_written: usize,
    finished: bool,
}

impl<W: Write> MrcWriter<W> {
    /// Create a new binary-format writer.
    pub fn new(writer: W) -> Self {
        MrcWriter {
            writer,
            records_written: 0,
            finished: false,
        }
    }

    /// Write one record's binary bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::FinishedWriter`] after [`finish`](Self::finish),
    /// or [`MarcError::Io`] on a write failure.
    pub fn write_record(&mut self, record: &EncodedRecord) -> Result<()> {
        if self.finished {
            return Err(MarcError::FinishedWriter);
        }
        self.writer.write_all(&record.binary)?;
        self.records_written += 1;
        Ok(())
    }

    /// Flush the writer and mark it as finished.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing the underlying writer fails.
    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }

    /// Returns the number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn encoded(title: &str) -> EncodedRecord {
        EncodedRecord {
            display: vec![
                "=LDR  00000nam\\a22000003i\\4500".to_string(),
                format!("=245  00$a{title}."),
            ],
            binary: vec![b'0', b'0', 0x1e, 0x1d],
        }
    }

    #[test]
    fn test_mrk_writer_separates_records_with_blank_line() {
        let mut buffer = Vec::new();
        let mut writer = MrkWriter::new(&mut buffer);
        writer.write_record(&encoded("First")).unwrap();
        writer.write_record(&encoded("Second")).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.records_written(), 2);

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "=LDR  00000nam\\a22000003i\\4500\n=245  00$aFirst.\n\n\
             =LDR  00000nam\\a22000003i\\4500\n=245  00$aSecond.\n"
        );
    }

    #[test]
    fn test_mrc_writer_concatenates_records() {
        let mut buffer = Vec::new();
        let mut writer = MrcWriter::new(&mut buffer);
        writer.write_record(&encoded("First")).unwrap();
        writer.write_record(&encoded("Second")).unwrap();
        writer.finish().unwrap();

        assert_eq!(buffer.iter().filter(|&&b| b == 0x1d).count(), 2);
    }

    #[test]
    fn test_writers_reject_writes_after_finish() {
        let mut buffer = Vec::new();
        let mut writer = MrkWriter::new(&mut buffer);
        writer.finish().unwrap();
        assert!(writer.write_record(&encoded("Late")).is_err());

        let mut buffer = Vec::new();
        let mut writer = MrcWriter::new(&mut buffer);
        writer.finish().unwrap();
        assert!(writer.write_record(&encoded("Late")).is_err());
    }

    #[test]
    fn test_mrk_writer_to_file() {
        let mut file = tempfile::tempfile().unwrap();
        {
            let mut writer = MrkWriter::new(&mut file);
            writer.write_record(&encoded("On disk")).unwrap();
            writer.finish().unwrap();
        }
        use std::io::Seek;
        file.rewind().unwrap();
        let mut text = String::new();
        file.read_to_string(&mut text).unwrap();
        assert!(text.contains("=245  00$aOn disk."));
    }
}
