#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # artmarc
//!
//! A Rust library for converting tabular art-auction catalogue rows into
//! MARC21 bibliographic records, in both the human-readable `.mrk` display
//! format and the ISO 2709 `.mrc` binary exchange format.
//!
//! ## Quick Start
//!
//! ```ignore
//! use artmarc::{convert_record, parse_row, read_rows, MrkWriter};
//! use chrono::Utc;
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rows = read_rows(File::open("catalogue.csv")?, b',', true)?;
//! let mut out = MrkWriter::new(File::create("catalogue.mrk")?);
//! for row in &rows {
//!     let mut record = parse_row(row, Utc::now())?;
//!     out.write_record(&convert_record(&mut record)?)?;
//! }
//! out.finish()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`content`] — Field content atoms and the display/binary render modes
//! - [`field`] — MARC variable fields, indicators and ordering
//! - [`record`] — The normalized catalogue entry the builders consume
//! - [`normalize`] — Language/country/place tables and scalar cleanups
//! - [`builders`] — The ordered field-builder pipeline and 880 linkage
//! - [`encoder`] — Display lines and the ISO 2709 binary layout
//! - [`row`] — Row parsing and CSV/TSV ingestion
//! - [`convert`] — Batch conversion driver
//! - [`writer`] — `.mrk` and `.mrc` file writers
//! - [`error`] — Error types and result type

pub mod builders;
pub mod content;
pub mod convert;
pub mod encoder;
pub mod error;
pub mod field;
pub mod normalize;
pub mod record;
pub mod row;
pub mod writer;

pub use builders::{build_fields, check_for_nonfiling, BuildOutcome};
pub use content::{Atom, Content, Mode};
pub use convert::{convert_record, convert_records, EncodedRecord};
pub use encoder::{encode_binary, encode_display};
pub use error::{MarcError, Result};
pub use field::{Field, Indicator, LEADER_TAG};
pub use normalize::{
    check_for_detailed_region, normalize_country, normalize_languages, normalize_place,
};
pub use record::{Record, Title};
pub use row::{parse_row, parse_rows, read_rows, COLUMN_COUNT};
pub use writer::{MrcWriter, MrkWriter};
