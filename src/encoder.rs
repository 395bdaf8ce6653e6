//! Record-level serialization: display lines and the ISO 2709 binary layout.
//!
//! The display form is line-per-field and needs no bookkeeping. The binary
//! form is positional: a 24-byte leader whose length and base-address slots
//! are computed here (the builder's leader is a placeholder), a directory of
//! fixed-width entries, the field data, and a record terminator (0x1D).
//! All lengths and offsets are in bytes of the UTF-8 encoding, zero-padded
//! ASCII decimal.

use crate::content::{Mode, FIELD_TERMINATOR, RECORD_TERMINATOR};
use crate::field::{Field, LEADER_TAG};

const LEADER_LENGTH: usize = 24;
const DIRECTORY_ENTRY_LENGTH: usize = 12;

/// Render a record's fields as display lines, one per field.
#[must_use]
pub fn encode_display(fields: &[Field]) -> Vec<String> {
    fields.iter().map(|field| field.render(Mode::Display)).collect()
}

/// Serialize a record's fields to one ISO 2709 binary record.
///
/// The leader placeholder among `fields` is discarded; its length and
/// base-address values are recomputed from the actual field data. A record
/// with no data fields encodes to an empty buffer.
#[must_use]
pub fn encode_binary(fields: &[Field]) -> Vec<u8> {
    // (tag, serialized bytes length, start offset)
    let mut directory: Vec<(u16, usize, usize)> = Vec::new();
    let mut data = String::new();
    let mut offset = 0;
    for field in fields {
        if field.tag == LEADER_TAG {
            continue;
        }
        let serialized = field.render(Mode::Binary);
        let length = serialized.len();
        directory.push((field.tag, length, offset));
        data.push_str(&serialized);
        offset += length;
    }
    let Some(&(_, last_length, last_offset)) = directory.last() else {
        return Vec::new();
    };

    let base_address = LEADER_LENGTH + DIRECTORY_ENTRY_LENGTH * directory.len() + 1;
    let logical_length = base_address + last_offset + last_length;
    let mut buffer = format!("{logical_length:05}nam a22{base_address:05}3i 4500");
    for (tag, length, start) in directory {
        buffer.push_str(&format!("{tag:03}{length:04}{start:05}"));
    }
    buffer.push(FIELD_TERMINATOR);
    buffer.push_str(&data);
    buffer.push(RECORD_TERMINATOR);
    buffer.into_bytes()
}
