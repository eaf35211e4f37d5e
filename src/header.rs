use crate::document::EdfDocument;
use crate::types::{Coercion, FieldSpec, FieldValue};
use crate::utils::read_field;
use crate::EDF_HEADER_BYTES;

/// Global header layout, in byte order. Widths sum to 256.
pub const HEADER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("version", Coercion::Text, 8),
    FieldSpec::new("patient_id", Coercion::Text, 80),
    FieldSpec::new("recording_id", Coercion::Text, 80),
    FieldSpec::new("start_date", Coercion::Text, 8),
    FieldSpec::new("start_time", Coercion::Text, 8),
    FieldSpec::new("num_header_bytes", Coercion::Number, 8),
    FieldSpec::new("reserved", Coercion::Raw, 44),
    FieldSpec::new("num_records", Coercion::Number, 8),
    FieldSpec::new("record_duration", Coercion::Number, 8),
    FieldSpec::new("num_channels", Coercion::Number, 4),
];

/// Decodes the 256-byte global header into `doc`'s scalar fields.
///
/// Fields are consumed left to right at their declared widths. A short
/// buffer is not an error: missing fields come out as `""` or NaN (counts
/// as 0).
pub(crate) fn decode_header(doc: &mut EdfDocument, bytes: &[u8]) {
    let header = &bytes[..bytes.len().min(EDF_HEADER_BYTES)];

    let mut offset = 0;
    for field in HEADER_FIELDS {
        let value = read_field(header, offset, field);
        assign(doc, field.name, value);
        offset += field.width;
    }

    log::debug!(
        "header: version='{}' type={} records={} duration={}s channels={} header_bytes={}",
        doc.version,
        doc.file_type(),
        doc.num_records,
        doc.record_duration,
        doc.num_channels,
        doc.num_header_bytes
    );
}

fn assign(doc: &mut EdfDocument, name: &str, value: FieldValue) {
    match name {
        "version" => doc.version = value.into_text(),
        "patient_id" => doc.patient_id = value.into_text(),
        "recording_id" => doc.recording_id = value.into_text(),
        "start_date" => doc.start_date = value.into_text(),
        "start_time" => doc.start_time = value.into_text(),
        "num_header_bytes" => doc.num_header_bytes = value.as_count(),
        "reserved" => doc.reserved = value.into_text(),
        "num_records" => doc.num_records = value.as_count(),
        "record_duration" => doc.record_duration = value.as_number(),
        "num_channels" => doc.num_channels = value.as_count(),
        _ => {}
    }
}
