use std::collections::HashMap;

use crate::document::EdfDocument;
use crate::error::{EdfError, Result};
use crate::types::Diagnostic;

/// Outcome of checking the sample blob against the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCheck {
    /// Blob holds exactly `samples_per_record * num_records` samples
    Match { samples_in_blob: usize },
    /// Blob size disagrees with the header; both counts are in samples
    Mismatch { expected: usize, actual: usize },
}

impl SizeCheck {
    pub fn into_result(self) -> Result<usize> {
        match self {
            SizeCheck::Match { samples_in_blob } => Ok(samples_in_blob),
            SizeCheck::Mismatch { expected, actual } => {
                Err(EdfError::SizeMismatch { expected, actual })
            }
        }
    }
}

/// Samples one data record holds across all channels
pub fn samples_per_record(doc: &EdfDocument) -> usize {
    doc.channels().iter().map(|c| c.num_samples_per_record).sum()
}

/// Number of whole 16-bit samples after the header
pub fn samples_in_blob(doc: &EdfDocument, bytes: &[u8]) -> usize {
    bytes.len().saturating_sub(doc.num_header_bytes) / 2
}

/// Compares declared and actual sample counts.
///
/// On a match the document's duration is set from the actual blob size:
/// `record_duration * samples_in_blob / samples_per_record`. On a mismatch
/// the document is left untouched.
pub fn validate(doc: &mut EdfDocument, bytes: &[u8]) -> SizeCheck {
    let per_record = samples_per_record(doc);
    let actual = samples_in_blob(doc, bytes);
    let expected = per_record.saturating_mul(doc.num_records);

    if actual != expected {
        return SizeCheck::Mismatch { expected, actual };
    }

    doc.duration = Some(if per_record == 0 {
        0.0
    } else {
        doc.record_duration * actual as f64 / per_record as f64
    });

    SizeCheck::Match { samples_in_blob: actual }
}

/// Cumulative per-channel sample offsets within one record.
///
/// `map[c]..map[c + 1]` is channel `c`'s window; the last entry equals the
/// record's total sample count.
pub fn record_channel_map(doc: &EdfDocument) -> Vec<usize> {
    let mut map = Vec::with_capacity(doc.channels().len() + 1);
    map.push(0);
    let mut acc = 0usize;
    for channel in doc.channels() {
        acc += channel.num_samples_per_record;
        map.push(acc);
    }
    map
}

/// Splits the sample blob into each channel's per-record storage.
///
/// A size mismatch is tolerated unless `strict`: decoding continues with
/// however many samples are present, the duration stays at the declared
/// `record_duration * num_records`, and the mismatch is recorded as a
/// diagnostic. Records past the end of the blob come out truncated or empty.
pub(crate) fn decode_blob(doc: &mut EdfDocument, bytes: &[u8], strict: bool) -> Result<()> {
    let channel_map = record_channel_map(doc);
    let per_record = channel_map.last().copied().unwrap_or(0);

    let sample_count = match validate(doc, bytes) {
        SizeCheck::Match { samples_in_blob } => samples_in_blob,
        SizeCheck::Mismatch { expected, actual } => {
            if strict {
                return Err(EdfError::SizeMismatch { expected, actual });
            }
            doc.warn(Diagnostic::SizeMismatch { expected, actual });
            let declared = doc.record_duration * doc.num_records as f64;
            doc.duration = Some(declared);
            doc.warn(Diagnostic::DurationFromDeclaredRecords { duration: declared });
            samples_in_blob(doc, bytes)
        }
    };

    let samples = read_samples(bytes, doc.num_header_bytes, sample_count);
    let num_records = doc.num_records;
    let record_duration = doc.record_duration;

    for channel in doc.channels.iter_mut() {
        channel.init(num_records, record_duration);
    }

    // 只遍历有数据的记录，其余记录保持为空
    let filled = if per_record == 0 {
        0
    } else {
        samples.len().div_ceil(per_record).min(num_records)
    };

    for record in 0..filled {
        let base = record.saturating_mul(per_record);
        for (c, channel) in doc.channels.iter_mut().enumerate() {
            let start = base.saturating_add(channel_map[c]).min(samples.len());
            let end = base.saturating_add(channel_map[c + 1]).min(samples.len());
            channel.set_record(record, samples[start..end].to_vec());
        }
    }

    doc.sampling_rate = doc
        .channels
        .iter()
        .map(|c| (c.label.clone(), c.sampling_rate()))
        .collect::<HashMap<_, _>>();

    log::debug!(
        "decoded {} records x {} channels ({} samples, duration {:?}s)",
        num_records,
        doc.channels.len(),
        samples.len(),
        doc.duration
    );

    Ok(())
}

/// 16位有符号小端序样本视图
fn read_samples(bytes: &[u8], header_bytes: usize, count: usize) -> Vec<i16> {
    let start = header_bytes.min(bytes.len());
    bytes[start..]
        .chunks_exact(2)
        .take(count)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect()
}
