use std::collections::HashMap;

use crate::channel::{Channel, CHANNEL_FIELDS};
use crate::utils::read_field;

/// Decodes the per-channel sub-header.
///
/// The sub-header is columnar: all labels first, then all transducers, and
/// so on through [`CHANNEL_FIELDS`]. Fields are the outer loop, channels the
/// inner one, with one running offset across the whole sub-header. The
/// returned channels keep their sub-header order.
pub fn decode_channel_table(sub_header: &[u8], num_channels: usize) -> Vec<Channel> {
    let mut channels = vec![Channel::default(); num_channels];

    let mut offset = 0;
    for field in CHANNEL_FIELDS {
        for channel in channels.iter_mut() {
            let value = read_field(sub_header, offset, field);
            channel.assign(field.name, value);
            offset += field.width;
        }
    }

    channels
}

/// Builds the label → channel index lookup.
///
/// Labels are not required to be unique; a later duplicate replaces the
/// earlier entry.
pub fn index_by_label(channels: &[Channel]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(channels.len());
    for (i, channel) in channels.iter().enumerate() {
        if index.insert(channel.label.clone(), i).is_some() {
            log::debug!("duplicate channel label '{}', keeping channel {}", channel.label, i);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad(value: &str, width: usize) -> String {
        format!("{:<width$}", value, width = width)
    }

    /// 按列写入：每个字段先写通道0，再写通道1
    fn columnar(rows: &[[&str; 10]]) -> Vec<u8> {
        let mut text = String::new();
        for (column, field) in CHANNEL_FIELDS.iter().enumerate() {
            for row in rows {
                text.push_str(&pad(row[column], field.width));
            }
        }
        text.into_bytes()
    }

    #[test]
    fn test_columnar_decode() {
        let sub_header = columnar(&[
            ["EEG Fp1", "AgAgCl", "uV", "-200", "200", "-2048", "2047", "HP:0.1Hz", "256", ""],
            ["ECG", "Chest", "mV", "-5", "5", "-32768", "32767", "LP:100Hz", "128", "r1"],
        ]);
        assert_eq!(sub_header.len(), 512);

        let channels = decode_channel_table(&sub_header, 2);
        assert_eq!(channels.len(), 2);

        assert_eq!(channels[0].label, "EEG Fp1");
        assert_eq!(channels[0].transducer, "AgAgCl");
        assert_eq!(channels[0].physical_dimension, "uV");
        assert_eq!(channels[0].physical_min, -200.0);
        assert_eq!(channels[0].physical_max, 200.0);
        assert_eq!(channels[0].digital_min, -2048.0);
        assert_eq!(channels[0].digital_max, 2047.0);
        assert_eq!(channels[0].prefiltering, "HP:0.1Hz");
        assert_eq!(channels[0].num_samples_per_record, 256);
        assert_eq!(channels[0].reserved, "");

        assert_eq!(channels[1].label, "ECG");
        assert_eq!(channels[1].transducer, "Chest");
        assert_eq!(channels[1].physical_dimension, "mV");
        assert_eq!(channels[1].physical_min, -5.0);
        assert_eq!(channels[1].digital_max, 32767.0);
        assert_eq!(channels[1].prefiltering, "LP:100Hz");
        assert_eq!(channels[1].num_samples_per_record, 128);
        assert_eq!(channels[1].reserved, "r1");
    }

    #[test]
    fn test_zero_channels() {
        assert!(decode_channel_table(b"", 0).is_empty());
        assert!(decode_channel_table(&[b' '; 256], 0).is_empty());
    }

    #[test]
    fn test_truncated_sub_header_degrades() {
        let sub_header = columnar(&[["A", "", "", "-1", "1", "-1", "1", "", "10", ""]]);
        // 只保留标签和传感器列
        let channels = decode_channel_table(&sub_header[..96], 1);

        assert_eq!(channels[0].label, "A");
        assert!(channels[0].physical_min.is_nan());
        assert_eq!(channels[0].num_samples_per_record, 0);
    }

    #[test]
    fn test_duplicate_labels_last_wins() {
        let sub_header = columnar(&[
            ["EEG", "", "", "-1", "1", "-1", "1", "", "1", ""],
            ["ECG", "", "", "-1", "1", "-1", "1", "", "1", ""],
            ["EEG", "", "", "-1", "1", "-1", "1", "", "1", ""],
        ]);
        let channels = decode_channel_table(&sub_header, 3);
        let index = index_by_label(&channels);

        assert_eq!(index.len(), 2);
        assert_eq!(index["EEG"], 2);
        assert_eq!(index["ECG"], 1);
    }
}
