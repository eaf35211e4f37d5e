use crate::types::{Coercion, FieldSpec, FieldValue};

/// Per-channel sub-header layout, in byte order.
///
/// Each entry is one column of the channel table: `num_channels` values of
/// `width` bytes follow each other before the next column starts.
pub const CHANNEL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("label", Coercion::Text, 16),
    FieldSpec::new("transducer", Coercion::Text, 80),
    FieldSpec::new("physical_dimension", Coercion::Text, 8),
    FieldSpec::new("physical_min", Coercion::Number, 8),
    FieldSpec::new("physical_max", Coercion::Number, 8),
    FieldSpec::new("digital_min", Coercion::Number, 8),
    FieldSpec::new("digital_max", Coercion::Number, 8),
    FieldSpec::new("prefiltering", Coercion::Text, 80),
    FieldSpec::new("num_samples_per_record", Coercion::Number, 8),
    FieldSpec::new("reserved", Coercion::Text, 32),
];

/// One channel of an EDF recording: sub-header metadata plus its samples.
///
/// Samples are kept as raw digital values, one vector per data record.
/// Physical values are computed on extraction from the digital and physical
/// ranges.
///
/// # Examples
///
/// ```rust
/// use edfdecoder::Channel;
///
/// let mut channel = Channel::default();
/// channel.label = "EEG Fz".to_string();
/// channel.physical_min = -100.0;
/// channel.physical_max = 100.0;
/// channel.digital_min = -2048.0;
/// channel.digital_max = 2047.0;
/// channel.num_samples_per_record = 4;
///
/// channel.init(2, 0.5);
/// channel.set_record(0, vec![-2048, 0, 0, 2047]);
/// channel.set_record(1, vec![1, 2, 3, 4]);
///
/// assert_eq!(channel.sampling_rate(), 8.0);
/// assert_eq!(channel.num_samples(), 8);
///
/// let physical = channel.get_physical_samples(0.0, None, Some(4));
/// assert!((physical[0] + 100.0).abs() < 1e-9);
/// assert!((physical[3] - 100.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channel {
    pub label: String,
    pub transducer: String,
    pub physical_dimension: String,
    pub physical_min: f64,
    pub physical_max: f64,
    pub digital_min: f64,
    pub digital_max: f64,
    pub prefiltering: String,
    pub num_samples_per_record: usize,
    pub reserved: String,
    record_duration: f64,
    num_records: usize,
    records: Vec<Vec<i16>>,
}

impl Channel {
    /// Assigns a decoded sub-header field by name; unknown names are ignored.
    pub(crate) fn assign(&mut self, name: &str, value: FieldValue) {
        match name {
            "label" => self.label = value.into_text(),
            "transducer" => self.transducer = value.into_text(),
            "physical_dimension" => self.physical_dimension = value.into_text(),
            "physical_min" => self.physical_min = value.as_number(),
            "physical_max" => self.physical_max = value.as_number(),
            "digital_min" => self.digital_min = value.as_number(),
            "digital_max" => self.digital_max = value.as_number(),
            "prefiltering" => self.prefiltering = value.into_text(),
            "num_samples_per_record" => self.num_samples_per_record = value.as_count(),
            "reserved" => self.reserved = value.into_text(),
            _ => {}
        }
    }

    /// Resets the channel to `num_records` empty records, dropping any previous samples.
    ///
    /// Storage grows only as records are filled, so an overstated record count
    /// in the header costs nothing until samples arrive.
    pub fn init(&mut self, num_records: usize, record_duration: f64) {
        self.record_duration = record_duration;
        self.num_records = num_records;
        self.records = Vec::new();
    }

    /// Stores the samples of record `index`. Indices outside `init`'s range are ignored.
    pub fn set_record(&mut self, index: usize, samples: Vec<i16>) {
        if index >= self.num_records {
            return;
        }
        if index >= self.records.len() {
            self.records.resize(index + 1, Vec::new());
        }
        self.records[index] = samples;
    }

    /// Samples per second
    pub fn sampling_rate(&self) -> f64 {
        self.num_samples_per_record as f64 / self.record_duration
    }

    /// Declared number of records
    pub fn num_records(&self) -> usize {
        self.num_records
    }

    /// Records filled from the blob. Declared records past the last filled
    /// one are empty and not stored; see [`Channel::record`].
    pub fn records(&self) -> &[Vec<i16>] {
        &self.records
    }

    /// Samples of record `index`, empty for declared records the blob did not reach
    pub fn record(&self, index: usize) -> Option<&[i16]> {
        match self.records.get(index) {
            Some(r) => Some(r.as_slice()),
            None if index < self.num_records => Some(&[][..]),
            None => None,
        }
    }

    /// Number of samples actually stored across all records
    pub fn num_samples(&self) -> usize {
        self.records.iter().map(|r| r.len()).sum()
    }

    /// 计算物理值转换参数
    pub fn bit_value(&self) -> f64 {
        (self.physical_max - self.physical_min) / (self.digital_max - self.digital_min)
    }

    /// 计算偏移量
    pub fn offset(&self) -> f64 {
        self.physical_max / self.bit_value() - self.digital_max
    }

    /// 将数字值转换为物理值
    pub fn to_physical(&self, digital_value: i16) -> f64 {
        self.bit_value() * (self.offset() + digital_value as f64)
    }

    /// Raw digital samples in the window starting at `t0` seconds.
    ///
    /// The window length is `n` samples when given, otherwise `dt` seconds,
    /// otherwise everything up to the end. Windows are clipped to the stored
    /// samples.
    pub fn get_digital_samples(&self, t0: f64, dt: Option<f64>, n: Option<usize>) -> Vec<i16> {
        let rate = self.sampling_rate();
        let start = seconds_to_index(t0, rate);
        let count = match (n, dt) {
            (Some(n), _) => n,
            (None, Some(dt)) => seconds_to_count(dt, rate),
            (None, None) => usize::MAX,
        };

        self.records
            .iter()
            .flatten()
            .skip(start)
            .take(count)
            .copied()
            .collect()
    }

    /// Physical-unit samples for the same window as [`Channel::get_digital_samples`]
    pub fn get_physical_samples(&self, t0: f64, dt: Option<f64>, n: Option<usize>) -> Vec<f64> {
        let bit_value = self.bit_value();
        let offset = self.offset();
        self.get_digital_samples(t0, dt, n)
            .into_iter()
            .map(|d| bit_value * (offset + d as f64))
            .collect()
    }

    /// All stored records re-serialized as little-endian bytes.
    ///
    /// For the `EDF Annotations` channel this is the TAL text region.
    pub fn raw_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.num_samples() * 2);
        for sample in self.records.iter().flatten() {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }

    pub fn is_annotation(&self) -> bool {
        self.label == crate::EDF_ANNOTATION_LABEL
    }
}

// NaN和负数按0处理
fn seconds_to_index(seconds: f64, rate: f64) -> usize {
    let index = (seconds * rate).floor();
    if index.is_finite() && index > 0.0 {
        index as usize
    } else {
        0
    }
}

fn seconds_to_count(seconds: f64, rate: f64) -> usize {
    let count = (seconds * rate).round();
    if count.is_nan() || count <= 0.0 {
        0
    } else {
        // 无穷大饱和为usize::MAX
        count as usize
    }
}
