// Internal utilities for documentation tests and integration tests
// This file assembles synthetic EDF byte buffers in memory

use crate::channel::CHANNEL_FIELDS;
use crate::EDF_ANNOTATION_LABEL;

/// Sub-header values for one synthetic signal
#[derive(Debug, Clone)]
pub struct SignalSpec {
    pub label: String,
    pub transducer: String,
    pub physical_dimension: String,
    pub physical_min: f64,
    pub physical_max: f64,
    pub digital_min: i32,
    pub digital_max: i32,
    pub prefiltering: String,
    pub samples_per_record: usize,
}

impl SignalSpec {
    pub fn new(label: &str, samples_per_record: usize) -> Self {
        SignalSpec {
            label: label.to_string(),
            transducer: "AgAgCl electrodes".to_string(),
            physical_dimension: "uV".to_string(),
            physical_min: -200.0,
            physical_max: 200.0,
            digital_min: -32768,
            digital_max: 32767,
            prefiltering: "HP:0.1Hz LP:70Hz".to_string(),
            samples_per_record,
        }
    }

    /// `EDF Annotations` channel holding `2 * samples_per_record` TAL bytes per record
    pub fn annotations(samples_per_record: usize) -> Self {
        SignalSpec {
            label: EDF_ANNOTATION_LABEL.to_string(),
            transducer: String::new(),
            physical_dimension: String::new(),
            physical_min: -1.0,
            physical_max: 1.0,
            digital_min: -32768,
            digital_max: 32767,
            prefiltering: String::new(),
            samples_per_record,
        }
    }

    pub fn physical(mut self, min: f64, max: f64, dimension: &str) -> Self {
        self.physical_min = min;
        self.physical_max = max;
        self.physical_dimension = dimension.to_string();
        self
    }

    pub fn digital(mut self, min: i32, max: i32) -> Self {
        self.digital_min = min;
        self.digital_max = max;
        self
    }

    fn column(&self, name: &str) -> String {
        match name {
            "label" => self.label.clone(),
            "transducer" => self.transducer.clone(),
            "physical_dimension" => self.physical_dimension.clone(),
            "physical_min" => self.physical_min.to_string(),
            "physical_max" => self.physical_max.to_string(),
            "digital_min" => self.digital_min.to_string(),
            "digital_max" => self.digital_max.to_string(),
            "prefiltering" => self.prefiltering.clone(),
            "num_samples_per_record" => self.samples_per_record.to_string(),
            _ => String::new(),
        }
    }
}

/// Builds an EDF file image: global header, columnar channel sub-header and
/// record-major sample blob.
///
/// Header counts are computed from the signals and records unless
/// overridden, so malformed files can be produced on purpose.
#[derive(Debug, Clone)]
pub struct EdfBuilder {
    version: String,
    patient_id: String,
    recording_id: String,
    start_date: String,
    start_time: String,
    reserved: String,
    record_duration: f64,
    declared_records: Option<String>,
    signals: Vec<SignalSpec>,
    records: Vec<Vec<Vec<i16>>>,
}

impl Default for EdfBuilder {
    fn default() -> Self {
        EdfBuilder {
            version: "0".to_string(),
            patient_id: "X X X X".to_string(),
            recording_id: "Startdate X X X X".to_string(),
            start_date: "04.07.23".to_string(),
            start_time: "13.05.09".to_string(),
            reserved: String::new(),
            record_duration: 1.0,
            declared_records: None,
            signals: Vec::new(),
            records: Vec::new(),
        }
    }
}

impl EdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patient_id(mut self, patient_id: &str) -> Self {
        self.patient_id = patient_id.to_string();
        self
    }

    pub fn recording_id(mut self, recording_id: &str) -> Self {
        self.recording_id = recording_id.to_string();
        self
    }

    pub fn start(mut self, date: &str, time: &str) -> Self {
        self.start_date = date.to_string();
        self.start_time = time.to_string();
        self
    }

    pub fn reserved(mut self, reserved: &str) -> Self {
        self.reserved = reserved.to_string();
        self
    }

    pub fn record_duration(mut self, seconds: f64) -> Self {
        self.record_duration = seconds;
        self
    }

    /// Overrides the record count written to the header
    pub fn declared_records(mut self, records: &str) -> Self {
        self.declared_records = Some(records.to_string());
        self
    }

    pub fn signal(mut self, signal: SignalSpec) -> Self {
        self.signals.push(signal);
        self
    }

    /// Appends one data record, one sample vector per signal in signal order
    pub fn record(mut self, samples: Vec<Vec<i16>>) -> Self {
        self.records.push(samples);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let num_signals = self.signals.len();
        let num_header_bytes = (num_signals + 1) * crate::EDF_HEADER_BYTES;
        let declared_records = self
            .declared_records
            .clone()
            .unwrap_or_else(|| self.records.len().to_string());

        let mut bytes = Vec::with_capacity(num_header_bytes);
        for (value, width) in [
            (self.version.clone(), 8),
            (self.patient_id.clone(), 80),
            (self.recording_id.clone(), 80),
            (self.start_date.clone(), 8),
            (self.start_time.clone(), 8),
            (num_header_bytes.to_string(), 8),
            (self.reserved.clone(), 44),
            (declared_records, 8),
            (self.record_duration.to_string(), 8),
            (num_signals.to_string(), 4),
        ] {
            bytes.extend_from_slice(&pad(&value, width));
        }

        // 按列写入通道头
        for field in CHANNEL_FIELDS {
            for signal in &self.signals {
                bytes.extend_from_slice(&pad(&signal.column(field.name), field.width));
            }
        }

        for record in &self.records {
            for samples in record {
                for sample in samples {
                    bytes.extend_from_slice(&sample.to_le_bytes());
                }
            }
        }

        bytes
    }
}

/// Packs TAL text into annotation-channel samples, zero padded to `samples_per_record`
pub fn tal_samples(tal: &[u8], samples_per_record: usize) -> Vec<i16> {
    let mut bytes = tal.to_vec();
    bytes.resize(samples_per_record * 2, 0);
    bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect()
}

fn pad(value: &str, width: usize) -> Vec<u8> {
    let mut field: Vec<u8> = value.bytes().take(width).collect();
    field.resize(width, b' ');
    field
}

/// 10Hz正弦波，数字值
fn sine_record(record: usize, samples_per_record: usize) -> Vec<i16> {
    (0..samples_per_record)
        .map(|i| {
            let t = (record * samples_per_record + i) as f64 / samples_per_record as f64;
            (8000.0 * (2.0 * std::f64::consts::PI * 10.0 * t).sin()) as i16
        })
        .collect()
}

/// Two seconds of a 256 Hz `EEG Fp1` channel plus an annotation channel (EDF+C)
pub fn simple_test_buffer() -> Vec<u8> {
    let mut builder = EdfBuilder::new()
        .reserved("EDF+C")
        .patient_id("DOC001 M 01-JAN-1990 Test_Patient")
        .recording_id("Startdate 04-JUL-2023 X X X")
        .signal(SignalSpec::new("EEG Fp1", 256))
        .signal(SignalSpec::annotations(30));

    for record in 0..2 {
        let tal = format!("+{}\x14\x14\x00", record);
        builder = builder.record(vec![sine_record(record, 256), tal_samples(tal.as_bytes(), 30)]);
    }

    builder.build()
}

/// Three one-second records of EDF+C with a few annotations
pub fn annotated_test_buffer() -> Vec<u8> {
    let tals: [&[u8]; 3] = [
        b"+0\x14\x14\x00+0\x14Recording Start\x14\x00",
        b"+1\x14\x14\x00+1.5\x152\x14Sleep Stage N1\x14\x00",
        b"+2\x14\x14\x00+2.25\x14Eye Movement\x14Artifact\x14\x00",
    ];

    let mut builder = EdfBuilder::new()
        .reserved("EDF+C")
        .signal(SignalSpec::new("EEG C3", 16))
        .signal(SignalSpec::annotations(30));

    for (record, tal) in tals.iter().enumerate() {
        builder = builder.record(vec![sine_record(record, 16), tal_samples(tal, 30)]);
    }

    builder.build()
}
