use std::fmt;

/// EDF variant, derived from the reserved field of the global header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    /// Legacy EDF, no annotation channel
    #[default]
    Edf,
    /// EDF+ continuous recording
    EdfPlusC,
    /// EDF+ discontinuous recording
    EdfPlusD,
}

impl FileType {
    /// Derives the file type from the header's reserved field.
    ///
    /// 空白或未知标记按普通EDF处理
    pub fn from_reserved(reserved: &str) -> Self {
        let marker = reserved.trim();
        if marker.starts_with("EDF+C") {
            FileType::EdfPlusC
        } else if marker.starts_with("EDF+D") {
            FileType::EdfPlusD
        } else {
            FileType::Edf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Edf => "EDF",
            FileType::EdfPlusC => "EDF+C",
            FileType::EdfPlusD => "EDF+D",
        }
    }

    pub fn is_edfplus(&self) -> bool {
        !matches!(self, FileType::Edf)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a fixed-width slice is turned into a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Keep the slice as-is, padding included
    Raw,
    /// Strip the space padding
    Text,
    /// Parse as a number, NaN when the slice is not numeric
    Number,
}

/// One entry of a fixed-width field table: name, coercion and byte width.
///
/// Tables are plain ordered slices of these; iteration order is byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub coercion: Coercion,
    pub width: usize,
}

impl FieldSpec {
    pub const fn new(name: &'static str, coercion: Coercion, width: usize) -> Self {
        FieldSpec { name, coercion, width }
    }
}

/// A coerced fixed-width field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Number(n) if n.is_nan() => String::new(),
            FieldValue::Number(n) => n.to_string(),
        }
    }

    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => crate::utils::atof_or_nan(s),
        }
    }

    /// The value as a non-negative count.
    ///
    /// NaN和负数都按0处理
    pub fn as_count(&self) -> usize {
        let n = self.as_number();
        if n.is_finite() && n > 0.0 {
            n as usize
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub onset: i64,           // 开始时间（100纳秒为单位）
    pub duration: i64,        // 持续时间（100纳秒为单位，-1表示未知）
    pub description: String,  // UTF-8描述
}

impl Annotation {
    pub fn onset_seconds(&self) -> f64 {
        self.onset as f64 / crate::EDFLIB_TIME_DIMENSION as f64
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        if self.duration >= 0 {
            Some(self.duration as f64 / crate::EDFLIB_TIME_DIMENSION as f64)
        } else {
            None
        }
    }
}

/// Non-fatal problem noticed while decoding.
///
/// Decoding degrades instead of failing on these; each one is also logged
/// with `log::warn!`.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A header region was shorter than the layout requires
    ShortHeader { region: &'static str, expected: usize, actual: usize },
    /// Declared and actual sample counts disagree; decoding continued best-effort
    SizeMismatch { expected: usize, actual: usize },
    /// The fallback path kept `record_duration * num_records` as the duration
    DurationFromDeclaredRecords { duration: f64 },
    /// Start date/time fields could not be combined into a timestamp
    InvalidStartTimestamp { date: String, time: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ShortHeader { region, expected, actual } => {
                write!(f, "{} is {} bytes, expected {}", region, actual, expected)
            }
            Diagnostic::SizeMismatch { expected, actual } => {
                write!(f, "header declares {} samples but blob holds {}", expected, actual)
            }
            Diagnostic::DurationFromDeclaredRecords { duration } => {
                write!(f, "duration {}s taken from declared record count", duration)
            }
            Diagnostic::InvalidStartTimestamp { date, time } => {
                write!(f, "cannot parse start timestamp '{}' '{}'", date, time)
            }
        }
    }
}
