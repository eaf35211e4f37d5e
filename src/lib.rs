//! # EDF/EDF+ Decoder for Rust
//!
//! A pure Rust decoder for EDF and EDF+ (European Data Format) recordings held
//! in memory. The decoder parses the ASCII header and the columnar channel
//! sub-header, checks the sample blob against the declared sizes and splits it
//! into per-channel, per-record sample arrays.
//!
//! ## Quick Start
//!
//! ```rust
//! use edfdecoder::{EdfDocument, Result};
//!
//! fn main() -> Result<()> {
//!     # let bytes = edfdecoder::doctest_utils::simple_test_buffer();
//!     // `bytes` holds a complete EDF file
//!     let doc = EdfDocument::from_bytes(&bytes)?;
//!
//!     println!("Type: {}", doc.file_type());
//!     println!("Records: {} x {}s", doc.num_records, doc.record_duration);
//!
//!     for label in doc.labels() {
//!         println!("{}: {:?} Hz", label, doc.sampling_rate(label));
//!     }
//!
//!     // Raw digital samples of the first record
//!     let eeg = doc.channel("EEG Fp1")?;
//!     println!("First record: {} samples", eeg.record(0).map_or(0, |r| r.len()));
//!     Ok(())
//! }
//! ```
//!
//! ## Physical vs Digital Values
//!
//! EDF stores data as 16-bit integers but represents real-world measurements.
//! Each channel maps its digital range linearly onto its physical range:
//!
//! ```rust
//! use edfdecoder::Channel;
//!
//! let mut channel = Channel::default();
//! channel.physical_max = 100.0;    // +100 µV
//! channel.physical_min = -100.0;   // -100 µV
//! channel.digital_max = 32767.0;   // 16-bit max
//! channel.digital_min = -32768.0;  // 16-bit min
//!
//! let physical_value = channel.to_physical(16384);
//! assert!((physical_value - 50.0).abs() < 0.1);
//! ```
//!
//! ## Malformed files
//!
//! Truncated headers and blobs whose size disagrees with the header do not
//! abort decoding. The decoder continues best-effort, logs a warning through
//! the `log` facade and records a [`Diagnostic`] on the document:
//!
//! ```rust
//! use edfdecoder::{Diagnostic, EdfDocument};
//!
//! # let mut bytes = edfdecoder::doctest_utils::simple_test_buffer();
//! bytes.truncate(bytes.len() - 100);
//! let doc = EdfDocument::from_bytes(&bytes)?;
//!
//! assert!(doc
//!     .diagnostics()
//!     .iter()
//!     .any(|d| matches!(d, Diagnostic::SizeMismatch { .. })));
//! # Ok::<(), edfdecoder::EdfError>(())
//! ```

pub mod error;
pub mod types;
pub mod utils;
pub mod header;
pub mod channel;
pub mod channel_table;
pub mod blob;
pub mod tal;
pub mod document;
pub mod reader;

#[doc(hidden)]
pub mod doctest_utils; // For internal doctest support

// Re-export main types for convenience
pub use error::{EdfError, Result};
pub use types::{Annotation, Diagnostic, FileType};
pub use channel::Channel;
pub use document::EdfDocument;
pub use reader::EdfReader;

// Important constants
pub const EDFLIB_TIME_DIMENSION: i64 = 10_000_000; // 100 nanoseconds unit
pub const EDF_HEADER_BYTES: usize = 256;
pub const EDF_ANNOTATION_LABEL: &str = "EDF Annotations";

/// Library version
///
/// Returns the current version of the edfdecoder library.
///
/// # Examples
///
/// ```rust
/// let version = edfdecoder::version();
/// assert!(!version.is_empty());
/// assert!(version.contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
