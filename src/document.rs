use std::collections::HashMap;

use chrono::{NaiveDateTime, TimeDelta};

use crate::blob;
use crate::channel::Channel;
use crate::channel_table::{decode_channel_table, index_by_label};
use crate::error::{EdfError, Result};
use crate::header::decode_header;
use crate::reader::EdfReader;
use crate::tal;
use crate::types::{Annotation, Diagnostic, FileType};
use crate::utils::parse_start_datetime;
use crate::{EDF_ANNOTATION_LABEL, EDF_HEADER_BYTES};

/// A decoded EDF or EDF+ recording.
///
/// The scalar fields mirror the 256-byte global header. Channels, the label
/// index and the derived duration/sampling rates are only reachable through
/// accessors, since they are rebuilt together on every decode.
///
/// # Examples
///
/// ```rust
/// use edfdecoder::{EdfDocument, FileType};
///
/// # let bytes = edfdecoder::doctest_utils::simple_test_buffer();
/// let doc = EdfDocument::from_bytes(&bytes)?;
///
/// assert_eq!(doc.file_type(), FileType::EdfPlusC);
/// println!("Duration: {:?} seconds", doc.duration());
///
/// for channel in doc.channels() {
///     println!("{}: {} Hz, {} samples",
///         channel.label, channel.sampling_rate(), channel.num_samples());
/// }
/// # Ok::<(), edfdecoder::EdfError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdfDocument {
    pub version: String,
    pub patient_id: String,
    pub recording_id: String,
    /// `dd.mm.yy` as stored
    pub start_date: String,
    /// `hh.mm.ss` as stored
    pub start_time: String,
    pub start_timestamp: Option<NaiveDateTime>,
    pub num_header_bytes: usize,
    /// Reserved field, untrimmed
    pub reserved: String,
    pub num_records: usize,
    /// Seconds per data record
    pub record_duration: f64,
    pub num_channels: usize,
    pub(crate) channels: Vec<Channel>,
    channel_by_label: HashMap<String, usize>,
    pub(crate) duration: Option<f64>,
    pub(crate) sampling_rate: HashMap<String, f64>,
    diagnostics: Vec<Diagnostic>,
}

impl EdfDocument {
    /// Decodes a complete in-memory EDF file with default options.
    ///
    /// Equivalent to `EdfReader::new().decode(bytes)`; see [`EdfReader`] for
    /// header-only and strict decoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        EdfReader::new().decode(bytes)
    }

    /// Runs the decode pipeline on `bytes`, replacing all previous content.
    ///
    /// header → channel table → (unless `header_only`) blob validation and
    /// de-interleaving. A file with zero channels stops after the header.
    pub(crate) fn load(&mut self, bytes: &[u8], header_only: bool, strict_size: bool) -> Result<()> {
        *self = EdfDocument::default();

        if bytes.len() < EDF_HEADER_BYTES {
            self.warn(Diagnostic::ShortHeader {
                region: "global header",
                expected: EDF_HEADER_BYTES,
                actual: bytes.len(),
            });
        }

        decode_header(self, bytes);

        self.start_timestamp = parse_start_datetime(&self.start_date, &self.start_time);
        if self.start_timestamp.is_none() {
            self.warn(Diagnostic::InvalidStartTimestamp {
                date: self.start_date.clone(),
                time: self.start_time.clone(),
            });
        }

        if self.num_channels == 0 {
            log::debug!("no channels declared, skipping channel table and blob");
            return Ok(());
        }

        let sub_header_len = self.num_header_bytes.saturating_sub(EDF_HEADER_BYTES);
        let start = EDF_HEADER_BYTES.min(bytes.len());
        let end = self.num_header_bytes.max(start).min(bytes.len());
        if end - start < sub_header_len {
            self.warn(Diagnostic::ShortHeader {
                region: "channel sub-header",
                expected: sub_header_len,
                actual: end - start,
            });
        }

        let mut channels = decode_channel_table(&bytes[start..end], self.num_channels);
        for channel in channels.iter_mut() {
            channel.init(self.num_records, self.record_duration);
        }
        self.set_channels(channels);

        if header_only {
            return Ok(());
        }

        blob::decode_blob(self, bytes, strict_size)
    }

    /// Replaces the channel table and rebuilds the label index
    pub(crate) fn set_channels(&mut self, channels: Vec<Channel>) {
        self.channel_by_label = index_by_label(&channels);
        self.channels = channels;
    }

    pub(crate) fn warn(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// EDF variant from the reserved field; blank means plain `EDF`
    pub fn file_type(&self) -> FileType {
        FileType::from_reserved(&self.reserved)
    }

    /// Channels in sub-header order
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Looks up a channel by its trimmed label.
    ///
    /// # Errors
    ///
    /// * `EdfError::UnknownChannel` - no channel carries `label`
    pub fn channel(&self, label: &str) -> Result<&Channel> {
        self.channel_by_label
            .get(label)
            .and_then(|&i| self.channels.get(i))
            .ok_or_else(|| EdfError::UnknownChannel(label.to_string()))
    }

    /// Labels known to the index, in channel order.
    ///
    /// A duplicated label appears once, at its last position.
    pub fn labels(&self) -> Vec<&str> {
        self.channels
            .iter()
            .enumerate()
            .filter(|(i, c)| self.channel_by_label.get(&c.label) == Some(i))
            .map(|(_, c)| c.label.as_str())
            .collect()
    }

    /// Total recorded seconds, derived from the blob.
    ///
    /// `None` until the blob has been decoded (header-only loads and
    /// zero-channel files).
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Samples per second of the channel labelled `label`, after blob decoding
    pub fn sampling_rate(&self, label: &str) -> Option<f64> {
        self.sampling_rate.get(label).copied()
    }

    pub fn sampling_rates(&self) -> &HashMap<String, f64> {
        &self.sampling_rate
    }

    /// Problems tolerated during the last decode
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Wall-clock time `offset_ms` milliseconds after the recording start.
    ///
    /// `None` when the header's start date/time could not be parsed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edfdecoder::EdfDocument;
    ///
    /// # let bytes = edfdecoder::doctest_utils::simple_test_buffer();
    /// let doc = EdfDocument::from_bytes(&bytes)?;
    ///
    /// let start = doc.timestamp_at(0).unwrap();
    /// let later = doc.timestamp_at(1_500).unwrap();
    /// assert_eq!((later - start).num_milliseconds(), 1_500);
    /// # Ok::<(), edfdecoder::EdfError>(())
    /// ```
    pub fn timestamp_at(&self, offset_ms: i64) -> Option<NaiveDateTime> {
        let start = self.start_timestamp?;
        start.checked_add_signed(TimeDelta::try_milliseconds(offset_ms)?)
    }

    /// Physical-unit samples for a time window, keyed by channel label.
    ///
    /// * `t0` - window start in seconds, default 0
    /// * `dt` - window length in seconds; defaults to the whole duration
    ///   when `n` is also unset
    /// * `labels` - channels to extract, default all labels in channel order
    /// * `n` - window length in samples, takes precedence over `dt`
    ///
    /// The future resolves once with the complete result.
    ///
    /// # Errors
    ///
    /// * `EdfError::UnknownChannel` - a requested label is not in the file
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edfdecoder::EdfDocument;
    ///
    /// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
    /// # let bytes = edfdecoder::doctest_utils::simple_test_buffer();
    /// let doc = EdfDocument::from_bytes(&bytes)?;
    ///
    /// // One second of EEG starting at t = 0.5s
    /// let samples = doc
    ///     .get_physical_samples(Some(0.5), Some(1.0), Some(&["EEG Fp1"][..]), None)
    ///     .await?;
    /// assert_eq!(samples["EEG Fp1"].len(), 256);
    /// # Ok::<(), edfdecoder::EdfError>(())
    /// # })?;
    /// # Ok::<(), edfdecoder::EdfError>(())
    /// ```
    pub async fn get_physical_samples(
        &self,
        t0: Option<f64>,
        dt: Option<f64>,
        labels: Option<&[&str]>,
        n: Option<usize>,
    ) -> Result<HashMap<String, Vec<f64>>> {
        let t0 = t0.unwrap_or(0.0);
        let dt = match (dt, n) {
            (None, None) => self.duration,
            _ => dt,
        };
        let labels = match labels {
            Some(labels) => labels.to_vec(),
            None => self.labels(),
        };

        let mut result = HashMap::with_capacity(labels.len());
        for label in labels {
            let channel = self.channel(label)?;
            result.insert(label.to_string(), channel.get_physical_samples(t0, dt, n));
        }

        Ok(result)
    }

    /// Annotations stored in the `EDF Annotations` channel.
    ///
    /// # Errors
    ///
    /// * `EdfError::UnsupportedOperation` - the file is plain EDF
    /// * `EdfError::UnknownChannel` - an EDF+ file without annotation channel
    /// * `EdfError::InvalidFormat` - the annotation channel holds malformed TALs
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edfdecoder::EdfDocument;
    ///
    /// # let bytes = edfdecoder::doctest_utils::annotated_test_buffer();
    /// let doc = EdfDocument::from_bytes(&bytes)?;
    ///
    /// for annotation in doc.annotations()? {
    ///     println!("{:.3}s: {}", annotation.onset_seconds(), annotation.description);
    /// }
    /// # Ok::<(), edfdecoder::EdfError>(())
    /// ```
    pub fn annotations(&self) -> Result<Vec<Annotation>> {
        let file_type = self.file_type();
        if !file_type.is_edfplus() {
            return Err(EdfError::UnsupportedOperation(format!(
                "annotations are not available in {} files",
                file_type
            )));
        }

        let channel = self.channel(EDF_ANNOTATION_LABEL)?;
        tal::parse_annotations(&channel.raw_bytes())
    }
}
