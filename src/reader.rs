use std::path::Path;

use crate::document::EdfDocument;
use crate::error::{EdfError, Result};

/// Decode options and entry points for EDF/EDF+ buffers and files
///
/// The reader holds no data itself; every call produces an independent
/// [`EdfDocument`].
///
/// # Examples
///
/// ## Decoding a buffer
///
/// ```rust
/// use edfdecoder::EdfReader;
///
/// # let bytes = edfdecoder::doctest_utils::simple_test_buffer();
/// let doc = EdfReader::new().decode(&bytes)?;
/// println!("Channels: {}", doc.channels().len());
/// # Ok::<(), edfdecoder::EdfError>(())
/// ```
///
/// ## Header only
///
/// ```rust
/// use edfdecoder::EdfReader;
///
/// # let bytes = edfdecoder::doctest_utils::simple_test_buffer();
/// let doc = EdfReader::new().header_only(true).decode(&bytes)?;
///
/// // Channel metadata is available, samples are not
/// assert_eq!(doc.channels()[0].label, "EEG Fp1");
/// assert_eq!(doc.channels()[0].num_samples(), 0);
/// assert_eq!(doc.duration(), None);
/// # Ok::<(), edfdecoder::EdfError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdfReader {
    header_only: bool,
    strict_size: bool,
}

impl EdfReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after the global header and channel table
    pub fn header_only(mut self, header_only: bool) -> Self {
        self.header_only = header_only;
        self
    }

    /// Fail with `EdfError::SizeMismatch` instead of decoding a blob whose
    /// size disagrees with the header
    pub fn strict_size(mut self, strict_size: bool) -> Self {
        self.strict_size = strict_size;
        self
    }

    /// Decodes an in-memory EDF file.
    ///
    /// Malformed headers and blob size mismatches degrade rather than fail
    /// (unless `strict_size` is set); see [`EdfDocument::diagnostics`].
    ///
    /// # Errors
    ///
    /// * `EdfError::SizeMismatch` - only with `strict_size(true)`
    pub fn decode(&self, bytes: &[u8]) -> Result<EdfDocument> {
        let mut doc = EdfDocument::default();
        doc.load(bytes, self.header_only, self.strict_size)?;
        Ok(doc)
    }

    /// Reads a whole file and decodes it.
    ///
    /// The returned future resolves once; the file is read completely
    /// before decoding starts.
    ///
    /// # Errors
    ///
    /// * `EdfError::FileNotFound` - the file cannot be opened
    /// * `EdfError::Io` - reading failed part-way
    /// * `EdfError::SizeMismatch` - only with `strict_size(true)`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edfdecoder::EdfReader;
    ///
    /// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
    /// # std::fs::write("recording.edf", edfdecoder::doctest_utils::simple_test_buffer())?;
    /// let doc = EdfReader::new().open("recording.edf").await?;
    /// println!("Patient: {}", doc.patient_id);
    ///
    /// match EdfReader::new().open("nonexistent.edf").await {
    ///     Err(edfdecoder::EdfError::FileNotFound(msg)) => println!("File not found: {}", msg),
    ///     other => println!("Unexpected: {:?}", other.map(|d| d.num_channels)),
    /// }
    /// # std::fs::remove_file("recording.edf").ok();
    /// # Ok::<(), edfdecoder::EdfError>(())
    /// # })?;
    /// # Ok::<(), edfdecoder::EdfError>(())
    /// ```
    pub async fn open<P: AsRef<Path>>(&self, path: P) -> Result<EdfDocument> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                EdfError::FileNotFound(format!("{}: {}", path.display(), e))
            }
            _ => EdfError::Io(e),
        })?;

        log::debug!("read {} bytes from {}", bytes.len(), path.display());
        self.decode(&bytes)
    }
}
