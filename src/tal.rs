//! Time-stamped Annotation Lists (TAL) as stored in an `EDF Annotations` channel.
//!
//! Each TAL has the form `+<onset>[\x15<duration>]\x14<text>\x14...\x14\x00`.
//! Onset and duration are decimal seconds; several texts may share one onset.
//! The first TAL of every data record carries no text and only marks the
//! record's start time.

use crate::error::{EdfError, Result};
use crate::types::Annotation;
use crate::utils::parse_edf_time;

const TAL_END: u8 = 0x00;
const DURATION_SEPARATOR: u8 = 0x15;
const TEXT_SEPARATOR: u8 = 0x14;

/// Parses every TAL in `bytes` into annotations, in storage order.
///
/// Zero padding between TALs and at the end of records is skipped, as are
/// time-keeping TALs without text.
///
/// # Errors
///
/// * `EdfError::InvalidFormat` - a TAL does not start with a signed onset,
///   or its onset/duration is not a decimal number
///
/// # Examples
///
/// ```rust
/// use edfdecoder::tal::parse_annotations;
///
/// let bytes = b"+0\x14\x14\x00+1.5\x152\x14Sleep Stage N1\x14\x00\x00\x00";
/// let annotations = parse_annotations(bytes)?;
///
/// assert_eq!(annotations.len(), 1);
/// assert_eq!(annotations[0].onset, 15_000_000);
/// assert_eq!(annotations[0].duration, 20_000_000);
/// assert_eq!(annotations[0].description, "Sleep Stage N1");
/// # Ok::<(), edfdecoder::EdfError>(())
/// ```
pub fn parse_annotations(bytes: &[u8]) -> Result<Vec<Annotation>> {
    let mut annotations = Vec::new();

    for tal in bytes.split(|&b| b == TAL_END) {
        if tal.is_empty() {
            continue;
        }
        parse_tal(tal, &mut annotations)?;
    }

    Ok(annotations)
}

fn parse_tal(tal: &[u8], out: &mut Vec<Annotation>) -> Result<()> {
    let mut parts = tal.split(|&b| b == TEXT_SEPARATOR);
    let timing = parts.next().unwrap_or_default();

    if !matches!(timing.first(), Some(b'+') | Some(b'-')) {
        return Err(EdfError::InvalidFormat(format!(
            "TAL onset must start with '+' or '-': {:?}",
            String::from_utf8_lossy(timing)
        )));
    }

    let mut timing_parts = timing.splitn(2, |&b| b == DURATION_SEPARATOR);
    let onset = parse_edf_time(&String::from_utf8_lossy(timing_parts.next().unwrap_or_default()))?;
    let duration = match timing_parts.next() {
        Some(d) if !d.is_empty() => parse_edf_time(&String::from_utf8_lossy(d))?,
        _ => -1,
    };

    for text in parts {
        if text.is_empty() {
            continue;
        }
        out.push(Annotation {
            onset,
            duration,
            description: String::from_utf8_lossy(text).into_owned(),
        });
    }

    Ok(())
}
