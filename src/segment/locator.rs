/*!
 * Boundary location for partially translatable documents.
 *
 * A document is split by two literal markers into a preserved head, a
 * translatable middle and a preserved tail. Missing markers degrade to
 * translating more of the document; they are never an error.
 */

use log::{debug, warn};

/// Two literal anchors delimiting the translatable span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPair {
    /// End of the preserved head (the marker itself is preserved)
    pub before: String,
    /// Start of the preserved tail (the marker itself is preserved)
    pub after: String,
}

impl MarkerPair {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}

/// Which markers were found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionCase {
    NoMarkers,
    AfterOnly,
    BeforeOnly,
    Both,
}

/// A document split into preserved and translatable regions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Verbatim head, marker included
    pub keep_before: String,
    /// Text handed to the chunker
    pub translatable: String,
    /// Verbatim tail, marker included
    pub keep_after: String,
    /// How the partition was derived
    pub case: PartitionCase,
}

impl Partition {
    /// Whether anything is left to translate
    pub fn has_translatable(&self) -> bool {
        !self.translatable.trim().is_empty()
    }
}

fn find_marker(text: &str, marker: &str, from: usize) -> Option<usize> {
    if marker.is_empty() || from > text.len() {
        return None;
    }
    text[from..].find(marker).map(|offset| from + offset)
}

/// Partition `text` around the marker pair.
///
/// `after` is only searched from the end of the first `before` occurrence, so
/// an `after` that precedes `before` is never used.
pub fn locate(text: &str, markers: &MarkerPair) -> Partition {
    let before_end = find_marker(text, &markers.before, 0).map(|index| index + markers.before.len());
    let after_index = find_marker(text, &markers.after, before_end.unwrap_or(0));

    match (before_end, after_index) {
        (None, None) => {
            warn!("No markers found, translating the entire document");
            Partition {
                keep_before: String::new(),
                translatable: text.to_string(),
                keep_after: String::new(),
                case: PartitionCase::NoMarkers,
            }
        }
        (None, Some(after)) => {
            warn!("Leading marker not found, keeping content from the trailing marker on as-is");
            Partition {
                keep_before: String::new(),
                translatable: text[..after].trim().to_string(),
                keep_after: text[after..].to_string(),
                case: PartitionCase::AfterOnly,
            }
        }
        (Some(before), None) => {
            warn!("Trailing marker not found, keeping content up to the leading marker as-is");
            Partition {
                keep_before: text[..before].to_string(),
                translatable: text[before..].trim().to_string(),
                keep_after: String::new(),
                case: PartitionCase::BeforeOnly,
            }
        }
        (Some(before), Some(after)) => {
            debug!("Both markers located: translatable span {}..{}", before, after);
            Partition {
                keep_before: text[..before].to_string(),
                translatable: text[before..after].trim().to_string(),
                keep_after: text[after..].to_string(),
                case: PartitionCase::Both,
            }
        }
    }
}
