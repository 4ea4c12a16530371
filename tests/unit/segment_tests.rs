/*!
 * Tests for boundary location and chunking
 */

use changelog_translator::segment::{join_chunks, locate, Chunker, MarkerPair, PartitionCase};
use crate::common::{self, MARKER_AFTER, MARKER_BEFORE};

fn markers() -> MarkerPair {
    MarkerPair::new(MARKER_BEFORE, MARKER_AFTER)
}

/// The regions outside the markers are kept byte-for-byte
#[test]
fn test_locate_withChangelogPage_shouldKeepComponentCode() {
    let document = common::changelog_document(&[common::entry("Dec 04, 2025", "Added Lineage.")]);
    let partition = locate(&document, &markers());
    let (before, after) = common::preserved_regions(&document);

    assert_eq!(partition.case, PartitionCase::Both);
    assert_eq!(partition.keep_before, before);
    assert_eq!(partition.keep_after, after);
    assert!(partition.translatable.starts_with("<Update"));
    assert!(partition.translatable.ends_with("</Update>"));
}

/// Without markers the whole document is translatable
#[test]
fn test_locate_withoutMarkers_shouldTranslateEverything() {
    let partition = locate("## Dec 04, 2025\n\nPlain text.", &markers());

    assert_eq!(partition.case, PartitionCase::NoMarkers);
    assert!(partition.keep_before.is_empty());
    assert!(partition.keep_after.is_empty());
    assert_eq!(partition.translatable, "## Dec 04, 2025\n\nPlain text.");
}

/// A trailing marker before the leading one is never used
#[test]
fn test_locate_withMarkersOutOfOrder_shouldIgnoreEarlierTrailingMarker() {
    let document = format!("{}\nintro\n{}\nbody", MARKER_AFTER, MARKER_BEFORE);
    let partition = locate(&document, &markers());

    assert_eq!(partition.case, PartitionCase::BeforeOnly);
    assert_eq!(partition.translatable, "body");
    assert!(partition.keep_after.is_empty());
}

/// Chunks stay under the limit and follow entry boundaries
#[test]
fn test_chunker_withManyEntries_shouldRespectLimitAndOrder() {
    let entries: Vec<String> = (1..=6)
        .map(|day| common::entry(&format!("Dec {:02}, 2025", day), "Some changes were made."))
        .collect();
    let text = entries.join("\n");
    let chunker = Chunker::new(150).with_unit_pattern("<Update");

    let chunks = chunker.split(text.trim());

    assert!(chunks.len() >= 3);
    for (position, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index, position + 1);
        assert!(chunk.char_len() <= 150);
        assert!(chunk.text.starts_with("<Update"));
    }
    assert_eq!(join_chunks(&chunks.iter().map(|c| c.text.clone()).collect::<Vec<_>>()), text.trim());
}

/// A single line longer than the limit becomes its own chunk
#[test]
fn test_chunker_withOversizeLine_shouldEmitItWhole() {
    let long_line = "x".repeat(120);
    let text = format!("short\n\n{}\n\nend", long_line);

    let chunks = Chunker::new(50).split(&text);

    assert!(chunks.iter().any(|c| c.text == long_line));
    assert_eq!(chunks.first().map(|c| c.text.as_str()), Some("short"));
    assert_eq!(chunks.last().map(|c| c.text.as_str()), Some("end"));
}

/// Lengths are counted in characters, not bytes
#[test]
fn test_chunker_withMultibyteText_shouldCountCharacters() {
    let paragraph = "变".repeat(40);
    let chunks = Chunker::new(40).split(&paragraph);
    assert_eq!(chunks.len(), 1);
}
