/*!
 * Document segmentation.
 *
 * - `locator`: splits a document into preserved and translatable regions
 * - `chunker`: splits the translatable region into size-bounded chunks
 * - `headings`: finds heading lines used as entry identifiers
 */

pub mod chunker;
pub mod headings;
pub mod locator;

pub use self::chunker::{join_chunks, Chunk, Chunker, CHUNK_SEPARATOR};
pub use self::headings::{heading_lines, HeadingLine};
pub use self::locator::{locate, MarkerPair, Partition, PartitionCase};
