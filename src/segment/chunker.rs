/*!
 * Size-bounded splitting of the translatable span.
 *
 * Chunks follow structural units (one changelog entry per opening tag) when
 * the document has them, and fall back to blank-line paragraphs, then single
 * lines, when it does not or when a unit is too large on its own.
 */

use log::debug;

/// Separator placed between chunks when they are joined back together
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// One piece of the translatable span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based position in the document
    pub index: usize,
    /// Chunk content, trimmed
    pub text: String,
}

impl Chunk {
    /// Length in characters
    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }
}

/// Splits text into ordered chunks of at most `max_chars` characters
#[derive(Debug, Clone)]
pub struct Chunker {
    max_chars: usize,
    unit_pattern: String,
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Accumulate-and-flush buffer shared by all split levels
struct Accumulator<'a> {
    separator: &'a str,
    max_chars: usize,
    buffer: String,
    buffer_chars: usize,
    chunks: Vec<String>,
}

impl<'a> Accumulator<'a> {
    fn new(separator: &'a str, max_chars: usize) -> Self {
        Self {
            separator,
            max_chars,
            buffer: String::new(),
            buffer_chars: 0,
            chunks: Vec::new(),
        }
    }

    fn push(&mut self, piece: &str) {
        if piece.trim().is_empty() {
            return;
        }
        let piece_chars = char_len(piece);
        let separator_chars = if self.buffer.is_empty() { 0 } else { char_len(self.separator) };

        if !self.buffer.is_empty() && self.buffer_chars + separator_chars + piece_chars > self.max_chars {
            self.flush();
        }

        if !self.buffer.is_empty() {
            self.buffer.push_str(self.separator);
            self.buffer_chars += separator_chars;
        }
        self.buffer.push_str(piece);
        self.buffer_chars += piece_chars;
    }

    fn flush(&mut self) {
        let trimmed = self.buffer.trim();
        if !trimmed.is_empty() {
            self.chunks.push(trimmed.to_string());
        }
        self.buffer.clear();
        self.buffer_chars = 0;
    }

    fn extend(&mut self, chunks: Vec<String>) {
        self.flush();
        self.chunks.extend(chunks);
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

impl Chunker {
    /// Create a chunker without structural unit grouping
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
            unit_pattern: String::new(),
        }
    }

    /// Group chunks by units opened with this literal pattern
    pub fn with_unit_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.unit_pattern = pattern.into();
        self
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Split `text` into 1-indexed chunks in document order
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let pieces = match self.split_by_units(text) {
            Some(pieces) => pieces,
            None => self.split_by_paragraphs(text),
        };

        debug!(
            "Split translatable part into {} chunks, max {} chars per chunk",
            pieces.len(),
            self.max_chars
        );

        pieces
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk { index: i + 1, text })
            .collect()
    }

    /// Unit-aligned splitting; `None` when fewer than two units are present
    fn split_by_units(&self, text: &str) -> Option<Vec<String>> {
        if self.unit_pattern.is_empty() {
            return None;
        }

        let starts: Vec<usize> = text.match_indices(self.unit_pattern.as_str()).map(|(i, _)| i).collect();
        if starts.len() < 2 {
            return None;
        }

        // Units are contiguous slices, so they are joined without a separator
        let mut acc = Accumulator::new("", self.max_chars);
        self.push_unit(&mut acc, &text[..starts[0]]);
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            self.push_unit(&mut acc, &text[start..end]);
        }

        let chunks = acc.finish();
        if chunks.is_empty() {
            None
        } else {
            Some(chunks)
        }
    }

    fn push_unit(&self, acc: &mut Accumulator<'_>, unit: &str) {
        if char_len(unit) > self.max_chars {
            acc.extend(self.split_by_paragraphs(unit));
        } else {
            acc.push(unit);
        }
    }

    /// Paragraph splitting with a line-level fallback for oversize paragraphs
    fn split_by_paragraphs(&self, text: &str) -> Vec<String> {
        let mut acc = Accumulator::new(CHUNK_SEPARATOR, self.max_chars);

        for paragraph in text.split(CHUNK_SEPARATOR) {
            if paragraph.trim().is_empty() {
                continue;
            }

            if char_len(paragraph) > self.max_chars {
                let mut lines = Accumulator::new("\n", self.max_chars);
                for line in paragraph.split('\n') {
                    lines.push(line);
                }
                acc.extend(lines.finish());
                continue;
            }

            acc.push(paragraph);
        }

        acc.finish()
    }
}

/// Join chunk texts the way they were separated
pub fn join_chunks<S: AsRef<str>>(chunks: &[S]) -> String {
    chunks
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}
