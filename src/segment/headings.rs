/*!
 * Literal scanner for heading lines.
 */

/// A heading line found in a text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingLine<'a> {
    /// Byte offset of the line start
    pub start: usize,
    /// Text after the prefix, trimmed
    pub title: &'a str,
}

/// All lines starting with `prefix` (leading indentation allowed), in order
pub fn heading_lines<'a>(text: &'a str, prefix: &str) -> Vec<HeadingLine<'a>> {
    if prefix.trim().is_empty() {
        return Vec::new();
    }

    let mut headings = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let stripped = line.trim_start();
        if let Some(rest) = stripped.strip_prefix(prefix) {
            headings.push(HeadingLine {
                start: offset,
                title: rest.trim(),
            });
        }
        offset += line.len();
    }
    headings
}
