/*!
 * Reassembly of translated chunks with the preserved regions.
 *
 * The joined translation is repaired for two known model artifacts before it
 * is put back between the preserved regions:
 * - code fences the model added around or after its answer
 * - changelog entries the model emitted twice
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::segment::{heading_lines, join_chunks, Partition};

static VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bv?(\d+\.\d+(?:\.\d+)?)\b").expect("Invalid version regex"));

// Month-name dates (Dec 04, 2025 / 4 December 2025), year-first dates
// (2025-12-04, 2025 年 12 月 04 日, 2025년 12월 04일) and day-first numeric dates
static DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4}\b",
        r"|\b\d{1,2}\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+\d{4}\b",
        r"|\b\d{4}\s*[-/.年년]\s*\d{1,2}\s*[-/.月월]\s*\d{1,2}",
        r"|\b\d{1,2}[-/.]\d{1,2}[-/.]\d{4}\b",
    ))
    .expect("Invalid date regex")
});

/// Literal patterns and limits used by the repairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOptions {
    /// Code fence marker
    pub fence: String,
    /// Opening tag of a structural unit
    pub unit_open_tag: String,
    /// Closing tag of a structural unit
    pub unit_close_tag: String,
    /// Heading line prefix
    pub heading_prefix: String,
    /// Search window before a duplicate heading for the opening tag
    pub dedup_lookbehind: usize,
    /// Whether duplicate units are removed
    pub remove_duplicate_units: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            fence: "```".to_string(),
            unit_open_tag: "<Update".to_string(),
            unit_close_tag: "</Update>".to_string(),
            heading_prefix: "## ".to_string(),
            dedup_lookbehind: 500,
            remove_duplicate_units: true,
        }
    }
}

/// Joins translated chunks and puts them back between the preserved regions
#[derive(Debug, Clone, Default)]
pub struct Reassembler {
    options: RepairOptions,
}

impl Reassembler {
    pub fn new(options: RepairOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RepairOptions {
        &self.options
    }

    /// Build the final document from a partition and the translated chunks
    pub fn reassemble<S: AsRef<str>>(&self, partition: &Partition, translated: &[S]) -> String {
        let pieces: Vec<&str> = translated
            .iter()
            .map(|t| t.as_ref().trim())
            .filter(|t| !t.is_empty())
            .collect();
        let joined = join_chunks(&pieces);
        let translation = self.repair(&joined, &partition.translatable);

        assemble(&partition.keep_before, &translation, &partition.keep_after)
    }

    /// Apply all repairs to a joined translation of `source`
    pub fn repair(&self, translation: &str, source: &str) -> String {
        let mut text = repair_fences(translation, source, &self.options.fence);
        if self.options.remove_duplicate_units {
            text = remove_duplicate_units(&text, &self.options);
        }
        text.trim().to_string()
    }
}

/// Put the translation between the preserved regions
///
/// A newline separates the translation from each non-empty preserved region.
pub fn assemble(keep_before: &str, translation: &str, keep_after: &str) -> String {
    if translation.is_empty() {
        return format!("{}{}", keep_before, keep_after);
    }

    let mut output = String::with_capacity(keep_before.len() + translation.len() + keep_after.len() + 2);
    output.push_str(keep_before);
    if !keep_before.is_empty() {
        output.push('\n');
    }
    output.push_str(translation);
    if !keep_after.is_empty() {
        output.push('\n');
    }
    output.push_str(keep_after);
    output
}

/// Info string of a fence line, or None if the line is not a fence
fn fence_info<'a>(line: &'a str, fence: &str) -> Option<&'a str> {
    if fence.is_empty() {
        return None;
    }
    line.trim().strip_prefix(fence).map(|rest| rest.trim_start_matches(fence.chars().next().unwrap_or('`')).trim())
}

/// Number of fence lines in a text
pub fn count_fence_lines(text: &str, fence: &str) -> usize {
    text.lines().filter(|line| fence_info(line, fence).is_some()).count()
}

fn is_wrapper_info(info: &str) -> bool {
    matches!(info.to_ascii_lowercase().as_str(), "" | "markdown" | "md" | "mdx" | "html")
}

/// Info string of the fence on the first non-blank line, if that line is a fence
fn leading_fence_info<'a>(text: &'a str, fence: &str) -> Option<&'a str> {
    text.lines()
        .find(|line| !line.trim().is_empty())
        .and_then(|line| fence_info(line, fence))
}

/// Remove fence lines the model added to its translation of `source`
///
/// Only runs when the translation has more fence lines than the source span.
/// A leading fence opening a markup block is dropped first, unless the source
/// itself opens with the same fence; then any bare fence that never gets closed.
pub fn repair_fences(translation: &str, source: &str, fence: &str) -> String {
    let source_fence_count = count_fence_lines(source, fence);
    if count_fence_lines(translation, fence) <= source_fence_count {
        return translation.to_string();
    }

    let mut lines: Vec<&str> = translation.split_inclusive('\n').collect();
    let source_leading = leading_fence_info(source, fence);

    if let Some(first) = lines.iter().position(|line| !line.trim().is_empty()) {
        let leading = fence_info(lines[first], fence);
        if leading.is_some_and(is_wrapper_info) && leading != source_leading {
            debug!("Removing leading code fence wrapper: {}", lines[first].trim());
            lines.remove(first);
        }
    }

    let mut excess = lines
        .iter()
        .filter(|line| fence_info(line, fence).is_some())
        .count()
        .saturating_sub(source_fence_count);

    while excess > 0 {
        match unclosed_bare_fence(&lines, fence) {
            Some(orphan) => {
                debug!("Removing unpaired code fence at line {}", orphan + 1);
                lines.remove(orphan);
                excess -= 1;
            }
            None => break,
        }
    }

    lines.concat()
}

/// Index of a bare fence line that opens a block never closed
fn unclosed_bare_fence(lines: &[&str], fence: &str) -> Option<usize> {
    let mut open: Option<usize> = None;
    for (i, line) in lines.iter().enumerate() {
        let Some(info) = fence_info(line, fence) else {
            continue;
        };
        match open {
            None => open = Some(i),
            // a fence carrying an info string cannot close a block
            Some(_) if info.is_empty() => open = None,
            Some(_) => {}
        }
    }
    open.filter(|&i| fence_info(lines[i], fence).is_some_and(str::is_empty))
}

/// Identity of a changelog entry heading: version and normalised date
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub version: Option<String>,
    pub date: Option<String>,
}

/// Key of a heading title, or None if it carries neither a version nor a date
///
/// Numbers that are not part of a date (`## Season 2 rewards`) do not make a key.
pub fn entry_key(title: &str) -> Option<EntryKey> {
    let version = VERSION_REGEX.captures(title).map(|caps| caps[1].to_string());
    let remainder = VERSION_REGEX.replace(title, "");
    let date = DATE_REGEX.find(&remainder).map(|found| {
        found
            .as_str()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect::<String>()
    });

    if version.is_none() && date.is_none() {
        return None;
    }
    Some(EntryKey { version, date })
}

/// Remove later units whose heading repeats an earlier (version, date) key
pub fn remove_duplicate_units(text: &str, options: &RepairOptions) -> String {
    if options.unit_open_tag.is_empty() || options.unit_close_tag.is_empty() {
        return text.to_string();
    }

    let mut seen: HashSet<EntryKey> = HashSet::new();
    let mut removals: Vec<(usize, usize)> = Vec::new();

    for heading in heading_lines(text, &options.heading_prefix) {
        let Some(key) = entry_key(heading.title) else {
            continue;
        };
        if seen.insert(key) {
            continue;
        }
        if removals.last().is_some_and(|&(_, end)| heading.start < end) {
            continue;
        }

        let Some((start, end)) = unit_span(text, heading.start, options) else {
            warn!(
                "Duplicate entry '{}' left in place: no enclosing {} unit within {} characters before it",
                heading.title, options.unit_open_tag, options.dedup_lookbehind
            );
            continue;
        };
        if removals.last().is_some_and(|&(_, prev_end)| start < prev_end) {
            continue;
        }

        warn!("Removing duplicated entry '{}'", heading.title);
        removals.push((start, end));
    }

    if removals.is_empty() {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end) in removals {
        output.push_str(&text[cursor..start]);
        cursor = end;
    }
    output.push_str(&text[cursor..]);
    output
}

/// Byte range of the unit enclosing a heading, trailing newline included
///
/// None when the heading is not inside a unit: the nearest opening tag was
/// already closed before the heading, or another unit opens before the next
/// closing tag.
fn unit_span(text: &str, heading_start: usize, options: &RepairOptions) -> Option<(usize, usize)> {
    let mut window_start = heading_start.saturating_sub(options.dedup_lookbehind);
    while !text.is_char_boundary(window_start) {
        window_start -= 1;
    }

    let start = window_start + text[window_start..heading_start].rfind(&options.unit_open_tag)?;
    if text[start..heading_start].contains(&options.unit_close_tag) {
        return None;
    }
    let close = heading_start + text[heading_start..].find(&options.unit_close_tag)?;
    if text[heading_start..close].contains(&options.unit_open_tag) {
        return None;
    }
    let mut end = close + options.unit_close_tag.len();
    if text[end..].starts_with("\r\n") {
        end += 2;
    } else if text[end..].starts_with('\n') {
        end += 1;
    }
    Some((start, end))
}
