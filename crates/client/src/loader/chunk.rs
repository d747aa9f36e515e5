//! Chunk planning for progressive sanitization.
//!
//! Each chunk is sanitized as a standalone fragment, so a cut must not
//! land inside a tag or inside a raw-text element. Cut points are moved
//! forward until they sit outside both; a chunk can therefore be longer
//! than requested but never shorter, except for the last one.

use std::ops::Range;

/// Elements whose content the parser treats as raw text.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Source-ordered byte ranges covering a text with no gaps.
#[derive(Debug)]
pub struct ChunkPlan<'a> {
    raw: &'a str,
    lowered: String,
    offset: usize,
    initial: usize,
    step: usize,
    started: bool,
}

impl<'a> ChunkPlan<'a> {
    pub fn new(raw: &'a str, initial: usize, step: usize) -> Self {
        Self { raw, lowered: raw.to_ascii_lowercase(), offset: 0, initial, step, started: false }
    }
}

impl Iterator for ChunkPlan<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        if self.offset >= self.raw.len() {
            return None;
        }
        let size = if self.started { self.step } else { self.initial };
        self.started = true;

        let start = self.offset;
        let end = cut_point(self.raw, &self.lowered, start, size);
        self.offset = end;
        Some(start..end)
    }
}

/// Smallest safe cut at or after `start + size`.
///
/// `lowered` must be `raw.to_ascii_lowercase()` so byte offsets line up.
pub fn cut_point(raw: &str, lowered: &str, start: usize, size: usize) -> usize {
    let len = raw.len();
    let mut end = ceil_char_boundary(raw, start.saturating_add(size.max(1)).min(len));

    loop {
        if end >= len {
            return len;
        }

        if let Some(close_end) = open_raw_text_end(lowered, start, end) {
            end = close_end;
            continue;
        }

        let window = &lowered[start..end];
        if let Some(lt) = window.rfind('<')
            && !window[lt..].contains('>')
        {
            end = match lowered[end..].find('>') {
                Some(i) => end + i + 1,
                None => len,
            };
            continue;
        }

        return end;
    }
}

/// If a raw-text element opened in `start..end` is still open at `end`,
/// the offset just past its closing tag (or the end of the text).
fn open_raw_text_end(lowered: &str, start: usize, end: usize) -> Option<usize> {
    let window = &lowered[start..end];
    for tag in RAW_TEXT_TAGS {
        let open = format!("<{tag}");
        let Some(rel) = window
            .rmatch_indices(open.as_str())
            .map(|(i, _)| i)
            .find(|&i| is_tag_name_end(window.as_bytes().get(i + open.len()).copied()))
        else {
            continue;
        };
        let opened_at = start + rel;

        let close = format!("</{tag}");
        let close_end = match lowered[opened_at..].find(close.as_str()) {
            Some(i) => {
                let close_at = opened_at + i;
                match lowered[close_at..].find('>') {
                    Some(j) => close_at + j + 1,
                    None => lowered.len(),
                }
            }
            None => lowered.len(),
        };

        if close_end > end {
            return Some(close_end);
        }
    }
    None
}

/// Whether the byte after `<name` ends the tag name. The window edge counts
/// as an end, since the name may continue past the cut.
fn is_tag_name_end(next: Option<u8>) -> bool {
    match next {
        None => true,
        Some(b) => b.is_ascii_whitespace() || b == b'>' || b == b'/',
    }
}

fn ceil_char_boundary(s: &str, mut index: usize) -> usize {
    while index < s.len() && !s.is_char_boundary(index) {
        index += 1;
    }
    index
}
