use std::ops::Range;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;
const GB: f64 = MB * 1024.0;

/// Human readable file size; empty for zero.
pub(crate) fn fmt_size(bytes: u64) -> String {
    if bytes == 0 {
        return String::new();
    }
    let value = bytes as f64;
    if value < KB {
        format!("{bytes} B")
    } else if value < MB {
        format!("{:.1} KB", value / KB)
    } else if value < GB {
        format!("{:.1} MB", value / MB)
    } else {
        format!("{:.2} GB", value / GB)
    }
}

/// Cut `text` to at most `width` columns, ending in `…` when shortened.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}

/// Byte ranges of `text` matching any of the lower-cased `terms`, sorted and
/// merged. Empty when lower-casing changes the byte layout of `text`.
pub(crate) fn match_ranges(text: &str, terms: &[String]) -> Vec<Range<usize>> {
    let lowered = text.to_lowercase();
    if lowered.len() != text.len() {
        return Vec::new();
    }
    let mut ranges: Vec<Range<usize>> = terms
        .iter()
        .filter(|term| !term.is_empty())
        .flat_map(|term| {
            lowered
                .match_indices(term.as_str())
                .map(|(start, matched)| start..start + matched.len())
                .collect::<Vec<_>>()
        })
        .filter(|range| text.is_char_boundary(range.start) && text.is_char_boundary(range.end))
        .collect();
    ranges.sort_by_key(|range| range.start);

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}
