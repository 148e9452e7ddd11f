//! Compact output rendering helpers for terminal diagnostics.
//!
//! Verifier stderr and malformed listings can be arbitrarily long; these keep
//! what ends up in a gate message bounded and on one line.

/// Collapse newlines/extra whitespace and bound length for terminal display.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Render elapsed milliseconds the way verbose diagnostics print them.
pub fn format_elapsed(ms: u64) -> String {
    if ms >= 1000 {
        format!("{}.{:03}s", ms / 1000, ms % 1000)
    } else {
        format!("{}ms", ms)
    }
}
