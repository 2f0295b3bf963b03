//! Pure text edits for the Raspberry Pi boot files.
//!
//! Every function here is a total function from text to text so the edits can
//! be tested byte-for-byte, and every edit is guarded so running it twice
//! produces identical output.

use crate::host::{UART_LINES, UART_SECTION_HEADER};

/// Remove a whitespace-delimited token from cmdline text, collapsing any
/// resulting runs of spaces to one. No-op (modulo whitespace normalization)
/// when the token is absent.
pub fn remove_cmdline_token(text: &str, token: &str) -> String {
    let had_newline = text.ends_with('\n');
    let line = text
        .split_whitespace()
        .filter(|t| *t != token)
        .collect::<Vec<_>>()
        .join(" ");
    if had_newline {
        format!("{line}\n")
    } else {
        line
    }
}

/// Whether any line of `text` trims to exactly `line`.
pub fn contains_line(text: &str, line: &str) -> bool {
    text.lines().any(|l| l.trim() == line)
}

/// Append `line` unless an identical line already exists. Returns the new
/// text and whether anything changed.
pub fn ensure_line(text: &str, line: &str) -> (String, bool) {
    if contains_line(text, line) {
        return (text.to_string(), false);
    }
    let mut out = text.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(line);
    out.push('\n');
    (out, true)
}

/// Ensure an `[all]` section header exists with both UART parameter lines
/// directly following it. The header and each parameter line are inserted
/// independently, each behind its own existence check. Returns the new text
/// and the number of lines inserted.
pub fn ensure_uart_block(text: &str) -> (String, usize) {
    let mut lines: Vec<String> = text.lines().map(|l| l.to_string()).collect();
    let mut inserted = 0;

    let header_idx = match lines.iter().position(|l| l.trim() == UART_SECTION_HEADER) {
        Some(idx) => idx,
        None => {
            lines.push(UART_SECTION_HEADER.to_string());
            inserted += 1;
            lines.len() - 1
        }
    };

    // The insertion slot advances only past lines this call inserted; a
    // parameter already present elsewhere in the file must not shift it.
    let mut slot = header_idx + 1;
    for param in UART_LINES {
        if !lines.iter().any(|l| l.trim() == param) {
            lines.insert(slot, param.to_string());
            inserted += 1;
            slot += 1;
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    (out, inserted)
}
