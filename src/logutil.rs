//! Log-safe rendering of player-typed text.
//! Chat lines are attacker-controlled; escape control characters so one line of
//! input stays one line of log, and cap the length so a pasted wall of text
//! cannot flood the log.

/// Longest preview of a chat line kept in a log record.
pub const MAX_PREVIEW_CHARS: usize = 160;

/// Escape `s` for a single-line log record.
///
/// Newlines, carriage returns and tabs become `\n`, `\r` and `\t`; a backslash
/// is doubled; any other control character is written as `\xNN`. Input longer
/// than [MAX_PREVIEW_CHARS] is cut and ends with `…`.
pub fn escape_log(s: &str) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW_CHARS) + 4);
    for (count, ch) in s.chars().enumerate() {
        if count == MAX_PREVIEW_CHARS {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
