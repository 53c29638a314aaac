//! Document assembly
//!
//! Joins formatted fragments in document order and normalizes blank lines.
//! Fenced code is tracked while normalizing so blank lines and trailing
//! whitespace inside a fence survive untouched.

/// Opening or closing fence on a line: fence character and run length
fn fence_marker(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }

    let fence_char = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let run = trimmed.chars().take_while(|c| *c == fence_char).count();
    (run >= 3).then_some((fence_char, run))
}

fn closes(line: &str, open: (char, usize)) -> bool {
    match fence_marker(line) {
        Some((c, run)) => {
            let rest = line.trim_start_matches(' ')[run * c.len_utf8()..].trim();
            c == open.0 && run >= open.1 && rest.is_empty()
        }
        None => false,
    }
}

/// Collapse runs of blank lines to one, outside fenced code.
///
/// Leading and trailing blank lines are dropped, trailing whitespace is
/// trimmed from lines outside fences, and the result ends with exactly one
/// newline (or is empty).
pub fn normalize_blank_lines(markdown: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut open_fence: Option<(char, usize)> = None;
    let mut pending_blank = false;

    for raw in markdown.lines() {
        if let Some(open) = open_fence {
            lines.push(raw);
            if closes(raw, open) {
                open_fence = None;
            }
            continue;
        }

        let line = raw.trim_end();
        if line.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }

        if pending_blank {
            lines.push("");
            pending_blank = false;
        }

        // the fence itself is trimmed, the lines it opens are not
        if let Some(marker) = fence_marker(line) {
            open_fence = Some(marker);
        }
        lines.push(line);
    }

    if lines.is_empty() {
        return String::new();
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Concatenate formatted fragments into one document
pub fn assemble<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();

    for fragment in fragments {
        let fragment = fragment.as_ref();
        if fragment.trim().is_empty() {
            continue;
        }
        if !joined.is_empty() && !joined.ends_with("\n\n") {
            joined.push_str(if joined.ends_with('\n') { "\n" } else { "\n\n" });
        }
        joined.push_str(fragment);
    }

    normalize_blank_lines(&joined)
}
