//! Code block formatting

use crate::language::detect_language;
use crate::options::FormatOptions;
use crate::record::{keys, ParseRecord};

/// Drop whitespace-only lines at the start and end of a code sample.
///
/// Everything between the first and last non-blank line is kept verbatim,
/// indentation and trailing whitespace included.
pub fn trim_blank_lines(code: &str) -> String {
    let lines: Vec<&str> = code.split('\n').collect();
    let first = lines.iter().position(|line| !line.trim().is_empty());
    let last = lines.iter().rposition(|line| !line.trim().is_empty());

    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

/// Language tag for a code record: explicit hint, then detection, then the default
pub fn resolve_language(record: &ParseRecord, options: &FormatOptions) -> Option<String> {
    if let Some(hint) = record.meta_str(keys::LANGUAGE_HINT) {
        return Some(hint.to_string());
    }

    if options.detect_code_language {
        if let Some(language) = detect_language(record.raw_text()) {
            return Some(language.to_string());
        }
    }

    options.default_code_language.clone()
}

/// Fence long enough not to be closed by a backtick run inside the code
fn fence_for(code: &str, base: &str) -> String {
    let fence_char = base.chars().next().unwrap_or('`');
    let longest_run = code
        .chars()
        .fold((0usize, 0usize), |(max, current), c| {
            if c == fence_char {
                (max.max(current + 1), current + 1)
            } else {
                (max, 0)
            }
        })
        .0;

    if longest_run >= base.chars().count() {
        fence_char.to_string().repeat(longest_run + 1)
    } else {
        base.to_string()
    }
}

/// Render a code block record as a fenced block
pub fn format_code_block(record: &ParseRecord, options: &FormatOptions) -> String {
    let code = record.raw_text();
    if code.trim().is_empty() {
        return String::new();
    }

    let language = resolve_language(record, options).unwrap_or_default();
    let fence = fence_for(code, &options.fence);

    format!("{fence}{language}\n{code}\n{fence}\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ContentType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trim_blank_lines_keeps_indentation() {
        let code = "\n  \n    def f():\n        pass\n\n   \n";
        assert_eq!(trim_blank_lines(code), "    def f():\n        pass");
    }

    #[test]
    fn test_trim_blank_lines_keeps_internal_blank_lines() {
        let code = "a\n\n\n  b  ";
        assert_eq!(trim_blank_lines(code), "a\n\n\n  b  ");
    }

    #[test]
    fn test_trim_blank_lines_all_blank() {
        assert_eq!(trim_blank_lines("\n \n\t\n"), "");
        assert_eq!(trim_blank_lines(""), "");
    }

    #[test]
    fn test_fenced_with_hint() {
        let record = ParseRecord::new(ContentType::CodeBlock, "def f():\n    pass")
            .with_meta(keys::LANGUAGE_HINT, "python");
        assert_eq!(
            format_code_block(&record, &FormatOptions::default()),
            "```python\ndef f():\n    pass\n```\n\n"
        );
    }

    #[test]
    fn test_detection_when_no_hint() {
        let record = ParseRecord::new(ContentType::CodeBlock, "npm install hunter");
        assert_eq!(
            format_code_block(&record, &FormatOptions::default()),
            "```bash\nnpm install hunter\n```\n\n"
        );
    }

    #[test]
    fn test_untagged_fence_when_nothing_detected() {
        let record = ParseRecord::new(ContentType::CodeBlock, "hello there");
        assert_eq!(
            format_code_block(&record, &FormatOptions::default()),
            "```\nhello there\n```\n\n"
        );
    }

    #[test]
    fn test_default_language_fallback() {
        let options = FormatOptions {
            default_code_language: Some("text".to_string()),
            ..Default::default()
        };
        let record = ParseRecord::new(ContentType::CodeBlock, "hello there");
        assert!(format_code_block(&record, &options).starts_with("```text\n"));
    }

    #[test]
    fn test_fence_grows_around_backticks() {
        let record = ParseRecord::new(ContentType::CodeBlock, "```\nnested\n```")
            .with_meta(keys::LANGUAGE_HINT, "markdown");
        assert_eq!(
            format_code_block(&record, &FormatOptions::default()),
            "````markdown\n```\nnested\n```\n````\n\n"
        );
    }
}
