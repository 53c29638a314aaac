//! Code language detection
//!
//! Explicit annotations (`language-rust`, `lang-py`, `brush: js`, ...) are
//! read by [`language_from_class`] and normalized through an alias table.
//! When a block carries no annotation, [`detect_language`] scans the code
//! for syntax fingerprints. The fingerprint table is ordered from the least
//! ambiguous language to the most generic, and the first confident match
//! wins. No match is a normal outcome.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

/// Samples shorter than this are not classified
const MIN_SAMPLE_LEN: usize = 4;

/// Weak patterns needed for a confident match
const WEAK_HITS_REQUIRED: usize = 2;

/// Language identifiers that mean "no language"
const PLAIN_TEXT: &[&str] = &[
    "text", "plain", "plaintext", "txt", "none", "nohighlight", "output", "default",
];

const ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("node", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("jsx", "javascript"),
    ("py", "python"),
    ("python3", "python"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("console", "bash"),
    ("shell-session", "bash"),
    ("shellsession", "bash"),
    ("rs", "rust"),
    ("rb", "ruby"),
    ("yml", "yaml"),
    ("golang", "go"),
    ("c++", "cpp"),
    ("cc", "cpp"),
    ("hpp", "cpp"),
    ("cs", "csharp"),
    ("c#", "csharp"),
    ("md", "markdown"),
    ("htm", "html"),
    ("xhtml", "html"),
    ("kt", "kotlin"),
    ("ps1", "powershell"),
    ("dockerfile", "docker"),
];

/// Normalize a language annotation.
///
/// Returns `None` for empty and plain-text annotations.
pub fn normalize_language(language: &str) -> Option<String> {
    let lower = language.trim().trim_matches(|c| c == '{' || c == '}').to_lowercase();
    if lower.is_empty() || PLAIN_TEXT.contains(&lower.as_str()) {
        return None;
    }

    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or(lower);

    Some(canonical)
}

/// Extract a language from a `class` attribute value.
///
/// Supports `language-x`, `lang-x`, `highlight-source-x`, `highlight-x`
/// (Sphinx), `sourceCode x` and `brush: x` (SyntaxHighlighter).
pub fn language_from_class(class: &str) -> Option<String> {
    let mut parts = class.split_whitespace().peekable();

    while let Some(part) = parts.next() {
        let annotated = part
            .strip_prefix("language-")
            .or_else(|| part.strip_prefix("lang-"))
            .or_else(|| part.strip_prefix("highlight-source-"))
            .or_else(|| part.strip_prefix("highlight-"));

        if let Some(lang) = annotated {
            return normalize_language(lang);
        }

        if let Some(rest) = part.strip_prefix("brush:") {
            let lang = if rest.is_empty() {
                parts.peek().copied().unwrap_or("")
            } else {
                rest
            };
            return normalize_language(lang.trim_end_matches(';'));
        }

        if part == "sourceCode" {
            if let Some(next) = parts.peek() {
                return normalize_language(next);
            }
        }
    }

    None
}

struct Fingerprint {
    language: &'static str,
    strong: &'static [&'static str],
    weak: &'static [&'static str],
}

static FINGERPRINTS: &[Fingerprint] = &[
    Fingerprint {
        language: "json",
        strong: &[
            r#"(?s)\A\s*\{\s*"[^"\n]*"\s*:.*\}\s*\z"#,
            r#"(?s)\A\s*\[\s*\{\s*"[^"\n]*"\s*:.*\]\s*\z"#,
        ],
        weak: &[],
    },
    Fingerprint {
        language: "vue",
        strong: &[r"(?m)^\s*<template>"],
        weak: &[],
    },
    Fingerprint {
        language: "jsx",
        strong: &[
            r"\buse(State|Effect|Ref|Memo|Callback|Context)\s*\(",
            r"return\s*\(\s*<",
            r#"\bclassName=["{]"#,
        ],
        weak: &[],
    },
    Fingerprint {
        language: "html",
        strong: &[r"(?i)<!doctype\s+html", r"(?i)<html[\s>]"],
        weak: &[
            r"</(div|span|p|a|ul|ol|li|head|body|section|table)>",
            r"<(div|span|p|a|ul|ol|li|section|table)(\s[^>]*)?>",
            r#"\s(class|id|href|src)="[^"]*""#,
        ],
    },
    Fingerprint {
        language: "rust",
        strong: &[
            r"fn\s+\w+\s*(<[^>]*>)?\s*\([^)]*\)\s*->",
            r"\blet\s+mut\s",
            r"\bimpl(<[^>]*>)?\s+[\w:]+(<[^>]*>)?(\s+for\s+[\w:]+(<[^>]*>)?)?\s*\{",
            r"#\[(derive|test|cfg)\b",
            r"\b(println|eprintln|vec|format)!\s*[\(\[]",
            r"(?m)^\s*use\s+(std|crate|super|self)::",
            r"\bfn\s+main\s*\(\s*\)\s*\{",
        ],
        weak: &[
            r"\bpub\s+(fn|struct|enum|mod)\b",
            r"::new\(",
            r"&mut\s",
            r"\.unwrap\(\)",
            r"\bmatch\s+\w+\s*\{",
            r"\b(Option|Result|Vec)<",
        ],
    },
    Fingerprint {
        language: "python",
        strong: &[
            r"(?m)^\s*(async\s+)?def\s+\w+\s*\(.*\)\s*(->\s*[^:]+)?:\s*$",
            r"(?m)^\s*from\s+[\w.]+\s+import\s+",
            r"(?m)^\s*class\s+\w+(\([^)]*\))?:\s*$",
            r"(?m)^\s*elif\s.*:\s*$",
            r#"if\s+__name__\s*==\s*['"]__main__['"]"#,
        ],
        weak: &[
            r"(?m)^\s*import\s+[\w.]+(\s+as\s+\w+)?\s*$",
            r"\bself\.\w+",
            r"\bNone\b",
            r"\b(True|False)\b",
            r"\bprint\(",
        ],
    },
    Fingerprint {
        language: "go",
        strong: &[
            r"(?m)^package\s+\w+\s*$",
            r"\bfunc\s+(\(\w+\s+\*?\w+\)\s+)?\w+\s*\([^)]*\)\s*[\w(\[*{]",
            r"\bfmt\.(Print|Sprint|Fprint|Errorf)",
        ],
        weak: &[r":=", r"\bgo\s+func\b", r"\bchan\s", r"\berr\s*!=\s*nil\b"],
    },
    Fingerprint {
        language: "java",
        strong: &[
            r"\bpublic\s+(static\s+)?(final\s+)?(class|interface|void|enum)\s",
            r"\bSystem\.out\.print",
            r"(?m)^\s*import\s+java(x)?\.",
            r"@Override\b",
        ],
        weak: &[],
    },
    Fingerprint {
        language: "typescript",
        strong: &[
            r"\binterface\s+\w+(\s+extends\s+[\w,\s]+)?\s*\{",
            r"\w\s*:\s*(string|number|boolean|void|unknown|any)(\[\])?\s*[,;)=|]",
            r"(?m)^\s*(export\s+)?type\s+\w+(<[^>]*>)?\s*=",
            r"(?m)^\s*import\s+type\s",
            r"\bas\s+const\b",
            r"\bNextResponse\b",
        ],
        weak: &[],
    },
    Fingerprint {
        language: "javascript",
        strong: &[
            r"\bconsole\.(log|error|warn)\(",
            r"\bfunction\s*\w*\s*\([^)]*\)\s*\{",
            r"(?m)^\s*(const|let|var)\s+\w+\s*=",
            r#"\brequire\(\s*['"]"#,
            r"\bmodule\.exports\b",
            r"\bdocument\.\w+",
        ],
        weak: &[
            r"=>",
            r"\bexport\s+default\b",
            r#"(?m)^\s*import\s.*\sfrom\s+['"]"#,
            r"\basync\s",
            r"\bawait\s",
        ],
    },
    Fingerprint {
        language: "cpp",
        strong: &[
            r"\bstd::",
            r"\bcout\s*<<",
            r"#include\s*<(iostream|vector|string|memory|map|algorithm)>",
            r"\btemplate\s*<",
        ],
        weak: &[],
    },
    Fingerprint {
        language: "c",
        strong: &[r#"(?m)^\s*#include\s*[<"]"#],
        weak: &[r"\bprintf\s*\(", r"\bmalloc\s*\(", r"\bint\s+main\s*\("],
    },
    Fingerprint {
        language: "sql",
        strong: &[
            r"\bSELECT\b[\s\S]+?\bFROM\b",
            r"(?i)\bINSERT\s+INTO\b",
            r"(?i)\bCREATE\s+(TABLE|INDEX|VIEW)\b",
            r"\bUPDATE\s+\w+\s+SET\b",
            r"(?i)\bDELETE\s+FROM\b",
        ],
        weak: &[],
    },
    Fingerprint {
        language: "css",
        strong: &[r"@media\s[^{]+\{", r"(?m)^\s*:root\s*\{"],
        weak: &[
            r"(?m)^\s*[.#]?[\w-]+([\s,>+~]+[.#]?[\w-]+)*\s*\{\s*$",
            r"(?m)^\s*[\w-]+\s*:\s*[^;{}]+;\s*$",
        ],
    },
    Fingerprint {
        language: "toml",
        strong: &[r"(?m)^\s*\[(package|dependencies|dev-dependencies|workspace|tool\.[\w.-]+)\]\s*$"],
        weak: &[
            r"(?m)^\s*\[[\w.-]+\]\s*$",
            r#"(?m)^\s*[\w-]+\s*=\s*("|'|\d|true\b|false\b|\[|\{)"#,
        ],
    },
    Fingerprint {
        language: "yaml",
        strong: &[r"\A---\s*\n"],
        weak: &[
            r"(?m)^\s*[\w-]+:\s*$",
            r"(?m)^\s*[\w-]+:\s+[^\s{]",
            r"(?m)^\s*-\s+[\w-]+:\s",
        ],
    },
    Fingerprint {
        language: "bash",
        strong: &[
            r"(?m)^\s*\$\s+\w+",
            r"(?m)^\s*(sudo\s+)?(npm|npx|yarn|pnpm|pip3?|cargo|git|apt-get|apt|brew|docker|kubectl|curl|wget|make|rustup|bun|deno)\s+[\w-]+",
        ],
        weak: &[
            r"(?m)^\s*export\s+[A-Z_][A-Z0-9_]*=",
            r"\s&&\s",
            r"\s\|\s",
            r"(?m)^\s*(cd|ls|mkdir|rm|cp|mv|echo|cat|chmod)\s",
        ],
    },
];

struct CompiledFingerprint {
    language: &'static str,
    strong: RegexSet,
    weak: RegexSet,
}

impl CompiledFingerprint {
    fn compile(fingerprint: &Fingerprint) -> Self {
        Self {
            language: fingerprint.language,
            strong: RegexSet::new(fingerprint.strong)
                .expect("invalid strong pattern in fingerprint table"),
            weak: RegexSet::new(fingerprint.weak)
                .expect("invalid weak pattern in fingerprint table"),
        }
    }

    fn is_confident(&self, code: &str) -> bool {
        self.strong.is_match(code) || self.weak.matches(code).iter().count() >= WEAK_HITS_REQUIRED
    }
}

static COMPILED: Lazy<Vec<CompiledFingerprint>> =
    Lazy::new(|| FINGERPRINTS.iter().map(CompiledFingerprint::compile).collect());

static SHEBANG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A#!\s*(?:/[\w./-]*/)?(?:env\s+(?:-\S+\s+)*)?([A-Za-z]+)")
        .expect("invalid shebang pattern")
});

fn language_from_shebang(code: &str) -> Option<&'static str> {
    let interpreter = SHEBANG.captures(code)?.get(1)?.as_str();
    let language = match interpreter {
        "python" => "python",
        "bash" | "sh" | "zsh" | "dash" | "ksh" => "bash",
        "node" => "javascript",
        "deno" => "typescript",
        "ruby" => "ruby",
        "perl" => "perl",
        "php" => "php",
        "fish" => "fish",
        _ => return None,
    };
    Some(language)
}

/// Detect the language of an untagged code sample.
///
/// Shebang lines are checked first, then the fingerprint table in order.
pub fn detect_language(code: &str) -> Option<&'static str> {
    let code = code.trim();
    if code.len() < MIN_SAMPLE_LEN {
        return None;
    }

    if let Some(language) = language_from_shebang(code) {
        return Some(language);
    }

    COMPILED
        .iter()
        .find(|fingerprint| fingerprint.is_confident(code))
        .map(|fingerprint| fingerprint.language)
}
