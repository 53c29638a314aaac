//! Configuration options for Markdown formatting

/// Options for Markdown formatting
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Minimum fence for code blocks; grows when the code contains backtick runs
    pub fence: String,

    /// Emphasis delimiter
    pub em_delimiter: char,

    /// Strong delimiter
    pub strong_delimiter: String,

    /// Minimum spaces added per nested list level; content under an
    /// ordered item always starts past its marker
    pub list_indent: usize,

    /// Language tag used when a code block has no hint and detection finds nothing
    pub default_code_language: Option<String>,

    /// Run fingerprint detection for code blocks without an explicit annotation
    pub detect_code_language: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            bullet_list_marker: '-',
            fence: "```".to_string(),
            em_delimiter: '_',
            strong_delimiter: "**".to_string(),
            list_indent: 2,
            default_code_language: None,
            detect_code_language: true,
        }
    }
}
