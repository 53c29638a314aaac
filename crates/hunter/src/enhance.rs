//! Optional enhancement pass with fallback.
//!
//! An [`Enhancer`] rewrites assembled Markdown. Its output replaces the
//! assembled Markdown only when it is non-empty and plausibly complete;
//! every failure keeps the assembled Markdown and reports why.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;

use hunter_core::normalize_blank_lines;

/// Minimum share of the input's characters an enhanced document must keep
pub const DEFAULT_MIN_LENGTH_RATIO: f64 = 0.5;

/// Why an enhancement was not used
#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    #[error("enhancement is disabled")]
    Disabled,

    #[error("enhancement timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("enhancement service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("enhancement service rate limit exceeded")]
    RateLimited,

    #[error("enhancement returned an empty response")]
    EmptyResponse,

    #[error("enhanced output is implausibly short ({candidate} of {original} characters)")]
    Implausible { candidate: usize, original: usize },
}

/// A text-to-text rewrite of assembled Markdown
#[async_trait]
pub trait Enhancer: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Rewrite the Markdown. Timeouts are enforced by the caller.
    async fn enhance(&self, markdown: &str) -> Result<String, EnhanceError>;
}

/// Whether the enhanced text was used
#[derive(Debug)]
pub enum EnhancementOutcome {
    Enhanced,
    Fallback(EnhanceError),
}

/// Final Markdown of a run and how it was produced
#[derive(Debug)]
pub struct Conversion {
    pub markdown: String,
    pub outcome: EnhancementOutcome,
}

impl Conversion {
    pub fn is_enhanced(&self) -> bool {
        matches!(self.outcome, EnhancementOutcome::Enhanced)
    }
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Strip a fence that wraps the whole document (```` ``` ```` or ```` ```markdown ````)
fn strip_wrapping_fence(text: &str) -> &str {
    let text = text.trim();
    let Some((first, rest)) = text.split_once('\n') else {
        return text;
    };

    let opener = first.trim();
    let is_wrapper = matches!(opener, "```" | "```markdown" | "```md");
    if !is_wrapper {
        return text;
    }

    match rest.trim_end().strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => text,
    }
}

/// Clean up enhancer output before it is judged.
///
/// Removes a fence wrapping the whole document, drops repeated headings
/// outside code, closes a fence left open and normalizes blank lines.
pub fn clean_enhanced_output(text: &str) -> String {
    let text = strip_wrapping_fence(text);

    let mut seen_headings = HashSet::new();
    let mut in_code = false;
    let mut lines = Vec::new();

    for line in text.lines() {
        if is_fence(line) {
            in_code = !in_code;
        } else if !in_code && line.starts_with('#') && !seen_headings.insert(line.trim()) {
            continue;
        }
        lines.push(line);
    }

    let mut cleaned = lines.join("\n");
    if in_code {
        cleaned.push_str("\n```");
    }

    normalize_blank_lines(&cleaned)
}

/// Decide between the assembled Markdown and an enhancer's result.
///
/// Pure: the same inputs always give the same decision.
pub fn judge(
    original: &str,
    candidate: Result<String, EnhanceError>,
    min_length_ratio: f64,
) -> Conversion {
    let fallback = |reason| Conversion {
        markdown: original.to_string(),
        outcome: EnhancementOutcome::Fallback(reason),
    };

    let text = match candidate {
        Ok(text) => clean_enhanced_output(&text),
        Err(reason) => return fallback(reason),
    };

    if text.trim().is_empty() {
        return fallback(EnhanceError::EmptyResponse);
    }

    let candidate_len = text.chars().count();
    let original_len = original.chars().count();
    if (candidate_len as f64) < original_len as f64 * min_length_ratio {
        return fallback(EnhanceError::Implausible {
            candidate: candidate_len,
            original: original_len,
        });
    }

    Conversion {
        markdown: text,
        outcome: EnhancementOutcome::Enhanced,
    }
}

/// Run an enhancer with a timeout and judge the result
pub async fn enhance_with_fallback(
    enhancer: &dyn Enhancer,
    markdown: &str,
    timeout: Duration,
    min_length_ratio: f64,
) -> Conversion {
    let result = match tokio::time::timeout(timeout, enhancer.enhance(markdown)).await {
        Ok(result) => result,
        Err(_) => Err(EnhanceError::Timeout(timeout)),
    };

    let conversion = judge(markdown, result, min_length_ratio);
    match &conversion.outcome {
        EnhancementOutcome::Enhanced => {
            tracing::info!(enhancer = enhancer.name(), "enhancement applied")
        }
        EnhancementOutcome::Fallback(reason) => {
            tracing::warn!(
                enhancer = enhancer.name(),
                %reason,
                "enhancement failed, keeping assembled markdown"
            )
        }
    }
    conversion
}
