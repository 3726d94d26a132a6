use std::sync::LazyLock;

use regex::Regex;

use crate::types::{ReportContext, UNKNOWN};

static VERTICAL: LazyLock<Regex> = LazyLock::new(|| label_pattern("Detected Vertical"));
static PLATFORM: LazyLock<Regex> = LazyLock::new(|| label_pattern("Detected Platform"));

// The value has to start on the label's own line.
fn label_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"{}:[ \t]*(\S[^\r\n]*)", regex::escape(label)))
        .expect("valid context label pattern")
}

fn first_value(pattern: &Regex, raw_text: &str) -> Option<String> {
    pattern
        .captures(raw_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Pull the detected vertical and platform out of the raw report text.
///
/// Only the first occurrence of each label counts; missing fields fall back
/// to `"Unknown"`.
pub fn extract_context(raw_text: &str) -> ReportContext {
    ReportContext {
        vertical: first_value(&VERTICAL, raw_text).unwrap_or_else(|| UNKNOWN.to_string()),
        platform: first_value(&PLATFORM, raw_text).unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_both_fields() {
        let text = "Detected Vertical: Home Goods (0.95)\nDetected Platform: TikTok (0.9)\n**X:**\n1. a\n";
        let ctx = extract_context(text);

        assert_eq!(ctx.vertical, "Home Goods (0.95)");
        assert_eq!(ctx.platform, "TikTok (0.9)");
    }

    #[test]
    fn missing_fields_default_to_unknown() {
        let ctx = extract_context("**Visual Elements:**\n1. Bright colors\n");
        assert_eq!(ctx, ReportContext::default());
        assert_eq!(ctx.vertical, "Unknown");
        assert_eq!(ctx.platform, "Unknown");
    }

    #[test]
    fn matches_inside_bulleted_lines() {
        let text = "**CONTEXT DETECTION:**\n- Detected Vertical: Home Goods / Sleep Health (0.95)\n- Detected Platform: Short-Form Video / Social Media (0.90)\n";
        let ctx = extract_context(text);

        assert_eq!(ctx.vertical, "Home Goods / Sleep Health (0.95)");
        assert_eq!(ctx.platform, "Short-Form Video / Social Media (0.90)");
    }

    #[test]
    fn first_occurrence_wins() {
        let text = "Detected Platform: Reels\nDetected Platform: Shorts\n";
        assert_eq!(extract_context(text).platform, "Reels");
    }

    #[test]
    fn label_is_case_sensitive() {
        let ctx = extract_context("detected vertical: Fitness\nDETECTED PLATFORM: TikTok\n");
        assert_eq!(ctx, ReportContext::default());
    }

    #[test]
    fn blank_value_does_not_swallow_next_line() {
        let text = "Detected Vertical:   \n1. Something else\n";
        assert_eq!(extract_context(text).vertical, "Unknown");
    }

    #[test]
    fn trailing_whitespace_is_trimmed() {
        let text = "Detected Vertical:\tFitness   \r\n";
        assert_eq!(extract_context(text).vertical, "Fitness");
    }
}
