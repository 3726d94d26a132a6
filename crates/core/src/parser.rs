//! Section parser for model-generated creative-analysis text.
//!
//! Reports are loosely structured: a bold line (`**Visual Composition:**`)
//! opens a section and the lines that follow are its items, either numbered
//! (`3. Fast cuts`), bulleted (`- Clear branding`) or bare. Parsing is
//! best-effort and never fails; text without headers yields an empty report.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::ParsedReport;

pub const BOLD_MARKER: &str = "**";

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*").expect("valid numbered item pattern"));

/// How a single trimmed, non-empty line is treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Header(String),
    Numbered(&'a str),
    Bulleted(&'a str),
    Bare(&'a str),
}

/// Classify a trimmed line. Headers win over everything else, then numbered
/// items, then bullets; anything left is a bare item.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if is_header(line) {
        return LineKind::Header(header_title(line));
    }
    if let Some(m) = NUMBERED_ITEM.find(line) {
        return LineKind::Numbered(&line[m.end()..]);
    }
    if let Some(rest) = line.strip_prefix("- ") {
        return LineKind::Bulleted(rest.trim_start());
    }
    LineKind::Bare(line)
}

pub fn is_header(line: &str) -> bool {
    line.starts_with(BOLD_MARKER) && line.ends_with(BOLD_MARKER)
}

/// `**Visual Composition:**` -> `Visual Composition`
///
/// Markers are removed first, then one trailing colon, then whitespace, so
/// a colon followed by spaces inside the markers is kept.
pub fn header_title(line: &str) -> String {
    let title = line.replace(BOLD_MARKER, "");
    title.strip_suffix(':').unwrap_or(&title).trim().to_string()
}

/// Split a report into titled sections of items.
///
/// Lines before the first header are discarded, and a header followed by no
/// items before the next header (or the end of text) produces no section.
pub fn parse_report(raw_text: &str) -> ParsedReport {
    let mut report = ParsedReport::new();
    let mut current: Option<String> = None;
    let mut items: Vec<String> = Vec::new();

    for line in raw_text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match classify_line(line) {
            LineKind::Header(title) => {
                if let Some(previous) = current.take() {
                    debug!(section = %previous, items = items.len(), "section closed");
                    report.commit(previous, std::mem::take(&mut items));
                }
                // An empty title closes the previous section without opening
                // a new one; its items are dropped.
                current = (!title.is_empty()).then_some(title);
            }
            LineKind::Numbered(item) | LineKind::Bulleted(item) | LineKind::Bare(item) => {
                if current.is_some() {
                    items.push(item.to_string());
                }
            }
        }
    }

    if let Some(last) = current {
        debug!(section = %last, items = items.len(), "section closed");
        report.commit(last, items);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(report: &ParsedReport, title: &str) -> Vec<String> {
        report.get(title).map(<[String]>::to_vec).unwrap_or_default()
    }

    #[test]
    fn parses_numbered_sections_in_header_order() {
        let text = "**Visual Elements:**\n1. Bright colors\n2. Fast cuts\n**Audio Elements:**\n1. Upbeat music\n";
        let report = parse_report(text);

        assert_eq!(
            report.titles().collect::<Vec<_>>(),
            vec!["Visual Elements", "Audio Elements"]
        );
        assert_eq!(items(&report, "Visual Elements"), vec!["Bright colors", "Fast cuts"]);
        assert_eq!(items(&report, "Audio Elements"), vec!["Upbeat music"]);
    }

    #[test]
    fn bulleted_and_bare_lines_become_items() {
        let text = "**Text Overlays:**\n- Clear branding\n-    Extra spaces\nPromo code shown\n";
        let report = parse_report(text);

        assert_eq!(
            items(&report, "Text Overlays"),
            vec!["Clear branding", "Extra spaces", "Promo code shown"]
        );
    }

    #[test]
    fn text_without_headers_yields_nothing() {
        let report = parse_report("just some text\nmore text\n");
        assert!(report.is_empty());
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_report("").is_empty());
        assert!(parse_report("\n   \n\t\n").is_empty());
    }

    #[test]
    fn header_without_items_is_dropped() {
        let text = "**Empty:**\n\n**Full:**\n1. one\n**Trailing:**\n";
        let report = parse_report(text);

        assert_eq!(report.titles().collect::<Vec<_>>(), vec!["Full"]);
    }

    #[test]
    fn preamble_before_first_header_is_discarded() {
        let text = "Here is the analysis.\n1. stray\n- stray bullet\n**Audio Elements:**\n1. Voiceover\n";
        let report = parse_report(text);

        assert_eq!(report.len(), 1);
        assert_eq!(items(&report, "Audio Elements"), vec!["Voiceover"]);
    }

    #[test]
    fn indented_lines_are_trimmed() {
        let text = "   **Platform Context:**   \n    1.   Vertical video format   \r\n";
        let report = parse_report(text);

        assert_eq!(items(&report, "Platform Context"), vec!["Vertical video format"]);
    }

    #[test]
    fn multi_digit_numbers_are_stripped() {
        let text = "**Visual Composition:**\n12. Consistent visual tone\n";
        let report = parse_report(text);

        assert_eq!(items(&report, "Visual Composition"), vec!["Consistent visual tone"]);
    }

    #[test]
    fn numbered_prefix_matches_leading_decimal() {
        // Only the leading `digits.` is treated as numbering.
        let text = "**Performance Indicators:**\n12.5% lift in CTR\n";
        let report = parse_report(text);

        assert_eq!(items(&report, "Performance Indicators"), vec!["5% lift in CTR"]);
    }

    #[test]
    fn header_title_normalization() {
        assert_eq!(header_title("**CONTEXT DETECTION:**"), "CONTEXT DETECTION");
        assert_eq!(header_title("**Audio**"), "Audio");
        assert_eq!(header_title("** Spaced Out : **"), "Spaced Out :");
        assert_eq!(header_title("** Hooks: **"), "Hooks:");
        assert_eq!(header_title("**Hooks: **"), "Hooks:");
        assert_eq!(header_title("** Hooks:**"), "Hooks");
        assert_eq!(header_title("**:**"), "");
        assert_eq!(header_title("****"), "");
        assert_eq!(header_title("**Only one colon::**"), "Only one colon:");
        assert_eq!(header_title("**Bold** and **more**"), "Bold and more");
    }

    #[test]
    fn classify_line_priority() {
        assert_eq!(classify_line("**1. Header**"), LineKind::Header("1. Header".into()));
        assert_eq!(classify_line("3. item"), LineKind::Numbered("item"));
        assert_eq!(classify_line("- item"), LineKind::Bulleted("item"));
        assert_eq!(classify_line("-item"), LineKind::Bare("-item"));
        assert_eq!(classify_line("**unclosed"), LineKind::Bare("**unclosed"));
    }

    #[test]
    fn empty_title_header_drops_its_items() {
        let text = "**A:**\n1. a\n**:**\n1. orphan\n2. orphan2\n**B:**\n1. b\n";
        let report = parse_report(text);

        assert_eq!(report.titles().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(items(&report, "A"), vec!["a"]);
        assert_eq!(items(&report, "B"), vec!["b"]);
    }

    #[test]
    fn bare_markers_close_the_open_section() {
        let text = "**A:**\n1. a\n****\n1. orphan\n";
        let report = parse_report(text);

        assert_eq!(report.titles().collect::<Vec<_>>(), vec!["A"]);
        assert_eq!(items(&report, "A"), vec!["a"]);
    }

    #[test]
    fn colon_inside_spaced_markers_is_kept() {
        let report = parse_report("** Hooks: **\n1. x\n");
        assert_eq!(report.titles().collect::<Vec<_>>(), vec!["Hooks:"]);
    }

    #[test]
    fn repeated_title_appends_to_first_occurrence() {
        let text = "**A:**\n1. x\n**B:**\n1. y\n**A:**\n1. z\n";
        let report = parse_report(text);

        assert_eq!(report.titles().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(items(&report, "A"), vec!["x", "z"]);
    }

    #[test]
    fn n_headers_with_m_items_each() {
        for n in 1..5 {
            for m in 1..6 {
                let mut text = String::new();
                for h in 0..n {
                    text.push_str(&format!("**Section {h}:**\n"));
                    for i in 1..=m {
                        text.push_str(&format!("{i}. item {h}-{i}\n"));
                    }
                }

                let report = parse_report(&text);
                assert_eq!(report.len(), n);
                for (h, section) in report.sections().iter().enumerate() {
                    assert_eq!(section.title, format!("Section {h}"));
                    assert_eq!(section.items.len(), m);
                }
            }
        }
    }

    #[test]
    fn parsing_is_repeatable() {
        let text = "**CONTEXT DETECTION:**\n- Detected Vertical: Beauty (0.8)\n**VISUAL COMPOSITION:**\n1. Close-up shots\n";
        assert_eq!(parse_report(text), parse_report(text));
    }
}
