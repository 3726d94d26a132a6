//! Lenient parsing for reports that do not follow the header convention.
//!
//! Never used by the CSV export. Callers that display reports opt into it
//! when they would rather show a best-effort grouping than nothing.

use crate::{
    parser::{BOLD_MARKER, is_header, parse_report},
    types::{ParsedReport, Section},
};

pub const INTRODUCTION: &str = "Introduction";
pub const OTHER_ELEMENTS: &str = "Other Elements";

struct Category {
    title: &'static str,
    keywords: &'static [&'static str],
}

const CATEGORIES: &[Category] = &[
    Category {
        title: "Visual Elements",
        keywords: &[
            "visual", "camera", "shot", "composition", "lighting", "color", "scene", "setting",
            "background", "transition", "effect", "animation", "footage", "image",
        ],
    },
    Category {
        title: "Audio Elements",
        keywords: &[
            "audio", "voice", "music", "sound", "narration", "speech", "tone", "accent",
            "voiceover",
        ],
    },
    Category {
        title: "Text & Messaging",
        keywords: &[
            "text", "overlay", "typography", "font", "message", "copy", "headline", "subtitle",
            "caption", "brand", "logo",
        ],
    },
    Category {
        title: "Temporal Structure",
        keywords: &[
            "temporal", "structure", "timing", "sequence", "flow", "pacing", "rhythm",
            "timeline", "chronological", "order", "progression", "development",
        ],
    },
    Category {
        title: "Performance & Context",
        keywords: &[
            "performance", "engagement", "conversion", "hook", "call-to-action", "cta",
            "narrative", "story", "duration", "format", "platform", "vertical", "context",
        ],
    },
];

/// Category title for a line, by the first keyword list that matches.
pub fn categorize_line(line: &str) -> &'static str {
    let lower = line.to_lowercase();
    CATEGORIES
        .iter()
        .find(|c| c.keywords.iter().any(|k| lower.contains(k)))
        .map(|c| c.title)
        .unwrap_or(OTHER_ELEMENTS)
}

fn strip_numbering(line: &str) -> &str {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    match line[digits..].strip_prefix('.') {
        Some(rest) if digits > 0 => rest.trim_start(),
        _ => line,
    }
}

/// Group every non-header line by keyword. Empty groups are left out.
pub fn categorize_by_keywords(raw_text: &str) -> ParsedReport {
    let mut buckets: Vec<(&'static str, Vec<String>)> = CATEGORIES
        .iter()
        .map(|c| (c.title, Vec::new()))
        .chain(std::iter::once((OTHER_ELEMENTS, Vec::new())))
        .collect();

    for line in raw_text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(BOLD_MARKER) {
            continue;
        }
        let title = categorize_line(line);
        if let Some((_, items)) = buckets.iter_mut().find(|(t, _)| *t == title) {
            items.push(strip_numbering(line).to_string());
        }
    }

    let mut report = ParsedReport::new();
    for (title, items) in buckets {
        report.commit(title.to_string(), items);
    }
    report
}

/// Strict parse first. When it finds sections, text before the first header
/// is kept as an `Introduction` section; when it finds none, lines are
/// grouped by keyword instead.
pub fn parse_report_lenient(raw_text: &str) -> ParsedReport {
    let strict = parse_report(raw_text);
    if strict.is_empty() {
        return categorize_by_keywords(raw_text);
    }

    let preamble: Vec<String> = raw_text
        .lines()
        .map(str::trim)
        .take_while(|line| !is_header(line))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if preamble.is_empty() {
        return strict;
    }

    let mut sections = vec![Section {
        title: INTRODUCTION.to_string(),
        items: preamble,
    }];
    sections.extend(strict.into_sections());
    ParsedReport::from(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_result_is_kept_when_headers_exist() {
        let text = "**Audio Elements:**\n1. Voiceover\n";
        assert_eq!(parse_report_lenient(text), parse_report(text));
    }

    #[test]
    fn preamble_becomes_introduction() {
        let text = "Here is my analysis of the ad.\n\n**Audio Elements:**\n1. Voiceover\n";
        let report = parse_report_lenient(text);

        assert_eq!(
            report.titles().collect::<Vec<_>>(),
            vec![INTRODUCTION, "Audio Elements"]
        );
        assert_eq!(
            report.get(INTRODUCTION),
            Some(&["Here is my analysis of the ad.".to_string()][..])
        );
    }

    #[test]
    fn headerless_text_is_grouped_by_keyword() {
        let text = "1. Bright lighting throughout\n2. Upbeat music bed\nBrand logo in corner\n3. Fast pacing\nStrong hook\nSomething unrelated\n";
        let report = parse_report_lenient(text);

        assert_eq!(
            report.titles().collect::<Vec<_>>(),
            vec![
                "Visual Elements",
                "Audio Elements",
                "Text & Messaging",
                "Temporal Structure",
                "Performance & Context",
                OTHER_ELEMENTS,
            ]
        );
        assert_eq!(
            report.get("Visual Elements"),
            Some(&["Bright lighting throughout".to_string()][..])
        );
        assert_eq!(
            report.get(OTHER_ELEMENTS),
            Some(&["Something unrelated".to_string()][..])
        );
    }

    #[test]
    fn first_matching_category_wins() {
        // "visual" and "music" both match; visual is checked first.
        assert_eq!(categorize_line("Visual rhythm synced to music"), "Visual Elements");
        assert_eq!(categorize_line("CTA at the end"), "Performance & Context");
    }

    #[test]
    fn empty_buckets_are_dropped() {
        let report = categorize_by_keywords("Voiceover narration\n");
        assert_eq!(report.titles().collect::<Vec<_>>(), vec!["Audio Elements"]);
    }

    #[test]
    fn empty_text_stays_empty() {
        assert!(parse_report_lenient("").is_empty());
    }

    #[test]
    fn numbering_is_stripped_only_when_present() {
        assert_eq!(strip_numbering("12. item"), "item");
        assert_eq!(strip_numbering("item 12."), "item 12.");
        assert_eq!(strip_numbering(".5 item"), ".5 item");
    }
}
