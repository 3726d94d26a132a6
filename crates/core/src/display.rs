use std::cmp::Ordering;

use crate::types::{ParsedReport, Section};

/// Canonical display order; a title takes the first entry it contains.
pub const SECTION_ORDER: &[&str] = &[
    "Introduction",
    "BASE LAYER",
    "Visual Composition",
    "Visual Elements",
    "Audio Elements",
    "Text Overlays",
    "Text & Messaging",
    "Temporal Structure",
    "Performance Indicators",
    "Performance & Context",
    "MIDDLE LAYER",
    "Vertical Context",
    "Platform Context",
    "TOP LAYER",
    "Other Elements",
    "Analysis Results",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Visual,
    Audio,
    Text,
    Temporal,
    Performance,
    Vertical,
    Platform,
    Introduction,
    Other,
}

impl SectionKind {
    pub fn of(title: &str) -> Self {
        let t = title.to_lowercase();
        let has = |needle: &str| t.contains(needle);

        if has("introduction") {
            SectionKind::Introduction
        } else if has("visual") || has("composition") {
            SectionKind::Visual
        } else if has("audio") || has("sound") {
            SectionKind::Audio
        } else if has("vertical") {
            SectionKind::Vertical
        } else if has("platform") {
            SectionKind::Platform
        } else if has("performance") || has("indicator") || has("context") {
            // Before the text check: "context" contains "text".
            SectionKind::Performance
        } else if has("text") || has("overlay") || has("messaging") {
            SectionKind::Text
        } else if has("temporal") || has("structure") {
            SectionKind::Temporal
        } else {
            SectionKind::Other
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SectionKind::Visual => "🎨",
            SectionKind::Audio => "🎵",
            SectionKind::Text => "📝",
            SectionKind::Temporal => "⏱️",
            SectionKind::Performance => "📊",
            SectionKind::Vertical => "🎯",
            SectionKind::Platform => "📱",
            SectionKind::Introduction => "📖",
            SectionKind::Other => "📋",
        }
    }
}

pub fn display_rank(title: &str) -> Option<usize> {
    let lower = title.to_lowercase();
    SECTION_ORDER
        .iter()
        .position(|known| lower.contains(&known.to_lowercase()))
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    match (display_rank(a), display_rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
    }
}

/// Reorder sections for presentation. Parsing order is left untouched.
pub fn order_for_display(report: &ParsedReport) -> Vec<Section> {
    let mut sections = report.sections().to_vec();
    sections.sort_by(|a, b| compare_titles(&a.title, &b.title));
    sections
}
