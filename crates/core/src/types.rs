use serde::{Deserialize, Serialize};

/// Placeholder used when a context field is missing from a report.
pub const UNKNOWN: &str = "Unknown";

/// One creative-analysis result for one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub source_label: String,
    pub raw_text: String,
}

impl Report {
    pub fn new(source_label: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            raw_text: raw_text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub items: Vec<String>,
}

/// Sections of a report in the order their titles were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedReport {
    sections: Vec<Section>,
}

impl ParsedReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit items under `title`. Empty item lists are dropped; a title seen
    /// before keeps its position and gets the new items appended.
    pub fn commit(&mut self, title: String, items: Vec<String>) {
        if items.is_empty() {
            return;
        }
        match self.sections.iter_mut().find(|s| s.title == title) {
            Some(existing) => existing.items.extend(items),
            None => self.sections.push(Section { title, items }),
        }
    }

    pub fn get(&self, title: &str) -> Option<&[String]> {
        self.sections
            .iter()
            .find(|s| s.title == title)
            .map(|s| s.items.as_slice())
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.title.as_str())
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}

impl From<Vec<Section>> for ParsedReport {
    fn from(sections: Vec<Section>) -> Self {
        let mut report = ParsedReport::new();
        for section in sections {
            report.commit(section.title, section.items);
        }
        report
    }
}

impl<'a> IntoIterator for &'a ParsedReport {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

/// Vertical and platform detected by the model, copied onto every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportContext {
    pub vertical: String,
    pub platform: String,
}

impl Default for ReportContext {
    fn default() -> Self {
        Self {
            vertical: UNKNOWN.to_string(),
            platform: UNKNOWN.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub source_label: String,
    pub section_title: String,
    pub item_index: usize,
    pub item_content: String,
    pub detected_vertical: String,
    pub detected_platform: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Completed(String),
    Failed(String),
}

/// A report slot in a batch: either the model text or the reason it is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub source_label: String,
    pub outcome: AnalysisOutcome,
}

impl AnalysisRecord {
    pub fn completed(source_label: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            outcome: AnalysisOutcome::Completed(raw_text.into()),
        }
    }

    pub fn failed(source_label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            outcome: AnalysisOutcome::Failed(reason.into()),
        }
    }

    pub fn raw_text(&self) -> Option<&str> {
        match &self.outcome {
            AnalysisOutcome::Completed(text) => Some(text),
            AnalysisOutcome::Failed(_) => None,
        }
    }
}

impl From<Report> for AnalysisRecord {
    fn from(report: Report) -> Self {
        Self::completed(report.source_label, report.raw_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_drops_empty_sections() {
        let mut report = ParsedReport::new();
        report.commit("Empty".into(), Vec::new());
        assert!(report.is_empty());
    }

    #[test]
    fn commit_merges_repeated_titles_in_place() {
        let mut report = ParsedReport::new();
        report.commit("A".into(), vec!["1".into()]);
        report.commit("B".into(), vec!["2".into()]);
        report.commit("A".into(), vec!["3".into()]);

        assert_eq!(report.titles().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(report.get("A"), Some(&["1".to_string(), "3".to_string()][..]));
        assert_eq!(report.item_count(), 3);
    }
}
