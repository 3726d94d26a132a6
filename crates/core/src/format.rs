use std::time::Duration;

use crate::{
    display::{SectionKind, order_for_display},
    types::{ParsedReport, ReportContext},
};

/// Format a duration as `42.0s` or `3m 5s`
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{}m {}s", d.as_secs() / 60, d.as_secs() % 60)
    }
}

/// Format a parsed report as human-readable markdown
pub fn format_report_readable(
    source_label: &str,
    context: &ReportContext,
    report: &ParsedReport,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", source_label));
    output.push_str(&format!(
        "**Vertical:** {} | **Platform:** {} | **Labels:** {}\n\n",
        context.vertical,
        context.platform,
        report.item_count()
    ));

    if report.is_empty() {
        output.push_str("_No labeled sections found._\n");
        return output;
    }

    for section in order_for_display(report) {
        let icon = SectionKind::of(&section.title).icon();
        output.push_str(&format!(
            "## {} {} ({} items)\n\n",
            icon,
            section.title,
            section.items.len()
        ));
        for (i, item) in section.items.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, item));
        }
        output.push('\n');
    }

    output
}
