//! Output formatting utilities

use crate::application::BuildReport;
use crate::domain::Diagnostic;

/// Format a build summary for display
pub fn format_build_report(report: &BuildReport) -> String {
    let mut output = String::new();

    if report.entries.is_empty() {
        output.push_str("No published entries found\n");
    } else {
        for (title, url) in &report.entries {
            output.push_str(&format!("  {}  {}\n", url, title));
        }
    }

    output.push_str(&format!(
        "Built {} {} and {} static {} into {}\n",
        report.entries.len(),
        plural(report.entries.len(), "page", "pages"),
        report.static_files,
        plural(report.static_files, "file", "files"),
        report.output_dir.display()
    ));
    output.push_str(&format_diagnostics(&report.diagnostics));
    output
}

/// Format renderer diagnostics, one per line; empty when there are none
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }

    let mut output = format!("{} warning(s):\n", diagnostics.len());
    for diagnostic in diagnostics {
        output.push_str(&format!("  - {}\n", diagnostic));
    }
    output
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
