//! Format conformance reports and state snapshots as text.

use crate::harness::{ConformanceReport, StepOutcome};
use crate::state::StateSnapshot;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn format_outcome(outcome: StepOutcome) -> String {
    match outcome {
        StepOutcome::Passed => format!("{}", "passed".green()),
        StepOutcome::Skipped => format!("{}", "skipped".dimmed()),
    }
}

/// Format a conformance report as human-readable text.
pub fn format_report_text(report: &ConformanceReport, target: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Conformance")));
    out.push_str(&format!("  Backend: {}\n", target));
    out.push_str(&format!(
        "  Capabilities: {} ({:?})\n\n",
        report.capabilities, report.profile
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Step", "Outcome"]);
    for record in &report.steps {
        table.add_row(vec![record.step.to_string(), format_outcome(record.outcome)]);
    }
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!(
        "  {} passed, {} skipped\n\n",
        report.passed(),
        report.skipped()
    ));
    out.push_str(&format_state_text(&report.final_state));
    out
}

/// Format a snapshot as a module/output table.
pub fn format_state_text(state: &StateSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("State")));
    out.push_str(&format!("  Serial: {}\n", state.serial));
    out.push_str(&format!("  Modules: {}\n\n", state.modules.len()));
    if state.modules.is_empty() {
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Module", "Output", "Value"]);
    for module in &state.modules {
        if module.outputs.is_empty() {
            table.add_row(vec![module.display_path(), String::new(), String::new()]);
        }
        for (name, value) in &module.outputs {
            table.add_row(vec![module.display_path(), name.clone(), value.clone()]);
        }
    }
    out.push_str(&format!("{}\n", table));
    out
}
