use std::path::Path;
use std::process;

use adaptivity_analyze::{DiagnosticReport, FindingSeverity};
use tracing::debug;

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_check(
    file: &Path,
    checks: Option<&str>,
    strict: bool,
    output: OutputFormat,
    quiet: bool,
) {
    // Step 1: Read and parse the deck
    let src = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            report_error(
                &format!("error reading '{}': {}", file.display(), e),
                output,
                quiet,
            );
            process::exit(1);
        }
    };
    let deck: serde_json::Value = match serde_json::from_str(&src) {
        Ok(v) => v,
        Err(e) => {
            report_error(
                &format!("invalid JSON in '{}': {}", file.display(), e),
                output,
                quiet,
            );
            process::exit(1);
        }
    };

    // Step 2: Run diagnostics
    let selected: Option<Vec<&str>> = checks.map(|c| {
        c.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    });
    debug!(file = %file.display(), checks = ?selected, "checking deck");

    let report = match &selected {
        None => adaptivity_analyze::analyze(&deck),
        Some(names) => adaptivity_analyze::analyze_selected(&deck, names),
    };
    let report = match report {
        Ok(r) => r,
        Err(e) => {
            report_error(&format!("analysis error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    // Step 3: Format output
    if !quiet {
        match output {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
                println!("{}", json);
            }
            OutputFormat::Text => print_text_report(&report),
        }
    }

    // Step 4: Exit code
    if strict && report.has_problems() {
        process::exit(1);
    }
}

fn print_text_report(report: &DiagnosticReport) {
    println!("Deck Diagnostics Report");
    println!("=======================");
    println!();
    println!("  Checks: {}", report.checks_run.join(", "));
    println!("  Screens with problems: {}", report.records.len());
    println!("  Problems: {}", report.problem_count);
    println!();
    println!("Findings:");

    if report.findings.is_empty() {
        println!("  No findings.");
        return;
    }
    for finding in &report.findings {
        let severity = match finding.severity {
            FindingSeverity::Error => "ERROR",
            FindingSeverity::Warning => "WARNING",
        };
        println!(
            "  [{}/{}] [{}]: {}",
            finding.check, severity, finding.node, finding.message
        );
    }
}
