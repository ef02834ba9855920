//! Report and rule-list output for the command line.

use crate::registry::RuleRegistry;
use crate::report::{ReportSummary, ViolationsReport};
use crate::rule::Violation;
use crate::severity::SeverityScale;
use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing grouped by severity
    Text,
    /// One JSON document
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: ReportSummary,
    violations: Vec<&'a Violation>,
}

#[derive(Serialize)]
struct RuleEntry<'a> {
    name: &'a str,
    scope: String,
}

/// Write `report` to `out`.
///
/// Text output groups violations by severity, highest first; labels not on
/// `scale` (rule faults) come last. Within a group, violations are ordered
/// by pointer.
pub fn render_report<W: Write>(
    report: &ViolationsReport,
    scale: &SeverityScale,
    format: OutputFormat,
    out: &mut W,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let body = JsonReport {
                summary: report.summary(),
                violations: report.sorted(),
            };
            serde_json::to_writer_pretty(&mut *out, &body)?;
            writeln!(out)
        }
        OutputFormat::Text => render_text(report, scale, out),
    }
}

fn render_text<W: Write>(
    report: &ViolationsReport,
    scale: &SeverityScale,
    out: &mut W,
) -> io::Result<()> {
    if report.is_empty() {
        writeln!(out, "✅ No violations found!")?;
        return Ok(());
    }

    let summary = report.summary();
    let counts: Vec<String> = scale
        .labels()
        .iter()
        .rev()
        .map(|label| {
            let n = summary.by_severity.get(label).copied().unwrap_or(0);
            format!("{} {}", n, label)
        })
        .collect();
    writeln!(out, "📋 Lint Results:")?;
    writeln!(
        out,
        "   {} violation(s) from {} rule(s): {}\n",
        summary.total,
        summary.rules,
        counts.join(", ")
    )?;

    let sorted = report.sorted();
    let mut groups: Vec<&str> = scale.labels().iter().rev().map(String::as_str).collect();
    let mut off_scale: Vec<&str> = summary
        .by_severity
        .keys()
        .map(String::as_str)
        .filter(|label| !scale.contains(label))
        .collect();
    off_scale.sort_unstable();
    groups.extend(off_scale);

    for label in groups {
        let in_group: Vec<&&Violation> = sorted.iter().filter(|v| v.severity == label).collect();
        if in_group.is_empty() {
            continue;
        }
        writeln!(out, "{} ({}):", label.to_uppercase(), in_group.len())?;
        for v in in_group {
            writeln!(out, "   [{}] {}", v.rule_name, v.pointer)?;
            writeln!(out, "      {}", v.message)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Write every rule in `registry` with its scope
pub fn render_rules<W: Write>(
    registry: &RuleRegistry,
    format: OutputFormat,
    out: &mut W,
) -> io::Result<()> {
    let entries: Vec<RuleEntry<'_>> = registry
        .names()
        .into_iter()
        .map(|name| RuleEntry {
            name,
            scope: registry
                .build(name, "")
                .map(|rule| rule.scope().to_string())
                .unwrap_or_default(),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &entries)?;
            writeln!(out)
        }
        OutputFormat::Text => {
            let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
            for e in &entries {
                writeln!(out, "{:width$}  {}", e.name, e.scope, width = width)?;
            }
            Ok(())
        }
    }
}
