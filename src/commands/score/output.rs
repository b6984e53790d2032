use std::io::Write;

use anyhow::Result;

use crate::model::{DocumentOutcome, DocumentStatus};

const RULE_WIDTH: usize = 80;
const SUMMARY_RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSummary {
    pub processed: usize,
    pub total: usize,
    pub total_score: f64,
}

impl ScoreSummary {
    pub fn from_outcomes(outcomes: &[DocumentOutcome]) -> Self {
        let mut summary = Self {
            processed: 0,
            total: outcomes.len(),
            total_score: 0.0,
        };
        for comparison in outcomes.iter().filter_map(|outcome| outcome.comparison.as_ref()) {
            summary.processed += 1;
            summary.total_score += comparison.total_score;
        }
        summary
    }

    pub fn average(&self) -> Option<f64> {
        if self.processed == 0 {
            None
        } else {
            Some(self.total_score / self.processed as f64)
        }
    }
}

pub fn interpret_score(average: f64) -> &'static str {
    if average >= 90.0 {
        "Excellent performance!"
    } else if average >= 70.0 {
        "Good performance!"
    } else if average >= 50.0 {
        "Needs improvement"
    } else {
        "Significant issues found"
    }
}

pub fn write_header<W: Write>(output: &mut W) -> Result<()> {
    writeln!(output, "\nESG Extraction Results:")?;
    writeln!(output, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(
        output,
        "{:<40} {:<8} {:<8} {:<8} {:<10} {:<8} Status",
        "File", "Score", "Parsing", "Coverage", "Robustness", "Schema"
    )?;
    writeln!(output, "{}", "-".repeat(RULE_WIDTH))?;
    Ok(())
}

pub fn write_outcome_row<W: Write>(output: &mut W, outcome: &DocumentOutcome) -> Result<()> {
    match &outcome.comparison {
        Some(comparison) => {
            let breakdown = &comparison.breakdown;
            writeln!(
                output,
                "{:<40} {:<8.1} {:<8.1} {:<8.1} {:<10.1} {:<8.1} {}",
                outcome.file,
                comparison.total_score,
                breakdown.parsing_correctness,
                breakdown.coverage,
                breakdown.robustness,
                breakdown.output_hygiene,
                outcome.status.label()
            )?;
        }
        None => {
            let placeholder = match outcome.status {
                DocumentStatus::NoExpectedResults => "N/A",
                _ => "0",
            };
            writeln!(
                output,
                "{:<40} {:<8} {:<8} {:<8} {:<10} {:<8} {}",
                outcome.file,
                placeholder,
                placeholder,
                placeholder,
                placeholder,
                placeholder,
                outcome.status.label()
            )?;
        }
    }
    Ok(())
}

pub fn write_summary<W: Write>(output: &mut W, summary: &ScoreSummary) -> Result<()> {
    writeln!(output, "\nSummary:")?;
    writeln!(output, "{}", "-".repeat(SUMMARY_RULE_WIDTH))?;
    writeln!(
        output,
        "Files processed: {}/{}",
        summary.processed, summary.total
    )?;
    match summary.average() {
        Some(average) => {
            writeln!(output, "Average score: {average:.1}/100")?;
            writeln!(output, "{}", interpret_score(average))?;
        }
        None => writeln!(output, "No files were successfully processed")?,
    }
    Ok(())
}

pub fn write_detailed_issues<W: Write>(output: &mut W, outcomes: &[DocumentOutcome]) -> Result<()> {
    let flagged = outcomes
        .iter()
        .filter_map(|outcome| {
            outcome
                .comparison
                .as_ref()
                .filter(|comparison| comparison.has_issues())
                .map(|comparison| (outcome, comparison))
        })
        .collect::<Vec<_>>();
    if flagged.is_empty() {
        return Ok(());
    }

    writeln!(output, "\nDetailed Issues:")?;
    writeln!(output, "{}", "-".repeat(SUMMARY_RULE_WIDTH))?;

    for (outcome, comparison) in flagged {
        writeln!(output, "\nIssues in {}:", outcome.file)?;
        if !comparison.details.schema_valid {
            writeln!(
                output,
                "  Schema validation failed: {}",
                comparison.details.schema_errors
            )?;
        }
        for issue in comparison.issues() {
            writeln!(output, "  ✗ {}: {}", issue.field, issue.error)?;
        }
    }
    Ok(())
}
