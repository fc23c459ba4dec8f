use crate::cli::args::Cli;
use crate::error::CertEvalError;
use crate::evaluator::aggregator::VerdictTally;
use crate::evaluator::{CertificationReport, DefinitionCandidate, EvaluationReport, ProviderRun};
use crate::models::{ColumnSummary, DictionaryEntry, Mandate, Verdict};

const BAR_WIDTH: usize = 30;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

pub struct ReportFormatter {
    use_colors: bool,
    verbose: bool,
}

impl ReportFormatter {
    pub fn new(use_colors: bool, verbose: bool) -> Self {
        Self {
            use_colors,
            verbose,
        }
    }

    pub fn for_cli(cli: &Cli) -> Self {
        Self::new(cli.should_use_color(), cli.is_verbose())
    }

    pub fn format_evaluation_report(&self, report: &EvaluationReport) -> String {
        let mut output = self.format_header(&format!("Product Name: {}", report.product_name));
        output.push_str("\n\n");

        for certification in &report.certifications {
            output.push_str(&self.format_certification(certification));
            output.push('\n');
        }

        output
    }

    fn format_certification(&self, report: &CertificationReport) -> String {
        let assessment = &report.assessment;
        let color = if assessment.good_candidate { GREEN } else { RED };
        let minimum = assessment
            .minimum_percentage
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|| "-".to_string());

        let mut output = format!(
            "{}\n{}\n{}\n",
            self.paint(&format!("{}{}", BOLD, color), &assessment.certification),
            self.paint(&format!("{}{}", BOLD, color), &minimum),
            self.paint(BOLD, assessment.headline()),
        );

        for run in &report.runs {
            output.push_str(&self.format_provider_run(run));
            output.push('\n');
        }

        output
    }

    fn format_provider_run(&self, run: &ProviderRun) -> String {
        let summary = &run.summary;
        let tally = VerdictTally {
            passed: summary.passed_count,
            failed: summary.failed_count,
            indeterminate: summary.indeterminate_count,
            errored: run
                .entries
                .iter()
                .filter(|e| e.verdict == Verdict::Error)
                .count(),
        };

        let mut line = format!(
            "  {:<8} {} {}%  {} passed, {} failed, {} more info needed",
            summary.provider_name,
            self.format_bar(&tally),
            summary.pass_percentage,
            summary.passed_count,
            summary.failed_count,
            summary.indeterminate_count,
        );
        if tally.errored > 0 {
            line.push_str(&format!(", {} errors", tally.errored));
        }
        line.push_str(&format!(" ({}s)", summary.elapsed_seconds));

        if self.verbose {
            for entry in &run.entries {
                line.push_str(&format!(
                    "\n      Mandate {}: {} [{}]",
                    entry.mandate_number,
                    entry.mandate_title,
                    self.paint(verdict_color(entry.verdict), entry.verdict.label())
                ));
            }
        }

        line
    }

    /// Stacked bar of passed, failed, more-info-needed and errored mandates.
    fn format_bar(&self, tally: &VerdictTally) -> String {
        let parts = [
            (tally.passed, GREEN, '#'),
            (tally.failed, RED, 'x'),
            (tally.indeterminate, YELLOW, '?'),
            (tally.errored, MAGENTA, '!'),
        ];
        let widths = segment_widths(&parts.map(|(count, _, _)| count), BAR_WIDTH);
        let filled: usize = widths.iter().sum();

        let mut bar = String::from("[");
        for ((_, color, symbol), width) in parts.iter().zip(widths) {
            if width == 0 {
                continue;
            }
            if self.use_colors {
                bar.push_str(&self.paint(color, &"█".repeat(width)));
            } else {
                bar.push_str(&symbol.to_string().repeat(width));
            }
        }
        bar.push_str(&" ".repeat(BAR_WIDTH - filled));
        bar.push(']');
        bar
    }

    /// Definition review screen: where the column sits in the pending queue,
    /// its statistics, the current definition and one proposal per provider.
    ///
    /// `position` is `(index, pending)`, 1-based, or `None` for a column that
    /// is already approved. Statistics come from the column summary; columns
    /// without one (ID columns) fall back to the dictionary's own fields.
    pub fn format_definitions(
        &self,
        entry: &DictionaryEntry,
        summary: Option<&ColumnSummary>,
        position: Option<(usize, usize)>,
        candidates: &[DefinitionCandidate],
    ) -> String {
        let mut output = self.format_header(&format!("Column: {}", entry.column_name));
        match position {
            Some((index, pending)) => {
                output.push_str(&format!("\n{} of {} pending", index, pending))
            }
            None => output.push_str(&format!("\n{}", self.paint(GREEN, "Already approved"))),
        }

        let (values, unit, min, max) = match summary {
            Some(summary) => (
                summary.column_values.as_str(),
                summary.unit(),
                summary.range().map(|(min, _)| min),
                summary.range().map(|(_, max)| max),
            ),
            None => (
                entry.top_values.as_str(),
                non_empty(&entry.unit),
                non_empty(&entry.min),
                non_empty(&entry.max),
            ),
        };
        output.push_str(&format!(
            "\nMost Common Values: {}\nColumn Unit: {}\nColumn Minimum: {}\nColumn Maximum: {}",
            non_empty(values).unwrap_or("N/A"),
            unit.unwrap_or("N/A"),
            min.unwrap_or("N/A"),
            max.unwrap_or("N/A"),
        ));
        if summary.is_none() {
            output.push_str("\nID column: enter a definition manually or accept the one below.");
        }

        output.push_str(&format!(
            "\n\n{}\n{}\n",
            self.paint(BOLD, "Existing definition"),
            non_empty(&entry.definition).unwrap_or("(none)")
        ));
        for candidate in candidates {
            output.push_str(&format!(
                "\n{}\n{}\n",
                self.paint(BOLD, &candidate.provider_name),
                candidate.definition
            ));
        }
        output
    }

    pub fn format_approval(&self, entry: &DictionaryEntry) -> String {
        format!(
            "{} {}\n{}",
            self.paint(GREEN, "Approved"),
            entry.column_name,
            entry.definition
        )
    }

    pub fn format_certifications(&self, certifications: &[&str]) -> String {
        let mut output = self.format_header("Certifications");
        for certification in certifications {
            output.push_str(&format!("\n  {}", certification));
        }
        output
    }

    pub fn format_mandates(&self, certification: &str, mandates: &[&Mandate]) -> String {
        let mut output = self.format_header(&format!("{} Certification", certification));
        for mandate in mandates {
            output.push_str(&format!(
                "\n\n{}\n{}",
                self.paint(BOLD, &mandate.label()),
                mandate.description
            ));
            if !mandate.relevant_columns.is_empty() {
                let columns: Vec<&str> = mandate
                    .relevant_columns
                    .iter()
                    .map(|c| c.display_name.as_str())
                    .collect();
                output.push_str(&format!("\nRelevant columns: {}", columns.join(", ")));
            }
        }
        output
    }

    pub fn format_error(&self, error: &CertEvalError) -> String {
        format!("{} {}", self.paint(&format!("{}{}", BOLD, RED), "error:"), error)
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("{}\x1b[36m═══ {} ═══{}", BOLD, title, RESET)
        } else {
            format!("=== {} ===", title)
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }
}

fn verdict_color(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Compliant => GREEN,
        Verdict::NonCompliant => RED,
        Verdict::Indeterminate => YELLOW,
        Verdict::Error => MAGENTA,
    }
}

// Cumulative rounding keeps the segments summing to the full width.
fn segment_widths(counts: &[usize], width: usize) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0; counts.len()];
    }

    let mut widths = Vec::with_capacity(counts.len());
    let mut cumulative = 0;
    let mut previous_edge = 0;
    for count in counts {
        cumulative += count;
        let edge = (cumulative * width + total / 2) / total;
        widths.push(edge - previous_edge);
        previous_edge = edge;
    }
    widths
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}
