use crate::models::{CandidateAssessment, LogEntry, SummaryRecord, Verdict};
use std::time::Duration;

/// Lowest per-provider pass percentage that still makes a good candidate.
pub const GOOD_CANDIDATE_THRESHOLD: u32 = 55;

/// Verdict counts of one (product, certification, provider) run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerdictTally {
    pub passed: usize,
    pub failed: usize,
    pub indeterminate: usize,
    pub errored: usize,
}

impl VerdictTally {
    pub fn from_verdicts<I>(verdicts: I) -> Self
    where
        I: IntoIterator<Item = Verdict>,
    {
        let mut tally = Self::default();
        for verdict in verdicts {
            match verdict {
                Verdict::Compliant => tally.passed += 1,
                Verdict::NonCompliant => tally.failed += 1,
                Verdict::Indeterminate => tally.indeterminate += 1,
                Verdict::Error => tally.errored += 1,
            }
        }
        tally
    }

    /// Errored mandates stay out of the ratio. A run with no determinate
    /// answer only gets the 100 fallback when nothing errored; otherwise it
    /// scores 0.
    pub fn pass_percentage(&self) -> u32 {
        if self.passed + self.failed == 0 && self.errored > 0 {
            return 0;
        }
        pass_percentage(self.passed, self.failed)
    }
}

/// Share of determinate mandates that passed, rounded half to even.
///
/// With no determinate mandate at all the result is 100: a run that only
/// produced "more info needed" answers does not count against the product.
pub fn pass_percentage(passed: usize, failed: usize) -> u32 {
    let determinate = passed + failed;
    if determinate == 0 {
        return 100;
    }
    (passed as f64 / determinate as f64 * 100.0).round_ties_even() as u32
}

pub struct EvaluationAggregator;

impl EvaluationAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Summarizes the entries belonging to `certification` and `provider_name`;
    /// entries for other pairs are ignored.
    pub fn summarize(
        &self,
        product_name: &str,
        certification: &str,
        provider_name: &str,
        entries: &[LogEntry],
        elapsed: Duration,
    ) -> SummaryRecord {
        let tally = VerdictTally::from_verdicts(
            entries
                .iter()
                .filter(|e| e.certification == certification && e.provider_name == provider_name)
                .map(|e| e.verdict),
        );

        SummaryRecord {
            product_name: product_name.to_string(),
            provider_name: provider_name.to_string(),
            certification: certification.to_string(),
            passed_count: tally.passed,
            failed_count: tally.failed,
            indeterminate_count: tally.indeterminate,
            pass_percentage: tally.pass_percentage(),
            elapsed_seconds: elapsed.as_secs_f64().round() as u64,
            cost: 0.0,
        }
    }

    /// Good candidate when every provider reached the threshold. No provider
    /// results means no recommendation.
    pub fn assess(
        &self,
        certification: &str,
        provider_percentages: Vec<(String, u32)>,
    ) -> CandidateAssessment {
        let minimum_percentage = provider_percentages.iter().map(|(_, p)| *p).min();
        let good_candidate = minimum_percentage
            .map(|min| min >= GOOD_CANDIDATE_THRESHOLD)
            .unwrap_or(false);

        CandidateAssessment {
            certification: certification.to_string(),
            provider_percentages,
            minimum_percentage,
            good_candidate,
        }
    }
}

impl Default for EvaluationAggregator {
    fn default() -> Self {
        Self::new()
    }
}
