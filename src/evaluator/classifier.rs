use crate::models::Verdict;

/// Turns a provider's free-text answer into a verdict.
pub trait ResponseClassifier: Send + Sync {
    fn classify(&self, response: &str) -> Verdict;
}

/// Markers of a compliant answer. Matched exactly as written.
pub const COMPLIANT_MARKERS: &[&str] = &["TRUE", "does meet"];

/// Markers of an answer that lacks information. Matched ignoring case.
pub const INDETERMINATE_MARKERS: &[&str] = &["more info", "not provided", "cannot determine"];

/// Substring heuristic used for every logged recommendation so far.
///
/// It is not a parser: a refusal that happens to contain "does meet" is
/// read as compliant. Markers and their precedence are fixed: earlier log
/// rows were classified with them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringClassifier;

impl ResponseClassifier for SubstringClassifier {
    fn classify(&self, response: &str) -> Verdict {
        classify(response)
    }
}

pub fn classify(response: &str) -> Verdict {
    if COMPLIANT_MARKERS
        .iter()
        .any(|marker| response.contains(marker))
    {
        return Verdict::Compliant;
    }

    let lower = response.to_lowercase();
    if INDETERMINATE_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
    {
        return Verdict::Indeterminate;
    }

    Verdict::NonCompliant
}
