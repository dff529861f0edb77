use serde::Serialize;

use element_match::criteria::Criteria;
use element_match::matcher::{MatchedAttributes, MatchingResult};

/// JSON form of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    /// Id of the marked element that was searched for
    pub element_id: String,
    /// Fingerprint of the marked element the changed document was scored against
    pub criteria: Criteria,
    /// Matches, best first
    pub results: Vec<MatchSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    /// Structural path of the matched element, e.g. "html > body > div[1] > a"
    pub path: String,
    /// Number of matched criteria entries
    pub score: usize,
    pub matched_attributes: MatchedAttributes,
}

impl From<&MatchingResult<'_>> for MatchSummary {
    fn from(result: &MatchingResult<'_>) -> Self {
        Self {
            path: result.path(),
            score: result.score(),
            matched_attributes: result.matched_attributes().clone(),
        }
    }
}
