use crate::matcher::MatchingResult;

/// Order results best first. The sort is stable, so results with equal scores keep the
/// order in which they were discovered.
pub fn rank(mut results: Vec<MatchingResult<'_>>) -> Vec<MatchingResult<'_>> {
    results.sort_by(|a, b| b.score().cmp(&a.score()));
    results
}
