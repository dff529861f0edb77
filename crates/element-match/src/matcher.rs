use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};

use crate::criteria::Criteria;
use crate::document::{Document, ElementRef};
use crate::path::render_path;

/// Tag scanned for candidates when the marked id is gone from the changed document.
pub const DEFAULT_CANDIDATE_TAG: &str = "a";

/// The subset of the criteria a candidate satisfies exactly.
pub type MatchedAttributes = BTreeMap<String, String>;

/// A candidate element paired with the criteria entries it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingResult<'doc> {
    element: ElementRef<'doc>,
    matched_attributes: MatchedAttributes,
}

impl<'doc> MatchingResult<'doc> {
    pub fn element(&self) -> ElementRef<'doc> {
        self.element
    }

    pub fn matched_attributes(&self) -> &MatchedAttributes {
        &self.matched_attributes
    }

    /// Number of matched criteria entries, the synthetic text entry included.
    pub fn score(&self) -> usize {
        self.matched_attributes.len()
    }

    pub fn path(&self) -> String {
        render_path(self.element)
    }
}

impl fmt::Display for MatchingResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Path: {}. Matching score: {}. Matches: {{",
            self.path(),
            self.score()
        )?;
        for (i, (key, value)) in self.matched_attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("}")
    }
}

/// Find the elements of `document` that resemble the fingerprinted element.
///
/// If `target_id` is still present, that element is the only result, matched on `id` alone.
/// Otherwise every `candidate_tag` element is scored against `criteria`, and those matching
/// nothing are dropped. Results come back in document order; see
/// [`rank`](crate::ranking::rank) for ordering by score.
///
/// `criteria` must be non-empty; callers treat an empty fingerprint as "marked element not
/// found" and stop before matching.
pub fn find_matches<'doc>(
    document: &'doc Document,
    criteria: &Criteria,
    target_id: &str,
    candidate_tag: &str,
) -> Vec<MatchingResult<'doc>> {
    if let Some(element) = document.element_by_id(target_id) {
        debug!(target_id, "marked id still present, skipping candidate scan");
        return vec![MatchingResult {
            element,
            matched_attributes: MatchedAttributes::from([(
                "id".to_string(),
                target_id.to_string(),
            )]),
        }];
    }

    let candidates = document.elements_by_tag(candidate_tag);
    debug!(
        candidate_tag,
        candidates = candidates.len(),
        "scanning candidates"
    );

    let mut results = Vec::new();
    for element in candidates {
        let matched_attributes = score_candidate(element, criteria);
        if matched_attributes.is_empty() {
            trace!(candidate = ?element, "candidate matched nothing");
            continue;
        }
        debug!(
            candidate = ?element,
            score = matched_attributes.len(),
            "candidate matched"
        );
        results.push(MatchingResult {
            element,
            matched_attributes,
        });
    }
    results
}

fn score_candidate(element: ElementRef<'_>, criteria: &Criteria) -> MatchedAttributes {
    let mut matched: MatchedAttributes = element
        .attributes()
        .iter()
        .filter(|(key, value)| criteria.get(key) == Some(value.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let text = element.text();
    if !text.is_empty() && criteria.text() == Some(text.as_str()) {
        matched.insert(Criteria::TEXT_KEY.to_string(), text);
    }
    matched
}
