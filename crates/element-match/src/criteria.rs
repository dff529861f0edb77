use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::document::Document;

/// Fingerprint of the marked element in the original document: its attributes plus its
/// rendered text under the synthetic [`Criteria::TEXT_KEY`] key.
///
/// An empty `Criteria` means the marked element was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Criteria(BTreeMap<String, String>);

impl Criteria {
    pub const TEXT_KEY: &'static str = "text";

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The fingerprinted text, if any.
    pub fn text(&self) -> Option<&str> {
        self.get(Self::TEXT_KEY)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Build the fingerprint of the element whose id is `target_id`.
///
/// Attribute values are copied verbatim. The text entry is inserted last, so an attribute
/// literally named `text` is overwritten by the element's text.
pub fn extract_criteria(document: &Document, target_id: &str) -> Criteria {
    let Some(element) = document.element_by_id(target_id) else {
        debug!(target_id, "marked element not found");
        return Criteria::default();
    };

    let mut criteria: BTreeMap<String, String> = element
        .attributes()
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    criteria.insert(Criteria::TEXT_KEY.to_string(), element.text());

    debug!(
        target_id,
        tag = element.tag_name(),
        keys = criteria.len(),
        "extracted criteria"
    );
    Criteria(criteria)
}
