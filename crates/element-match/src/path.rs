use crate::document::ElementRef;

const SEGMENT_SEPARATOR: &str = " > ";

/// Render the structural path from the top-level element down to `element`, e.g.
/// `html > body > div[1] > a`.
///
/// An ancestor that shares its tag with other siblings is suffixed with its zero-based index
/// among those same-tag siblings. The element itself is never indexed. The path is meant for
/// display; it is not a selector for any query language.
pub fn render_path(element: ElementRef<'_>) -> String {
    let mut segments: Vec<String> = element
        .parents()
        .into_iter()
        .rev()
        .map(render_segment)
        .collect();
    segments.push(element.tag_name().to_string());
    segments.join(SEGMENT_SEPARATOR)
}

fn render_segment(element: ElementRef<'_>) -> String {
    let same_tag: Vec<ElementRef<'_>> = element
        .siblings()
        .into_iter()
        .filter(|sibling| sibling.tag_name() == element.tag_name())
        .collect();

    if same_tag.len() > 1 {
        let index = same_tag
            .iter()
            .position(|sibling| *sibling == element)
            .unwrap_or_default();
        format!("{}[{}]", element.tag_name(), index)
    } else {
        element.tag_name().to_string()
    }
}
