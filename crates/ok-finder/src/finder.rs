use std::io::Write;

use element_match::criteria::extract_criteria;
use element_match::document::Document;
use element_match::matcher::find_matches;
use element_match::ranking::rank;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::report::write_report;

/// Run one lookup: fingerprint the marked element in the original document, then score and
/// rank the changed document against it and write the report to `out`.
///
/// The changed document is not read until the fingerprint has been taken, so a missing id
/// fails without touching it. Returns the number of matches reported.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<usize, AppError> {
    let original = Document::from_path(&config.original_path)?;
    let criteria = extract_criteria(&original, &config.element_id);
    if criteria.is_empty() {
        return Err(AppError::CriteriaNotFound {
            id: config.element_id.clone(),
            file: config.original_path.clone(),
        });
    }
    info!(
        element_id = %config.element_id,
        criteria = criteria.len(),
        "fingerprinted marked element"
    );

    let changed = Document::from_path(&config.changed_path)?;
    let results = rank(find_matches(
        &changed,
        &criteria,
        &config.element_id,
        &config.candidate_tag,
    ));
    info!(
        changed = %config.changed_path.display(),
        matches = results.len(),
        best_score = results.first().map(|r| r.score()).unwrap_or_default(),
        "matching complete"
    );

    write_report(
        out,
        config.format,
        &config.element_id,
        &criteria,
        &results,
    )?;
    Ok(results.len())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;
    use crate::config::{OutputFormat, DEFAULT_ELEMENT_ID};

    const ORIGINAL: &str = r#"<html><body><div class="panel">
        <button id="make-everything-ok-button" class="btn-ok" data-x="1">OK</button>
    </div></body></html>"#;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().expect("create fixture dir"),
            }
        }

        fn path(&self, file: &str) -> PathBuf {
            self.dir.path().join(file)
        }

        fn write(&self, file: &str, html: impl AsRef<[u8]>) -> PathBuf {
            let path = self.path(file);
            std::fs::write(&path, html).expect("write fixture");
            path
        }

        fn config(&self, original: PathBuf, changed: PathBuf) -> Config {
            Config {
                original_path: original,
                changed_path: changed,
                element_id: DEFAULT_ELEMENT_ID.to_string(),
                candidate_tag: "a".to_string(),
                format: OutputFormat::Text,
            }
        }
    }

    fn run_to_string(config: &Config) -> Result<(usize, String), AppError> {
        let mut out = Vec::new();
        let count = run(config, &mut out)?;
        Ok((count, String::from_utf8(out).expect("utf-8 report")))
    }

    #[test]
    fn relocates_renamed_button() {
        let fixture = Fixture::new();
        let original = fixture.write("origin.html", ORIGINAL);
        let changed = fixture.write(
            "diff.html",
            r#"<div class="panel"><a class="btn-ok" data-x="1">OK</a><a href="/x">Cancel</a></div>"#,
        );

        let (count, report) = run_to_string(&fixture.config(original, changed)).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            report,
            "Path: html > body > div > a. Matching score: 3. Matches: {class=btn-ok, data-x=1, text=OK}"
        );
    }

    #[test]
    fn unchanged_id_takes_fast_path() {
        let fixture = Fixture::new();
        let original = fixture.write("origin.html", ORIGINAL);
        let changed = fixture.write(
            "diff.html",
            r#"<a class="btn-ok" data-x="1">OK</a>
               <a class="btn-ok" data-x="1">OK</a>
               <button id="make-everything-ok-button">Renamed</button>"#,
        );

        let (count, report) = run_to_string(&fixture.config(original, changed)).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            report,
            "Path: html > body > button. Matching score: 1. Matches: {id=make-everything-ok-button}"
        );
    }

    #[test]
    fn missing_id_fails_before_reading_changed_document() {
        let fixture = Fixture::new();
        let original = fixture.write("origin.html", r#"<button id="other">OK</button>"#);
        let changed = fixture.path("does-not-exist.html");

        let err = run_to_string(&fixture.config(original, changed)).unwrap_err();
        match err {
            AppError::CriteriaNotFound { id, .. } => assert_eq!(id, DEFAULT_ELEMENT_ID),
            other => panic!("expected CriteriaNotFound, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_document_is_reported() {
        let fixture = Fixture::new();
        let original = fixture.write("origin.html", ORIGINAL);
        let changed = fixture.path("does-not-exist.html");

        let err = run_to_string(&fixture.config(original, changed)).unwrap_err();
        assert!(matches!(err, AppError::Document(_)));
        assert!(err.to_string().contains("does-not-exist.html"));
    }

    #[test]
    fn no_matches_is_not_an_error() {
        let fixture = Fixture::new();
        let original = fixture.write("origin.html", ORIGINAL);
        let changed = fixture.write("diff.html", r#"<a href="/x">Cancel</a>"#);

        let (count, report) = run_to_string(&fixture.config(original, changed)).unwrap();
        assert_eq!(count, 0);
        assert_eq!(report, "No matches were found.");
    }

    #[test]
    fn original_with_invalid_utf8_still_fingerprints() {
        let fixture = Fixture::new();
        let original = fixture.write(
            "origin.html",
            b"<p>caf\xe9</p><button id=\"make-everything-ok-button\" class=\"ok\">OK</button>",
        );
        let changed = fixture.write("diff.html", r#"<a class="ok">Renamed</a>"#);

        let (count, report) = run_to_string(&fixture.config(original, changed)).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            report,
            "Path: html > body > a. Matching score: 1. Matches: {class=ok}"
        );
    }
}
