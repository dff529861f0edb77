use std::io::Write;

use element_match::criteria::Criteria;
use element_match::matcher::MatchingResult;

use crate::config::OutputFormat;
use crate::error::AppError;
use crate::model::{MatchReport, MatchSummary};

pub fn write_report<W: Write>(
    out: &mut W,
    format: OutputFormat,
    element_id: &str,
    criteria: &Criteria,
    results: &[MatchingResult<'_>],
) -> Result<(), AppError> {
    match format {
        OutputFormat::Text => write_text(out, results)?,
        OutputFormat::Json => write_json(out, element_id, criteria, results)?,
    }
    out.flush()?;
    Ok(())
}

/// Human readable layout: a single line for a single match, otherwise the best match followed
/// by the remaining ones in rank order.
fn write_text<W: Write>(out: &mut W, results: &[MatchingResult<'_>]) -> std::io::Result<()> {
    match results {
        [] => write!(out, "No matches were found."),
        [only] => write!(out, "{only}"),
        [best, rest @ ..] => {
            writeln!(out, "Best match: ")?;
            writeln!(out, "{best}")?;
            writeln!(out, "Maybe similar elements: ")?;
            for result in rest {
                writeln!(out, "{result}")?;
            }
            Ok(())
        }
    }
}

fn write_json<W: Write>(
    out: &mut W,
    element_id: &str,
    criteria: &Criteria,
    results: &[MatchingResult<'_>],
) -> Result<(), AppError> {
    let report = MatchReport {
        element_id: element_id.to_string(),
        criteria: criteria.clone(),
        results: results.iter().map(MatchSummary::from).collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
