use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use element_match::matcher::DEFAULT_CANDIDATE_TAG;

use crate::error::AppError;

/// Id of the marked element when none is given on the command line.
pub const DEFAULT_ELEMENT_ID: &str = "make-everything-ok-button";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Locate a marked element of an HTML document in a changed version of it",
    long_about = None
)]
pub struct Cli {
    /// Original HTML document containing the marked element
    pub original: PathBuf,

    /// Changed HTML document to search
    pub changed: PathBuf,

    /// Id of the marked element in the original document
    #[arg(default_value = DEFAULT_ELEMENT_ID)]
    pub element_id: String,

    /// Tag of the elements scored as candidates
    #[arg(long, default_value = DEFAULT_CANDIDATE_TAG)]
    pub tag: String,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Settings for a single run, validated from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// Original document holding the marked element.
    pub original_path: PathBuf,
    /// Changed document searched for the marked element.
    pub changed_path: PathBuf,
    /// Id of the marked element, matched exactly.
    pub element_id: String,
    /// Lowercased tag of the elements scored when the id is gone.
    pub candidate_tag: String,
    /// Layout of the report written to stdout.
    pub format: OutputFormat,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, AppError> {
        if cli.element_id.is_empty() {
            return Err(AppError::Invocation("element id must not be empty".to_string()));
        }
        let candidate_tag = cli.tag.trim().to_ascii_lowercase();
        if candidate_tag.is_empty() {
            return Err(AppError::Invocation("candidate tag must not be empty".to_string()));
        }

        Ok(Self {
            original_path: cli.original,
            changed_path: cli.changed,
            element_id: cli.element_id,
            candidate_tag,
            format: cli.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, AppError> {
        let cli = Cli::try_parse_from(std::iter::once("ok-finder").chain(args.iter().copied()))
            .map_err(|e| AppError::Invocation(e.to_string()))?;
        Config::from_cli(cli)
    }

    #[test]
    fn defaults() {
        let config = parse(&["origin.html", "diff.html"]).unwrap();
        assert_eq!(config.original_path, PathBuf::from("origin.html"));
        assert_eq!(config.changed_path, PathBuf::from("diff.html"));
        assert_eq!(config.element_id, DEFAULT_ELEMENT_ID);
        assert_eq!(config.candidate_tag, "a");
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn explicit_id_tag_and_format() {
        let config = parse(&[
            "origin.html",
            "diff.html",
            "submit",
            "--tag",
            "BUTTON",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(config.element_id, "submit");
        assert_eq!(config.candidate_tag, "button");
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn fewer_than_two_files_is_rejected() {
        assert!(matches!(parse(&[]), Err(AppError::Invocation(_))));
        assert!(matches!(parse(&["origin.html"]), Err(AppError::Invocation(_))));
    }

    #[test]
    fn empty_values_are_rejected() {
        assert!(matches!(
            parse(&["origin.html", "diff.html", ""]),
            Err(AppError::Invocation(_))
        ));
        assert!(matches!(
            parse(&["origin.html", "diff.html", "--tag", " "]),
            Err(AppError::Invocation(_))
        ));
    }
}
