use std::path::PathBuf;

/// Errors raised while turning an HTML source into a [`Document`](crate::document::Document).
///
/// Matching itself never fails: an empty result set is a successful outcome. Binaries wrap
/// `DocumentError` in their own error type via `#[from]`.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
