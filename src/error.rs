use std::path::PathBuf;

use thiserror::Error;

use crate::models::LicenseBucket;

/// Fatal conditions of a credits run. None of these are recovered from:
/// the credits document must not be produced from partial data.
#[derive(Error, Debug)]
pub enum CreditsError {
    /// A bucketed file's header no longer hashes to its recorded digest.
    #[error(
        "File {path} header has changed (was: {expected} now: {actual}). Inspect the header \
         and update the exceptions table to continue generating credits."
    )]
    DigestMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// Files with no recognisable header block.
    #[error("failed to find license header for {} file(s): {}", .0.len(), .0.join(", "))]
    UnparseableFiles(Vec<String>),

    #[error("no license text configured for bucket {0}")]
    MissingLicenseText(LicenseBucket),

    /// Bucket table keys are root-relative, so such a file cannot be classified.
    #[error("{} is outside the source root {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CreditsError>;
