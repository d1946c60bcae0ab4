use std::collections::HashMap;

use md5::{Digest, Md5};

use crate::error::{CreditsError, Result};
use crate::models::{BucketEntry, ClassificationResult, LicenseBucket};

/// Immutable path -> (bucket, digest) lookup, built once per run.
#[derive(Debug, Clone, Default)]
pub struct BucketTable {
    entries: HashMap<String, (LicenseBucket, String)>,
}

impl BucketTable {
    pub fn new(entries: &[BucketEntry]) -> Self {
        let entries = entries
            .iter()
            .map(|e| (e.path.clone(), (e.license, e.digest.to_ascii_lowercase())))
            .collect();
        Self { entries }
    }

    pub fn get(&self, rel_path: &str) -> Option<(LicenseBucket, &str)> {
        self.entries
            .get(rel_path)
            .map(|(bucket, digest)| (*bucket, digest.as_str()))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Lowercase hex MD5 of the text. Only used to notice header drift.
pub fn header_digest(text: &str) -> String {
    format!("{:x}", Md5::digest(text.as_bytes()))
}

/// Classify a header that is not a close match for the reference license.
///
/// Files listed in `table` must still hash to their recorded digest; anything
/// else means the header changed and needs a human to look at it. Files not in
/// the table get their header printed verbatim.
pub fn resolve(table: &BucketTable, rel_path: &str, comment_lines: &[String]) -> Result<ClassificationResult> {
    let text = comment_lines.concat();

    let Some((bucket, expected)) = table.get(rel_path) else {
        return Ok(ClassificationResult::Verbatim {
            path: rel_path.to_string(),
            text: text.trim().to_string(),
        });
    };

    let actual = header_digest(&text);
    if actual != expected {
        return Err(CreditsError::DigestMismatch {
            path: rel_path.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }

    Ok(ClassificationResult::Bucketed {
        path: rel_path.to_string(),
        bucket,
    })
}
