use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Known license groups. Files in the same bucket share one license text in
/// the credits document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LicenseBucket {
    /// The project's own license; the fuzzy-match baseline.
    #[serde(rename = "LGPL")]
    Lgpl,
    #[serde(rename = "MIPS")]
    Mips,
    #[serde(rename = "JPEG")]
    Jpeg,
    /// Ogg parsers by Ahlberg and Rullgård (MIT/X11 style).
    #[serde(rename = "OGG_MA_MR_2005")]
    OggMaMr2005,
}

impl LicenseBucket {
    pub const ALL: [LicenseBucket; 4] = [
        LicenseBucket::Lgpl,
        LicenseBucket::Mips,
        LicenseBucket::Jpeg,
        LicenseBucket::OggMaMr2005,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LicenseBucket::Lgpl => "LGPL",
            LicenseBucket::Mips => "MIPS",
            LicenseBucket::Jpeg => "JPEG",
            LicenseBucket::OggMaMr2005 => "OGG_MA_MR_2005",
        }
    }

    /// The reference bucket is always rendered last.
    pub fn is_reference(&self) -> bool {
        match self {
            LicenseBucket::Lgpl => true,
            LicenseBucket::Mips | LicenseBucket::Jpeg | LicenseBucket::OggMaMr2005 => false,
        }
    }

    pub fn reference() -> Self {
        LicenseBucket::Lgpl
    }
}

impl std::fmt::Display for LicenseBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for LicenseBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LicenseBucket::ALL
            .into_iter()
            .find(|b| b.name() == s.trim())
            .ok_or_else(|| format!("unknown license bucket '{}'", s.trim()))
    }
}

/// One row of the bucket table: a file whose header is known to carry a
/// bucket's license, and the MD5 of that header when it was last reviewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketEntry {
    /// Path relative to the source root, `/`-separated.
    pub path: String,
    pub license: LicenseBucket,
    pub digest: String,
}

impl BucketEntry {
    pub fn new(path: &str, license: LicenseBucket, digest: &str) -> Self {
        Self {
            path: path.to_string(),
            license,
            digest: digest.to_string(),
        }
    }
}

/// Outcome of classifying one source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationResult {
    /// Header matched a known bucket (or the reference license).
    Bucketed { path: String, bucket: LicenseBucket },
    /// Header is unique to this file and is printed in full.
    Verbatim { path: String, text: String },
    /// No complete comment block was found.
    Unparseable { path: String },
}

impl ClassificationResult {
    pub fn path(&self) -> &str {
        match self {
            ClassificationResult::Bucketed { path, .. }
            | ClassificationResult::Verbatim { path, .. }
            | ClassificationResult::Unparseable { path } => path,
        }
    }
}

impl std::fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassificationResult::Bucketed { bucket, .. } => write!(f, "{}", bucket),
            ClassificationResult::Verbatim { .. } => write!(f, "verbatim"),
            ClassificationResult::Unparseable { .. } => write!(f, "unparseable"),
        }
    }
}
