//! Accumulates per-file results and renders the credits document.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Serialize;

use crate::error::{CreditsError, Result};
use crate::models::{ClassificationResult, LicenseBucket};

/// Printed between every section of the document.
pub const LICENSE_SEPARATOR: &str = "\n\n********************************************************************************\n\n";

/// Texts that are copied into the document as-is.
#[derive(Debug, Clone, Default)]
pub struct LicenseTexts {
    /// Project license overview, always printed first.
    pub overview: String,
    texts: HashMap<LicenseBucket, String>,
}

impl LicenseTexts {
    pub fn new(overview: impl Into<String>) -> Self {
        Self {
            overview: overview.into(),
            texts: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn with(mut self, bucket: LicenseBucket, text: impl Into<String>) -> Self {
        self.texts.insert(bucket, text.into());
        self
    }

    /// Read the overview and every bucket's license text from disk.
    pub fn load<'a>(
        overview: &Path,
        bucket_texts: impl IntoIterator<Item = (LicenseBucket, &'a Path)>,
    ) -> Result<Self> {
        let mut texts = Self::new(read_text(overview)?);
        for (bucket, path) in bucket_texts {
            texts.texts.insert(bucket, read_text(path)?);
        }
        Ok(texts)
    }

    pub fn get(&self, bucket: LicenseBucket) -> Result<&str> {
        self.texts
            .get(&bucket)
            .map(String::as_str)
            .ok_or(CreditsError::MissingLicenseText(bucket))
    }
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CreditsError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// File counts per outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub bucketed: usize,
    pub verbatim: usize,
    pub unparseable: usize,
    pub per_bucket: BTreeMap<LicenseBucket, usize>,
}

/// The three result collections of one run.
#[derive(Debug, Default)]
pub struct Credits {
    /// Bucket -> files sharing that license.
    bucketed: BTreeMap<LicenseBucket, Vec<String>>,
    /// Path -> header printed in full.
    verbatim: BTreeMap<String, String>,
    /// Files without a usable header. Any entry here blocks rendering.
    unparseable: Vec<String>,
}

impl Credits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_bucketed(&mut self, bucket: LicenseBucket, path: &str) {
        self.bucketed.entry(bucket).or_default().push(path.to_string());
    }

    pub fn record_verbatim(&mut self, path: &str, text: &str) {
        self.verbatim.insert(path.to_string(), text.to_string());
    }

    pub fn record_unparseable(&mut self, path: &str) {
        self.unparseable.push(path.to_string());
    }

    pub fn record(&mut self, result: &ClassificationResult) {
        match result {
            ClassificationResult::Bucketed { path, bucket } => self.record_bucketed(*bucket, path),
            ClassificationResult::Verbatim { path, text } => self.record_verbatim(path, text),
            ClassificationResult::Unparseable { path } => self.record_unparseable(path),
        }
    }

    pub fn unparseable(&self) -> &[String] {
        &self.unparseable
    }

    pub fn stats(&self) -> Stats {
        Stats {
            bucketed: self.bucketed.values().map(Vec::len).sum(),
            verbatim: self.verbatim.len(),
            unparseable: self.unparseable.len(),
            per_bucket: self
                .bucketed
                .iter()
                .map(|(bucket, files)| (*bucket, files.len()))
                .collect(),
        }
    }

    /// Render the credits document.
    ///
    /// Order: overview, verbatim headers by path, each non-reference bucket by
    /// name with its sorted file list and license text, then the reference
    /// license text.
    pub fn render(&self, texts: &LicenseTexts) -> Result<String> {
        if !self.unparseable.is_empty() {
            return Err(CreditsError::UnparseableFiles(self.unparseable.clone()));
        }

        let mut out = String::new();
        out.push_str(&texts.overview);

        for (path, text) in &self.verbatim {
            out.push_str(LICENSE_SEPARATOR);
            out.push_str(&format!("{}\n\n{}", path, text));
        }

        let mut buckets: Vec<_> = self
            .bucketed
            .iter()
            .filter(|(bucket, _)| !bucket.is_reference())
            .collect();
        buckets.sort_by_key(|(bucket, _)| bucket.name());

        for (bucket, files) in buckets {
            let mut files = files.clone();
            files.sort();
            out.push_str(LICENSE_SEPARATOR);
            out.push_str(&files.join("\n"));
            out.push_str("\n\n");
            out.push_str(texts.get(*bucket)?);
        }

        out.push_str(LICENSE_SEPARATOR);
        out.push_str(texts.get(LicenseBucket::reference())?);

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts() -> LicenseTexts {
        LicenseTexts::new("OVERVIEW\n")
            .with(LicenseBucket::Lgpl, "FULL LGPL\n")
            .with(LicenseBucket::Mips, "MIPS TEXT\n")
            .with(LicenseBucket::Jpeg, "JPEG TEXT\n")
            .with(LicenseBucket::OggMaMr2005, "OGG TEXT\n")
    }

    #[test]
    fn test_separator_shape() {
        assert_eq!(LICENSE_SEPARATOR, format!("\n\n{}\n\n", "*".repeat(80)));
    }

    #[test]
    fn test_render_layout() {
        let mut credits = Credits::new();
        credits.record_verbatim("libavutil/custom.c", "Custom license.");
        credits.record_bucketed(LicenseBucket::Mips, "libavcodec/mips/b.c");
        credits.record_bucketed(LicenseBucket::Mips, "libavcodec/mips/a.c");
        credits.record_bucketed(LicenseBucket::Lgpl, "libavcodec/h264.c");

        let doc = credits.render(&texts()).unwrap();
        let expected = [
            "OVERVIEW\n",
            LICENSE_SEPARATOR,
            "libavutil/custom.c\n\nCustom license.",
            LICENSE_SEPARATOR,
            "libavcodec/mips/a.c\nlibavcodec/mips/b.c\n\nMIPS TEXT\n",
            LICENSE_SEPARATOR,
            "FULL LGPL\n",
        ]
        .concat();
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_verbatim_sorted_by_path() {
        let mut credits = Credits::new();
        credits.record_verbatim("z.c", "Z");
        credits.record_verbatim("a.c", "A");
        let doc = credits.render(&texts()).unwrap();
        assert!(doc.find("a.c\n\nA").unwrap() < doc.find("z.c\n\nZ").unwrap());
    }

    #[test]
    fn test_buckets_sorted_by_name_reference_last() {
        let mut credits = Credits::new();
        credits.record_bucketed(LicenseBucket::OggMaMr2005, "libavformat/oggdec.c");
        credits.record_bucketed(LicenseBucket::Lgpl, "libavcodec/x.c");
        credits.record_bucketed(LicenseBucket::Mips, "libavutil/fixed_dsp.c");
        credits.record_bucketed(LicenseBucket::Jpeg, "libavcodec/jrevdct.c");

        let doc = credits.render(&texts()).unwrap();
        let jpeg = doc.find("JPEG TEXT").unwrap();
        let mips = doc.find("MIPS TEXT").unwrap();
        let ogg = doc.find("OGG TEXT").unwrap();
        let lgpl = doc.find("FULL LGPL").unwrap();
        assert!(jpeg < mips && mips < ogg && ogg < lgpl);
        assert!(doc.ends_with("FULL LGPL\n"));
        // Reference files are covered by the full text; they are not listed.
        assert!(!doc.contains("libavcodec/x.c"));
    }

    #[test]
    fn test_reference_text_always_rendered() {
        let doc = Credits::new().render(&texts()).unwrap();
        assert_eq!(doc, format!("OVERVIEW\n{}FULL LGPL\n", LICENSE_SEPARATOR));
    }

    #[test]
    fn test_unparseable_blocks_render() {
        let mut credits = Credits::new();
        credits.record_verbatim("a.c", "A");
        credits.record_unparseable("libavcodec/broken.c");
        credits.record_unparseable("libavcodec/empty.h");
        match credits.render(&texts()).unwrap_err() {
            CreditsError::UnparseableFiles(files) => {
                assert_eq!(files, vec!["libavcodec/broken.c", "libavcodec/empty.h"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_bucket_text() {
        let mut credits = Credits::new();
        credits.record_bucketed(LicenseBucket::Jpeg, "libavcodec/jfdctfst.c");
        let texts = LicenseTexts::new("").with(LicenseBucket::Lgpl, "LGPL");
        assert!(matches!(
            credits.render(&texts),
            Err(CreditsError::MissingLicenseText(LicenseBucket::Jpeg))
        ));
    }

    #[test]
    fn test_stats() {
        let mut credits = Credits::new();
        credits.record(&ClassificationResult::Bucketed {
            path: "a.c".to_string(),
            bucket: LicenseBucket::Lgpl,
        });
        credits.record(&ClassificationResult::Bucketed {
            path: "b.c".to_string(),
            bucket: LicenseBucket::Mips,
        });
        credits.record(&ClassificationResult::Verbatim {
            path: "c.c".to_string(),
            text: "C".to_string(),
        });
        credits.record(&ClassificationResult::Unparseable {
            path: "d.c".to_string(),
        });

        let stats = credits.stats();
        assert_eq!(stats.bucketed, 2);
        assert_eq!(stats.verbatim, 1);
        assert_eq!(stats.unparseable, 1);
        assert_eq!(stats.per_bucket.get(&LicenseBucket::Mips), Some(&1));
        assert_eq!(credits.unparseable(), ["d.c".to_string()]);
    }

    #[test]
    fn test_load_texts_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let overview = dir.path().join("LICENSE.md");
        let mips = dir.path().join("mips.txt");
        std::fs::write(&overview, "overview").unwrap();
        std::fs::write(&mips, "mips").unwrap();

        let texts = LicenseTexts::load(&overview, [(LicenseBucket::Mips, mips.as_path())]).unwrap();
        assert_eq!(texts.overview, "overview");
        assert_eq!(texts.get(LicenseBucket::Mips).unwrap(), "mips");
        assert!(texts.get(LicenseBucket::Jpeg).is_err());

        let missing = dir.path().join("nope.txt");
        assert!(matches!(
            LicenseTexts::load(&missing, Vec::<(LicenseBucket, &Path)>::new()),
            Err(CreditsError::Read { .. })
        ));
    }
}
