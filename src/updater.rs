use std::path::{Path, PathBuf};

use crate::credits::{Credits, LicenseTexts};
use crate::error::{CreditsError, Result};
use crate::license::classifier::Classifier;
use crate::license::extractor::{extract_first_comment_block, CommentStyle};
use crate::license::resolver::BucketTable;
use crate::models::ClassificationResult;
use crate::walker::{normalize_lexically, relative_path};

/// One credits run over a source tree.
///
/// Files are fed in one at a time with [`CreditsUpdater::process_file`]; the
/// collected credits are rendered once every file has been seen.
pub struct CreditsUpdater {
    root: PathBuf,
    classifier: Classifier,
    credits: Credits,
    results: Vec<ClassificationResult>,
}

impl CreditsUpdater {
    pub fn new(root: &Path, table: BucketTable) -> Self {
        Self::with_classifier(root, Classifier::new(table))
    }

    pub fn with_classifier(root: &Path, classifier: Classifier) -> Self {
        let root = root.canonicalize().unwrap_or_else(|_| normalize_lexically(root));
        Self {
            root,
            classifier,
            credits: Credits::new(),
            results: Vec::new(),
        }
    }

    /// Classify one file. `path` may be absolute or relative to the root.
    ///
    /// A file without a header block is recorded as unparseable and does not
    /// stop the scan. A bucketed file whose header changed does, and so does a
    /// file outside the root.
    pub fn process_file(&mut self, path: &Path) -> Result<&ClassificationResult> {
        let abs = normalize_lexically(&self.root.join(path));
        let rel = self.table_key(&abs)?;

        let bytes = std::fs::read(&abs).map_err(|source| CreditsError::Read {
            path: abs.clone(),
            source,
        })?;
        let content = decode_source(bytes, &rel);

        let style = CommentStyle::detect(&abs, &content);
        let result = match extract_first_comment_block(&content, style) {
            Some(block) => self.classifier.classify(&rel, &block)?,
            None => {
                tracing::warn!(path = %rel, "no license header found");
                ClassificationResult::Unparseable { path: rel }
            }
        };

        self.credits.record(&result);
        let index = self.results.len();
        self.results.push(result);
        Ok(&self.results[index])
    }

    /// Root-relative key of `abs`. Falls back to the resolved path when `abs`
    /// only reaches the root through a symlink.
    fn table_key(&self, abs: &Path) -> Result<String> {
        relative_path(&self.root, abs)
            .or_else(|| {
                let real = abs.canonicalize().ok()?;
                relative_path(&self.root, &real)
            })
            .ok_or_else(|| CreditsError::OutsideRoot {
                path: abs.to_path_buf(),
                root: self.root.clone(),
            })
    }

    pub fn credits(&self) -> &Credits {
        &self.credits
    }

    pub fn results(&self) -> &[ClassificationResult] {
        &self.results
    }

    pub fn render(&self, texts: &LicenseTexts) -> Result<String> {
        self.credits.render(texts)
    }
}

/// Source files are read as UTF-8; stray bytes become U+FFFD so one odd
/// file does not stop the run, but the header text is then not the file's.
fn decode_source(bytes: Vec<u8>, rel: &str) -> String {
    match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!(
                path = rel,
                offset = err.utf8_error().valid_up_to(),
                "file is not valid UTF-8, invalid bytes replaced"
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}
