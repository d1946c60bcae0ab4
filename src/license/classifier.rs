use crate::error::Result;
use crate::license::extractor::CommentBlock;
use crate::license::normalizer::normalize_comment_lines;
use crate::license::resolver::{resolve, BucketTable};
use crate::license::similarity::SequenceMatcher;
use crate::models::{ClassificationResult, LicenseBucket};

/// Minimum similarity for a header to count as the reference license.
pub const MATCH_THRESHOLD: f64 = 0.9;

/// The standard FFmpeg LGPL header, comment decoration included. Normalized
/// headers have their markers stripped, so even the canonical header scores
/// below 1.0 against it; the threshold is tuned for that.
pub const REFERENCE_HEADER: &str = "
 * This file is part of FFmpeg.
 *
 * FFmpeg is free software; you can redistribute it and/or
 * modify it under the terms of the GNU Lesser General Public
 * License as published by the Free Software Foundation; either
 * version 2.1 of the License, or (at your option) any later version.
 *
 * FFmpeg is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General Public
 * License along with FFmpeg; if not, write to the Free Software
 * Foundation, Inc., 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA
 */";

/// Sorts comment blocks into the reference bucket, a known bucket, or a
/// verbatim credit.
pub struct Classifier {
    reference: SequenceMatcher,
    table: BucketTable,
}

impl Classifier {
    pub fn new(table: BucketTable) -> Self {
        Self::with_reference(REFERENCE_HEADER, table)
    }

    pub fn with_reference(reference: &str, table: BucketTable) -> Self {
        Self {
            reference: SequenceMatcher::new(reference),
            table,
        }
    }

    /// Similarity of the normalized header to the reference, if the block has
    /// a recognisable preamble at all.
    pub fn reference_ratio(&self, block: &CommentBlock) -> Option<f64> {
        let normalized = normalize_comment_lines(block)?;
        Some(self.reference.ratio(&normalized.concat()))
    }

    pub fn classify(&self, rel_path: &str, block: &CommentBlock) -> Result<ClassificationResult> {
        match self.reference_ratio(block) {
            Some(ratio) if ratio >= MATCH_THRESHOLD => {
                tracing::debug!(path = rel_path, ratio, "matched reference license");
                Ok(ClassificationResult::Bucketed {
                    path: rel_path.to_string(),
                    bucket: LicenseBucket::reference(),
                })
            }
            ratio => {
                tracing::debug!(path = rel_path, ?ratio, "not the reference license");
                resolve(&self.table, rel_path, block)
            }
        }
    }
}
