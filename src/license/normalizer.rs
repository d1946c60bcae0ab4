use std::sync::LazyLock;

use regex::Regex;

static HEADER_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" *This file is part of FFmpeg").unwrap());

/// Copyright and description lines tolerated above the license preamble.
pub const MAX_HEADER_OFFSET: usize = 20;

/// Drop everything above the standard preamble line.
///
/// Returns `None` when the preamble is missing, or sits more than
/// [`MAX_HEADER_OFFSET`] lines into the block: either the header is a different
/// license or it has been altered enough to warrant a closer look.
pub fn normalize_comment_lines(lines: &[String]) -> Option<&[String]> {
    let index = lines.iter().position(|line| HEADER_START.is_match(line))?;
    if index > MAX_HEADER_OFFSET {
        tracing::trace!(index, "license preamble too far from top of comment");
        return None;
    }
    Some(&lines[index..])
}
