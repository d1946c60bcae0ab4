use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Only the top of a file is scanned for its header.
pub const MAX_SCAN_LINES: usize = 100;

static C_BLOCK_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/\*+").unwrap());
static C_BLOCK_MID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ *\* *").unwrap());
static C_BLOCK_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*/").unwrap());
static ASM_COMMENT_PRE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(;\**|@)").unwrap());
static ASM_NOT_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^;@]").unwrap());

/// De-commented header lines of one file, `\n` terminators kept.
pub type CommentBlock = Vec<String>;

/// How a file writes its header comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/* ... */`, with optional ` * ` on continuation lines.
    Block,
    /// Consecutive lines starting with `;` or `@`, as in assembly sources.
    Line,
}

impl CommentStyle {
    /// `.asm` files always use line comments. `.S` files usually carry C block
    /// comments, but some start with an `@`/`;` line comment instead.
    pub fn detect(path: &Path, content: &str) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("asm") => CommentStyle::Line,
            Some("S") => {
                let first = source_lines(content).next().unwrap_or_default();
                if ASM_COMMENT_PRE.is_match(&first) {
                    CommentStyle::Line
                } else {
                    CommentStyle::Block
                }
            }
            _ => CommentStyle::Block,
        }
    }

    fn start(&self) -> &'static Regex {
        match self {
            CommentStyle::Block => &C_BLOCK_START,
            CommentStyle::Line => &ASM_COMMENT_PRE,
        }
    }

    fn end(&self) -> &'static Regex {
        match self {
            CommentStyle::Block => &C_BLOCK_END,
            CommentStyle::Line => &ASM_NOT_COMMENT,
        }
    }
}

/// Split `content` into lines that keep their terminator, reading `\r\n` as `\n`.
pub fn source_lines(content: &str) -> impl Iterator<Item = String> + '_ {
    content.split_inclusive('\n').map(|line| match line.strip_suffix("\r\n") {
        Some(body) => format!("{}\n", body),
        None => line.to_string(),
    })
}

/// Return the first comment block found in the first [`MAX_SCAN_LINES`] lines,
/// with comment delimiters stripped.
///
/// `None` when no block starts in the window, or one starts but does not end
/// within it. For line-style comments the first non-comment line closes the
/// block and is kept as its last line.
pub fn extract_first_comment_block(content: &str, style: CommentStyle) -> Option<CommentBlock> {
    let mut lines = Vec::new();
    let mut found_start = false;
    let mut found_end = false;

    for line in source_lines(content).take(MAX_SCAN_LINES) {
        found_start = found_start || style.start().is_match(&line);
        if !found_start {
            continue;
        }

        let is_end = style.end().is_match(&line);
        lines.push(line);
        if is_end {
            found_end = true;
            break;
        }
    }

    if !(found_start && found_end) {
        return None;
    }

    strip_comment_chars(&mut lines, style);
    Some(lines)
}

fn strip_comment_chars(lines: &mut [String], style: CommentStyle) {
    match style {
        CommentStyle::Line => {
            for line in lines.iter_mut() {
                *line = ASM_COMMENT_PRE.replace_all(line, "").into_owned();
            }
        }
        CommentStyle::Block => {
            if let Some(first) = lines.first_mut() {
                *first = C_BLOCK_START.replace_all(first, "").into_owned();
            }
            if let Some(last) = lines.last_mut() {
                *last = C_BLOCK_END.replace_all(last, "").into_owned();
            }
            for line in lines.iter_mut().skip(1) {
                *line = C_BLOCK_MID.replace_all(line, "").into_owned();
            }
        }
    }
}
