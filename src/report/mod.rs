//! Console reports for a credits run.
//!
//! - [`terminal`] — colored summary box and tables; respects `--verbose` / `--quiet`.
//! - [`Summary`] — the same data as JSON for scripting.

use serde::Serialize;

use crate::credits::Stats;
use crate::models::ClassificationResult;

pub mod terminal;

/// Machine-readable run summary (`--report json`).
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub root: String,
    pub stats: Stats,
    pub files: &'a [ClassificationResult],
}
