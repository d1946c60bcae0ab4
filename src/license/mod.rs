//! License header extraction and classification.
//!
//! - [`extractor`] — pulls the first comment block out of a source file and
//!   strips its comment markers.
//! - [`normalizer`] — drops copyright lines above the standard preamble.
//! - [`similarity`] — longest-matching-block string similarity.
//! - [`classifier`] — decides between the reference license and the bucket table.
//! - [`resolver`] — bucket table lookup, digest drift check, verbatim fallback.

pub mod classifier;
pub mod extractor;
pub mod normalizer;
pub mod resolver;
pub mod similarity;

/// A source file carrying exactly the standard header.
#[cfg(test)]
pub(crate) const CANONICAL_HEADER_FILE: &str = "/*
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
 */
";
