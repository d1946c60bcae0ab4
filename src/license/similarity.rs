//! Longest-matching-block similarity between two strings.
//!
//! The matcher repeatedly takes the longest common contiguous run inside the
//! still-unmatched ranges of both sequences and recurses on either side of
//! it. The ratio is `2*M / T`, where `M` is the number of matched characters
//! and `T` the combined length.

use std::collections::HashMap;

/// Sequences at least this long get the "popular character" heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

/// One matching run: `a[a_start..a_start+size] == b[b_start..b_start+size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Compares a fixed `b` sequence against any number of `a` sequences.
///
/// Characters of `b` occurring more than `len(b)/100 + 1` times in a `b` of
/// 200 or more characters are "popular": they never seed a match, though a
/// match may still grow across them.
pub struct SequenceMatcher {
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    pub fn new(b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, indices| indices.len() <= ntest);
        }

        Self { b, b2j }
    }

    /// Similarity of `a` against this matcher's sequence, in `0.0..=1.0`.
    pub fn ratio(&self, a: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let total = a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = self.matching_blocks(&a).iter().map(|m| m.size).sum();
        2.0 * matched as f64 / total as f64
    }

    /// All non-overlapping matching runs, ordered by position.
    pub fn matching_blocks(&self, a: &[char]) -> Vec<Match> {
        let mut queue = vec![(0, a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(a, alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            if alo < m.a_start && blo < m.b_start {
                queue.push((alo, m.a_start, blo, m.b_start));
            }
            if m.a_start + m.size < ahi && m.b_start + m.size < bhi {
                queue.push((m.a_start + m.size, ahi, m.b_start + m.size, bhi));
            }
            blocks.push(m);
        }

        blocks.sort();
        blocks
    }

    /// Longest run of `a[alo..ahi]` and `b[blo..bhi]`; ties go to the run that
    /// starts earliest in `a`, then earliest in `b`.
    fn find_longest_match(&self, a: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let b = &self.b;
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] = length of the run ending at a[i-1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(indices) = self.b2j.get(c) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Grow across characters that were excluded from b2j.
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        Match {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }
}

/// Convenience wrapper for a one-off comparison.
#[cfg(test)]
pub fn ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(b).ratio(a)
}
