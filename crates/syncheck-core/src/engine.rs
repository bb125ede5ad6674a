//! Neighbor-set relation engine.
//!
//! Synonym pairs are folded one at a time into a [`NeighborMapping`]. The fold
//! only rewrites the entries of the two words in the pair: other words that
//! shared a group with either side keep the set they had before. Queries are
//! then answered by a direct check on the two neighbor sets and, failing that,
//! a one-hop check on the neighbors of those neighbors. Both checks need more
//! than one shared word.
//!
//! This is not a transitive closure: long chains of merges can leave two
//! connected words reported as `different`.

use crate::error::{Result, SyncheckError};
use crate::input::Block;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Two lowercase words read from one synonym or query line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WordPair {
    pub first: String,
    pub second: String,
}

impl WordPair {
    /// Build a pair from raw tokens, lowercasing both.
    pub fn new(first: &str, second: &str) -> Self {
        Self {
            first: first.to_lowercase(),
            second: second.to_lowercase(),
        }
    }

    /// Split a line on whitespace and keep the first two tokens.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some(first), Some(second)) => Ok(Self::new(first, second)),
            _ => Err(SyncheckError::MalformedPair {
                line: line_no,
                content: line.to_string(),
            }),
        }
    }

    pub fn is_reflexive(&self) -> bool {
        self.first == self.second
    }
}

/// Outcome of one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Synonyms,
    Different,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Synonyms => "synonyms",
            Verdict::Different => "different",
        }
    }

    fn from_related(related: bool) -> Self {
        if related {
            Verdict::Synonyms
        } else {
            Verdict::Different
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query, where it came from, and its verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryVerdict {
    pub line: usize,
    pub pair: WordPair,
    pub verdict: Verdict,
}

/// Word → neighbor set, built by folding synonym pairs in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborMapping {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl NeighborMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every line of a synonym block, in order.
    pub fn build(block: Block<'_>) -> Result<Self> {
        let mut mapping = Self::new();
        for (line_no, line) in block.numbered() {
            let pair = WordPair::parse(line, line_no)?;
            mapping.fold(&pair);
        }
        tracing::debug!(
            pairs = block.len(),
            words = mapping.len(),
            "built neighbor mapping"
        );
        Ok(mapping)
    }

    /// Fold one pair in. Only the entries of `pair.first` and `pair.second`
    /// are written.
    pub fn fold(&mut self, pair: &WordPair) {
        let (a, b) = (&pair.first, &pair.second);
        match (self.entries.contains_key(a), self.entries.contains_key(b)) {
            (true, true) => {
                let combined: BTreeSet<String> =
                    self.entries[a].union(&self.entries[b]).cloned().collect();
                self.entries.insert(a.clone(), with_member(&combined, b));
                self.entries.insert(b.clone(), with_member(&combined, a));
            }
            (true, false) => self.absorb(a, b),
            (false, true) => self.absorb(b, a),
            (false, false) => {
                let fresh: BTreeSet<String> = [a.clone(), b.clone()].into_iter().collect();
                self.entries.insert(a.clone(), fresh.clone());
                self.entries.insert(b.clone(), fresh);
            }
        }
        tracing::trace!(first = %a, second = %b, "folded pair");
    }

    /// `known` gains `newcomer`; `newcomer` gets a copy of the grown set.
    fn absorb(&mut self, known: &str, newcomer: &str) {
        let Some(set) = self.entries.get_mut(known) else {
            return;
        };
        set.insert(newcomer.to_string());
        let copied = with_member(set, known);
        self.entries.insert(newcomer.to_string(), copied);
    }

    pub fn neighbors(&self, word: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(word)
    }

    /// Number of words with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union of the neighbor sets of every member of `set`.
    fn expand(&self, set: &BTreeSet<String>) -> Result<BTreeSet<String>> {
        let mut expanded = BTreeSet::new();
        for member in set {
            let neighbors = self.entries.get(member).ok_or_else(|| {
                SyncheckError::MissingNeighborEntry {
                    word: member.clone(),
                }
            })?;
            expanded.extend(neighbors.iter().cloned());
        }
        Ok(expanded)
    }
}

impl FromIterator<(String, BTreeSet<String>)> for NeighborMapping {
    /// Assemble a mapping directly, bypassing [`NeighborMapping::fold`].
    fn from_iter<I: IntoIterator<Item = (String, BTreeSet<String>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn with_member(set: &BTreeSet<String>, word: &str) -> BTreeSet<String> {
    let mut grown = set.clone();
    grown.insert(word.to_string());
    grown
}

fn shares_more_than_one(a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
    a.intersection(b).nth(1).is_some()
}

/// Decide whether the two words of `pair` are synonyms under `mapping`.
pub fn evaluate(pair: &WordPair, mapping: &NeighborMapping) -> Result<Verdict> {
    if pair.is_reflexive() {
        return Ok(Verdict::Synonyms);
    }

    let (Some(first), Some(second)) = (
        mapping.neighbors(&pair.first),
        mapping.neighbors(&pair.second),
    ) else {
        return Ok(Verdict::Different);
    };

    if shares_more_than_one(first, second) {
        return Ok(Verdict::Synonyms);
    }

    let first_hop = mapping.expand(first)?;
    let second_hop = mapping.expand(second)?;
    Ok(Verdict::from_related(shares_more_than_one(
        &first_hop,
        &second_hop,
    )))
}

/// [`evaluate`] on raw tokens.
pub fn evaluate_words(first: &str, second: &str, mapping: &NeighborMapping) -> Result<Verdict> {
    evaluate(&WordPair::new(first, second), mapping)
}

/// Parse and evaluate every line of a query block, preserving input order.
///
/// Blocks with at least `parallel_threshold` queries are evaluated on the
/// rayon pool; a threshold of 0 keeps evaluation sequential.
pub fn evaluate_all(
    block: Block<'_>,
    mapping: &NeighborMapping,
    parallel_threshold: usize,
) -> Result<Vec<QueryVerdict>> {
    let queries = block
        .numbered()
        .map(|(line, text)| WordPair::parse(text, line).map(|pair| (line, pair)))
        .collect::<Result<Vec<_>>>()?;

    let judge = |(line, pair): &(usize, WordPair)| {
        evaluate(pair, mapping).map(|verdict| QueryVerdict {
            line: *line,
            pair: pair.clone(),
            verdict,
        })
    };

    if parallel_threshold > 0 && queries.len() >= parallel_threshold {
        tracing::debug!(queries = queries.len(), "evaluating queries in parallel");
        queries.par_iter().map(judge).collect()
    } else {
        queries.iter().map(judge).collect()
    }
}
