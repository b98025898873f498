//! Shared fixtures: a small matching domain (inputs, candidates, filters)
//! used across the integration tests.

#![allow(dead_code)]

use sievetree::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Category tag carried by inputs and candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Token {
    One,
    Two,
    Three,
    Four,
}

/// The request side: what an input brings to each filter.
#[derive(Debug, Clone)]
pub struct SampleInput {
    pub string_value: String,
    pub int_value: i64,
    pub range_min: i64,
    pub range_max: i64,
    pub tokens: Vec<Token>,
}

impl SampleInput {
    pub fn sample_one() -> Self {
        Self {
            string_value: "myString".into(),
            int_value: 10,
            range_min: 5,
            range_max: 10,
            tokens: vec![Token::One, Token::Four],
        }
    }

    pub fn sample_two() -> Self {
        Self {
            string_value: "otherString".into(),
            int_value: 20,
            range_min: 100,
            range_max: 200,
            tokens: vec![Token::Three],
        }
    }

    /// Deterministic grid of varied inputs for equivalence sweeps.
    pub fn pool() -> Vec<Self> {
        let strings = ["one", "two", "three"];
        let ranges = [(1, 4), (3, 9), (5, 10), (8, 8)];
        let token_sets: [&[Token]; 4] = [
            &[Token::One],
            &[Token::Two, Token::Three],
            &[Token::One, Token::Four],
            &[Token::Four],
        ];

        let mut inputs = Vec::new();
        for (i, s) in strings.iter().enumerate() {
            for &(range_min, range_max) in &ranges {
                for tokens in &token_sets {
                    inputs.push(Self {
                        string_value: (*s).into(),
                        int_value: i as i64,
                        range_min,
                        range_max,
                        tokens: tokens.to_vec(),
                    });
                }
            }
        }
        inputs
    }
}

/// The candidate side: one possible output to match against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleCandidate {
    pub string_value: String,
    pub int_value: i64,
    pub range_value: i64,
    pub token: Token,
}

impl SampleCandidate {
    pub fn new(string_value: &str, int_value: i64, range_value: i64, token: Token) -> Self {
        Self {
            string_value: string_value.into(),
            int_value,
            range_value,
            token,
        }
    }
}

/// The two seed candidates: A falls outside `sample_one`'s range, B is
/// inside it and carries a token `sample_one` lists.
pub fn seed_candidates() -> HashSet<SampleCandidate> {
    HashSet::from([
        SampleCandidate::new("s", 10, 4, Token::One),
        SampleCandidate::new("s", 5, 5, Token::One),
    ])
}

/// A wider candidate set for the equivalence sweeps.
pub fn candidate_grid() -> HashSet<SampleCandidate> {
    let tokens = [Token::One, Token::Two, Token::Three, Token::Four];
    let mut candidates = HashSet::new();
    for range_value in 0..12 {
        for token in tokens {
            candidates.insert(SampleCandidate::new("grid", range_value, range_value, token));
        }
    }
    candidates
}

/// Keeps candidates whose range value falls inside the input's
/// `[range_min, range_max]`.
#[derive(Debug)]
pub struct RangeFilter;

impl Filter<SampleInput, SampleCandidate> for RangeFilter {
    fn apply(
        &self,
        input: &SampleInput,
        candidates: &mut HashSet<SampleCandidate>,
    ) -> Result<(), BoxError> {
        candidates
            .retain(|c| input.range_min <= c.range_value && c.range_value <= input.range_max);
        Ok(())
    }

    fn fingerprint(&self, input: &SampleInput) -> Fingerprint {
        Fingerprint::compound([input.range_min.into(), input.range_max.into()])
    }
}

impl IntoFilter<SampleInput, SampleCandidate> for RangeFilter {
    type Config = UnitConfig;

    fn from_config(
        _config: Self::Config,
    ) -> Result<Arc<dyn Filter<SampleInput, SampleCandidate>>, TreeError> {
        Ok(Arc::new(RangeFilter))
    }
}

/// Keeps candidates whose token appears in the input's token list.
#[derive(Debug)]
pub struct TokenFilter;

impl Filter<SampleInput, SampleCandidate> for TokenFilter {
    fn apply(
        &self,
        input: &SampleInput,
        candidates: &mut HashSet<SampleCandidate>,
    ) -> Result<(), BoxError> {
        candidates.retain(|c| input.tokens.contains(&c.token));
        Ok(())
    }

    fn fingerprint(&self, input: &SampleInput) -> Fingerprint {
        // One compound key for the whole token list; sorted and deduped so
        // equivalent lists share a key regardless of order.
        let mut tokens = input.tokens.clone();
        tokens.sort();
        tokens.dedup();
        Fingerprint::compound(tokens.into_iter().map(|t| Fingerprint::Int(t as i64)))
    }
}

impl IntoFilter<SampleInput, SampleCandidate> for TokenFilter {
    type Config = UnitConfig;

    fn from_config(
        _config: Self::Config,
    ) -> Result<Arc<dyn Filter<SampleInput, SampleCandidate>>, TreeError> {
        Ok(Arc::new(TokenFilter))
    }
}

/// Wraps a filter and counts its invocations; for asserting that cache hits
/// skip re-evaluation.
#[derive(Debug)]
pub struct CountingFilter<F> {
    inner: F,
    applies: AtomicUsize,
    fingerprints: AtomicUsize,
}

impl<F> CountingFilter<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            applies: AtomicUsize::new(0),
            fingerprints: AtomicUsize::new(0),
        }
    }

    pub fn applies(&self) -> usize {
        self.applies.load(Ordering::SeqCst)
    }

    pub fn fingerprints(&self) -> usize {
        self.fingerprints.load(Ordering::SeqCst)
    }
}

impl<I, O, F> Filter<I, O> for CountingFilter<F>
where
    F: Filter<I, O>,
{
    fn apply(&self, input: &I, candidates: &mut HashSet<O>) -> Result<(), BoxError> {
        self.applies.fetch_add(1, Ordering::SeqCst);
        self.inner.apply(input, candidates)
    }

    fn fingerprint(&self, input: &I) -> Fingerprint {
        self.fingerprints.fetch_add(1, Ordering::SeqCst);
        self.inner.fingerprint(input)
    }
}

/// Always fails to narrow.
#[derive(Debug)]
pub struct FailingFilter;

impl Filter<SampleInput, SampleCandidate> for FailingFilter {
    fn apply(
        &self,
        _input: &SampleInput,
        _candidates: &mut HashSet<SampleCandidate>,
    ) -> Result<(), BoxError> {
        Err("backing store unavailable".into())
    }

    fn fingerprint(&self, _input: &SampleInput) -> Fingerprint {
        Fingerprint::Bool(true)
    }
}

/// Straight-line reference: apply every filter in order to a copy of the
/// candidate set. The tree must always agree with this.
pub fn straight_line(
    filters: &[Arc<dyn Filter<SampleInput, SampleCandidate>>],
    candidates: &HashSet<SampleCandidate>,
    input: &SampleInput,
) -> HashSet<SampleCandidate> {
    let mut working = candidates.clone();
    for filter in filters {
        if working.is_empty() {
            break;
        }
        filter.apply(input, &mut working).unwrap();
    }
    working
}
