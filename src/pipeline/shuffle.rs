// Shuffle — regroup one stage's output by the next stage's key.
//
// A `Grouped` is only ever built from a complete input, which is the barrier
// between stages: no reduction sees a key until every producer for that key
// has finished. Keys are sorted; values keep encounter order within a key.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::records::{
    OccurrenceRecord, RankingSignature, State, StateCount, StateKeyed, StateSignature, WordCount,
    WordKeyed,
};

/// Values grouped by key, ready for per-key reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouped<K, V> {
    groups: BTreeMap<K, Vec<V>>,
}

impl<K: Ord, V> Grouped<K, V> {
    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&[V]>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Iterate groups in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Run `reduce` once per key, in parallel, returning results in key order.
    ///
    /// Each key's values are owned by exactly one reduction, so no locking.
    pub fn par_reduce<R, F>(&self, reduce: F) -> Vec<R>
    where
        K: Sync,
        V: Sync,
        R: Send,
        F: Fn(&K, &[V]) -> R + Sync + Send,
    {
        let groups: Vec<(&K, &Vec<V>)> = self.groups.iter().collect();
        groups
            .into_par_iter()
            .map(|(k, v)| reduce(k, v))
            .collect()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for Grouped<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut groups: BTreeMap<K, Vec<V>> = BTreeMap::new();
        for (k, v) in pairs {
            groups.entry(k).or_default().push(v);
        }
        Self { groups }
    }
}

impl<K, V> IntoIterator for Grouped<K, V> {
    type Item = (K, Vec<V>);
    type IntoIter = std::collections::btree_map::IntoIter<K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl FromIterator<WordKeyed> for Grouped<String, StateCount> {
    fn from_iter<I: IntoIterator<Item = WordKeyed>>(records: I) -> Self {
        records.into_iter().map(|r| (r.word, r.value)).collect()
    }
}

impl FromIterator<StateKeyed> for Grouped<State, WordCount> {
    fn from_iter<I: IntoIterator<Item = StateKeyed>>(records: I) -> Self {
        records.into_iter().map(|r| (r.state, r.value)).collect()
    }
}

/// Regroup counts by word (input to the dominant-state stage).
pub fn by_word(records: &[OccurrenceRecord]) -> Grouped<String, StateCount> {
    records.iter().cloned().map(WordKeyed::from).collect()
}

/// Regroup counts by state (input to the signature builder).
pub fn by_state(records: &[OccurrenceRecord]) -> Grouped<State, WordCount> {
    records.iter().cloned().map(StateKeyed::from).collect()
}

/// Regroup states by their signature (input to the signature grouper).
pub fn by_signature(signatures: &[StateSignature]) -> Grouped<RankingSignature, State> {
    signatures
        .iter()
        .map(|s| (s.signature.clone(), s.state.clone()))
        .collect()
}
