// SignatureBuilder — stage 3: one ranking signature per state.
//
// Words are ordered by descending count. Equal counts fall back to the
// vocabulary's configured order, then (for words outside the vocabulary,
// which only a hand-edited counts file can contain) to plain string order.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::records::{RankingSignature, State, StateSignature, WordCount};
use crate::vocabulary::Vocabulary;

use super::shuffle::Grouped;

/// What to do with vocabulary words a state never mentions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroCountPolicy {
    /// Leave them out: "sports>politics".
    #[default]
    Omit,
    /// Append them with count 0, so every signature lists every word once.
    Include,
}

impl FromStr for ZeroCountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "omit" => Ok(Self::Omit),
            "include" => Ok(Self::Include),
            other => Err(format!(
                "unknown zero-count policy '{other}' (expected 'omit' or 'include')"
            )),
        }
    }
}

impl fmt::Display for ZeroCountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Omit => "omit",
            Self::Include => "include",
        })
    }
}

#[derive(Debug, Clone)]
pub struct SignatureBuilder {
    vocabulary: Vocabulary,
    zero_counts: ZeroCountPolicy,
}

impl SignatureBuilder {
    pub fn new(vocabulary: Vocabulary, zero_counts: ZeroCountPolicy) -> Self {
        Self {
            vocabulary,
            zero_counts,
        }
    }

    pub fn zero_counts(&self) -> ZeroCountPolicy {
        self.zero_counts
    }

    /// Order one state's word counts, highest first.
    ///
    /// Expects at most one entry per word. The Counter and `parse_counts`
    /// both guarantee that.
    pub fn rank(&self, counts: &[WordCount]) -> Vec<WordCount> {
        let mut ranked = counts.to_vec();
        if self.zero_counts == ZeroCountPolicy::Include {
            let seen: HashSet<&str> = counts.iter().map(|wc| wc.word.as_str()).collect();
            let unseen = self
                .vocabulary
                .words()
                .iter()
                .filter(|word| !seen.contains(word.as_str()))
                .map(|word| WordCount {
                    word: word.clone(),
                    count: 0,
                });
            ranked.extend(unseen);
        }

        ranked.sort_by(|a, b| {
            let pos_a = self.vocabulary.position(&a.word).unwrap_or(usize::MAX);
            let pos_b = self.vocabulary.position(&b.word).unwrap_or(usize::MAX);
            (Reverse(a.count), pos_a, &a.word).cmp(&(Reverse(b.count), pos_b, &b.word))
        });
        ranked
    }

    /// The canonical signature string for one state's counts.
    pub fn signature(&self, counts: &[WordCount]) -> RankingSignature {
        RankingSignature::from_words(self.rank(counts).iter().map(|wc| wc.word.as_str()))
    }

    /// One signature per state in the input, ordered by state.
    pub fn build(&self, grouped: &Grouped<State, WordCount>) -> Vec<StateSignature> {
        grouped.par_reduce(|state, counts| StateSignature {
            state: state.clone(),
            signature: self.signature(counts),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wc(word: &str, count: u64) -> WordCount {
        WordCount {
            word: word.to_string(),
            count,
        }
    }

    fn builder(policy: ZeroCountPolicy) -> SignatureBuilder {
        SignatureBuilder::new(Vocabulary::default(), policy)
    }

    #[test]
    fn descending_by_count() {
        let sig = builder(ZeroCountPolicy::Omit).signature(&[wc("politics", 1), wc("sports", 2)]);
        assert_eq!(sig.as_str(), "sports>politics");
    }

    #[test]
    fn ties_follow_vocabulary_order() {
        // vocabulary order: education, politics, sports, agriculture
        let b = builder(ZeroCountPolicy::Omit);
        let forward = b.signature(&[wc("agriculture", 3), wc("education", 3), wc("sports", 5)]);
        let backward = b.signature(&[wc("sports", 5), wc("education", 3), wc("agriculture", 3)]);
        assert_eq!(forward.as_str(), "sports>education>agriculture");
        assert_eq!(forward, backward);
    }

    #[test]
    fn include_appends_unseen_words_in_vocabulary_order() {
        let sig =
            builder(ZeroCountPolicy::Include).signature(&[wc("politics", 1), wc("sports", 2)]);
        assert_eq!(sig.as_str(), "sports>politics>education>agriculture");
        assert_eq!(sig.words().count(), 4);
    }

    #[test]
    fn include_keeps_observed_counts() {
        let ranked = builder(ZeroCountPolicy::Include).rank(&[wc("agriculture", 2)]);
        assert_eq!(
            ranked,
            vec![
                wc("agriculture", 2),
                wc("education", 0),
                wc("politics", 0),
                wc("sports", 0),
            ]
        );
    }

    #[test]
    fn unknown_words_sort_after_vocabulary_words() {
        let sig = builder(ZeroCountPolicy::Omit).signature(&[
            wc("zebra", 1),
            wc("apple", 1),
            wc("sports", 1),
        ]);
        assert_eq!(sig.as_str(), "sports>apple>zebra");
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Include".parse::<ZeroCountPolicy>(), Ok(ZeroCountPolicy::Include));
        assert_eq!("omit".parse::<ZeroCountPolicy>(), Ok(ZeroCountPolicy::Omit));
        assert!("zero".parse::<ZeroCountPolicy>().is_err());
        assert_eq!(ZeroCountPolicy::default(), ZeroCountPolicy::Omit);
    }
}
