// Vocabulary — the fixed set of topic words the pipeline looks for.
//
// The vocabulary is built once (from config or a CLI flag) and handed to the
// Counter and SignatureBuilder. Word order matters: it is the tie-break order
// for ranking signatures.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::VocabularyError;

/// The words searched for when no vocabulary is configured.
pub const DEFAULT_WORDS: [&str; 4] = ["education", "politics", "sports", "agriculture"];

/// Characters that would corrupt intermediate records if they appeared in a word.
const RESERVED: [char; 4] = [':', '>', ',', '\t'];

/// An immutable, validated, ordered list of vocabulary words.
///
/// Cheap to clone; the word list is shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    words: Arc<[String]>,
    positions: Arc<HashMap<String, usize>>,
}

impl Vocabulary {
    /// Build a vocabulary, rejecting empty lists, duplicates, and words that
    /// contain whitespace or record delimiters.
    pub fn new<I, S>(words: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            return Err(VocabularyError::Empty);
        }

        let mut positions = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if word.is_empty() {
                return Err(VocabularyError::EmptyWord);
            }
            if let Some(ch) = word
                .chars()
                .find(|c| c.is_whitespace() || RESERVED.contains(c))
            {
                return Err(VocabularyError::ReservedCharacter {
                    word: word.clone(),
                    ch,
                });
            }
            if positions.insert(word.clone(), i).is_some() {
                return Err(VocabularyError::Duplicate(word.clone()));
            }
        }

        Ok(Self {
            words: words.into(),
            positions: Arc::new(positions),
        })
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.positions.contains_key(word)
    }

    /// Position of a word in the configured order, if it is a vocabulary word.
    pub fn position(&self, word: &str) -> Option<usize> {
        self.positions.get(word).copied()
    }

    /// Look up the stored copy of a word, so callers can share it.
    pub fn get(&self, word: &str) -> Option<&str> {
        self.position(word).map(|i| self.words[i].as_str())
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        // DEFAULT_WORDS is non-empty, distinct, and free of reserved characters.
        match Self::new(DEFAULT_WORDS) {
            Ok(v) => v,
            Err(e) => unreachable!("default vocabulary is invalid: {e}"),
        }
    }
}

impl FromStr for Vocabulary {
    type Err = VocabularyError;

    /// Parse a comma-separated list, trimming whitespace around each word.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split(',').map(str::trim).filter(|w| !w.is_empty()))
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.words.join(","))
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = VocabularyError;

    fn try_from(words: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(words)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.words.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_four_words_in_order() {
        let v = Vocabulary::default();
        assert_eq!(v.words(), &["education", "politics", "sports", "agriculture"]);
        assert_eq!(v.position("sports"), Some(2));
    }

    #[test]
    fn membership_is_case_sensitive() {
        let v = Vocabulary::default();
        assert!(v.contains("sports"));
        assert!(!v.contains("Sports"));
        assert!(!v.contains("sports."));
    }

    #[test]
    fn parses_comma_list() {
        let v: Vocabulary = " alpha, beta ,gamma".parse().unwrap();
        assert_eq!(v.words(), &["alpha", "beta", "gamma"]);
        assert_eq!(v.to_string(), "alpha,beta,gamma");
    }

    #[test]
    fn rejects_bad_vocabularies() {
        assert_eq!(Vocabulary::new(Vec::<String>::new()), Err(VocabularyError::Empty));
        assert_eq!("".parse::<Vocabulary>(), Err(VocabularyError::Empty));
        assert_eq!(
            Vocabulary::new(["a", "b", "a"]),
            Err(VocabularyError::Duplicate("a".to_string()))
        );
        assert!(matches!(
            Vocabulary::new(["a>b"]),
            Err(VocabularyError::ReservedCharacter { ch: '>', .. })
        ));
        assert!(matches!(
            Vocabulary::new(["two words"]),
            Err(VocabularyError::ReservedCharacter { ch: ' ', .. })
        ));
        assert_eq!(Vocabulary::new([""]), Err(VocabularyError::EmptyWord));
    }

    #[test]
    fn serde_uses_plain_word_list() {
        let v = Vocabulary::new(["x", "y"]).unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"["x","y"]"#);
        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
        assert!(serde_json::from_str::<Vocabulary>(r#"["x","x"]"#).is_err());
    }
}
