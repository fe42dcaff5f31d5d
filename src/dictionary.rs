//! Word validation and random word source.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::scoring::normalize_word;

/// Capability to validate words and draw random ones.
pub trait Dictionary: Send + Sync {
    /// `word` is accepted as a real word. Callers pass it uppercased.
    fn is_valid_word(&self, word: &str) -> bool;

    /// A random uppercase word from the list.
    fn random_word(&self, rng: &mut SmallRng) -> String;
}

const COMMON_WORDS: [&str; 71] = [
    "APPLE", "BEACH", "BRAIN", "BREAD", "BRUSH", "CHAIR", "CHEST", "CHORD", "CLICK", "CLOCK",
    "CLOUD", "DANCE", "DIARY", "DRINK", "DRIVE", "EARTH", "FEAST", "FIELD", "FRUIT", "GLASS",
    "GRAPE", "GREEN", "GHOST", "GUIDE", "HEART", "HORSE", "HOUSE", "JUICE", "LIGHT", "LEMON",
    "MELON", "MONEY", "MUSIC", "NIGHT", "PARTY", "PHONE", "PIANO", "PILOT", "PIZZA", "PLANE",
    "PLATE", "PRICE", "RADIO", "RIVER", "ROBOT", "SHIRT", "SHOE", "SMILE", "SNAKE", "SPACE",
    "SPOON", "STAR", "STONE", "SUGAR", "TABLE", "TOAST", "TIGER", "TRAIN", "TRUCK", "WATCH",
    "WATER", "WORLD", "WRITE", "YACHT", "ZEBRA", "WORDY", "GAME", "CODE", "REACT", "VITE",
    "PEER",
];

/// In-memory word list.
///
/// In lenient mode any well-formed word is accepted, the list only feeds
/// [`Dictionary::random_word`]. Strict mode requires membership.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
    lenient: bool,
}

impl WordList {
    /// The built-in list, lenient.
    pub fn builtin() -> Self {
        Self {
            words: COMMON_WORDS.iter().map(|w| w.to_string()).collect(),
            lenient: true,
        }
    }

    /// Build from arbitrary words. Entries that are not valid words are dropped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .filter_map(|w| normalize_word(w.as_ref()).ok())
            .collect();
        words.sort();
        words.dedup();
        Self {
            words,
            lenient: false,
        }
    }

    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w.eq_ignore_ascii_case(word))
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Dictionary for WordList {
    fn is_valid_word(&self, word: &str) -> bool {
        if self.lenient {
            normalize_word(word).is_ok()
        } else {
            self.contains(word)
        }
    }

    fn random_word(&self, rng: &mut SmallRng) -> String {
        if self.words.is_empty() {
            return String::from(COMMON_WORDS[rng.random_range(0..COMMON_WORDS.len())]);
        }
        self.words[rng.random_range(0..self.words.len())].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn builtin_is_lenient() {
        let list = WordList::builtin();
        assert!(list.is_valid_word("APPLE"));
        assert!(list.is_valid_word("XYZZY"));
        assert!(!list.is_valid_word("XY"));
    }

    #[test]
    fn strict_requires_membership() {
        let list = WordList::builtin().lenient(false);
        assert!(list.is_valid_word("APPLE"));
        assert!(list.is_valid_word("apple"));
        assert!(!list.is_valid_word("XYZZY"));
    }

    #[test]
    fn from_words_drops_malformed_entries() {
        let list = WordList::from_words(["cat", "a", "dog", "c4t", "CAT"]);
        assert_eq!(list.len(), 2);
        assert!(list.contains("DOG"));
    }

    #[test]
    fn random_words_come_from_the_list() {
        let list = WordList::from_words(["otter", "beaver"]);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            let word = list.random_word(&mut rng);
            assert!(list.contains(&word));
        }
    }
}
