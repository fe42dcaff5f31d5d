//! Guess scoring and word validation against a tile rack.

use alloc::string::String;

use crate::common::Rejection;
use crate::config::{MAX_WORD_LEN, MIN_WORD_LEN};

fn letter_counts(word: &str) -> [usize; 26] {
    let mut counts = [0usize; 26];
    for b in word.bytes() {
        let b = b.to_ascii_uppercase();
        if b.is_ascii_uppercase() {
            counts[(b - b'A') as usize] += 1;
        }
    }
    counts
}

/// Number of letters `guess` shares with `secret`, counted as a multiset
/// intersection. Positions do not matter.
pub fn score(secret: &str, guess: &str) -> usize {
    let secret = letter_counts(secret);
    let guess = letter_counts(guess);
    secret.iter().zip(guess.iter()).map(|(s, g)| (*s).min(*g)).sum()
}

/// True when every letter of `word` can be matched to a distinct tile.
pub fn can_form_word(word: &str, rack: &[char]) -> bool {
    let mut available = [0usize; 26];
    for tile in rack {
        let tile = tile.to_ascii_uppercase();
        if tile.is_ascii_uppercase() {
            available[(tile as u8 - b'A') as usize] += 1;
        }
    }
    for c in word.chars() {
        let c = c.to_ascii_uppercase();
        if !c.is_ascii_uppercase() {
            return false;
        }
        let slot = &mut available[(c as u8 - b'A') as usize];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
    }
    true
}

/// Uppercase `word` and check it is A-Z only with an allowed length.
pub fn normalize_word(word: &str) -> Result<String, Rejection> {
    let word = word.trim().to_ascii_uppercase();
    if !word.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(Rejection::InvalidCharacters);
    }
    if word.len() < MIN_WORD_LEN {
        return Err(Rejection::TooShort);
    }
    if word.len() > MAX_WORD_LEN {
        return Err(Rejection::TooLong);
    }
    Ok(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apple_peach_shares_three() {
        assert_eq!(score("APPLE", "PEACH"), 3);
    }

    #[test]
    fn repeated_letters_are_bounded_by_secret() {
        assert_eq!(score("APPLE", "PPPPP"), 2);
        assert_eq!(score("PAPER", "APPLE"), 4);
    }

    #[test]
    fn disjoint_words_score_zero() {
        assert_eq!(score("MOON", "BRICK"), 0);
    }

    #[test]
    fn scoring_ignores_case() {
        assert_eq!(score("apple", "APPLE"), 5);
    }

    #[test]
    fn form_from_rack() {
        assert!(can_form_word("CAT", &['C', 'A', 'T', 'Z']));
        assert!(!can_form_word("CAT", &['C', 'A', 'A']));
        assert!(can_form_word("cat", &['T', 'A', 'C']));
        assert!(!can_form_word("TOOT", &['T', 'O', 'T']));
    }

    #[test]
    fn non_letters_cannot_be_formed() {
        assert!(!can_form_word("C-T", &['C', '-', 'T']));
    }

    #[test]
    fn normalize_rules() {
        assert_eq!(normalize_word(" apple "), Ok(String::from("APPLE")));
        assert_eq!(normalize_word("ab"), Err(Rejection::TooShort));
        assert_eq!(normalize_word("abcdefghijklm"), Err(Rejection::TooLong));
        assert_eq!(normalize_word("ap ple"), Err(Rejection::InvalidCharacters));
        assert_eq!(normalize_word("héllo"), Err(Rejection::InvalidCharacters));
    }
}
