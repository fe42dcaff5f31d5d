use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};
use wordberry::{
    can_form_word, generate_tiles, normalize_word, score, Rejection, CONSONANTS, MAX_WORD_LEN,
    MIN_WORD_LEN, VOWELS,
};

fn word() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Z]{3,12}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn word_scores_its_own_length(w in word()) {
        prop_assert_eq!(score(&w, &w), w.len());
    }

    #[test]
    fn score_is_symmetric(a in word(), b in word()) {
        prop_assert_eq!(score(&a, &b), score(&b, &a));
    }

    #[test]
    fn score_never_exceeds_shorter_word(a in word(), b in word()) {
        prop_assert!(score(&a, &b) <= a.len().min(b.len()));
    }

    #[test]
    fn score_ignores_letter_order(a in word(), b in word()) {
        let mut reversed: Vec<char> = b.chars().collect();
        reversed.reverse();
        let reversed: String = reversed.into_iter().collect();
        prop_assert_eq!(score(&a, &b), score(&a, &reversed));
    }

    #[test]
    fn rack_spells_its_own_letters(w in word()) {
        let rack: Vec<char> = w.chars().collect();
        prop_assert!(can_form_word(&w, &rack));
    }

    #[test]
    fn missing_letter_cannot_be_formed(w in word()) {
        let mut rack: Vec<char> = w.chars().collect();
        rack.pop();
        prop_assert!(!can_form_word(&w, &rack));
    }

    #[test]
    fn racks_have_requested_mix(seed in any::<u64>(), vowels in 0usize..10, consonants in 0usize..10) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let tiles = generate_tiles(&mut rng, vowels, consonants);
        prop_assert_eq!(tiles.len(), vowels + consonants);
        prop_assert_eq!(tiles.iter().filter(|c| VOWELS.contains(*c)).count(), vowels);
        prop_assert!(tiles.iter().all(|c| VOWELS.contains(c) || CONSONANTS.contains(c)));
    }

    #[test]
    fn normalized_words_respect_bounds(raw in "[a-zA-Z]{0,16}") {
        match normalize_word(&raw) {
            Ok(w) => {
                prop_assert!((MIN_WORD_LEN..=MAX_WORD_LEN).contains(&w.len()));
                prop_assert_eq!(w, raw.to_ascii_uppercase());
            }
            Err(Rejection::TooShort) => prop_assert!(raw.len() < MIN_WORD_LEN),
            Err(Rejection::TooLong) => prop_assert!(raw.len() > MAX_WORD_LEN),
            Err(other) => prop_assert!(false, "unexpected rejection {:?}", other),
        }
    }
}

#[test]
fn shared_letters_are_counted_once_per_pair() {
    assert_eq!(score("APPLE", "PEACH"), 3);
    assert_eq!(score("LEVEL", "EEL"), 3);
    assert_eq!(score("ABC", "XYZ"), 0);
}
