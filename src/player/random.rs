use alloc::string::String;
use rand::rngs::SmallRng;

use super::GuessStrategy;
use crate::dictionary::Dictionary;
use crate::game::VisibleHistory;

/// Guesses an unconditional random word each turn, ignoring clues and history.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomWordStrategy;

impl GuessStrategy for RandomWordStrategy {
    fn choose_guess(
        &mut self,
        rng: &mut SmallRng,
        dictionary: &dyn Dictionary,
        _history: &VisibleHistory<'_>,
    ) -> String {
        dictionary.random_word(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Side;
    use crate::dictionary::WordList;
    use crate::scoring::normalize_word;
    use rand::SeedableRng;

    #[test]
    fn guesses_are_legal_words() {
        let list = WordList::builtin().lenient(false);
        let mut strategy = RandomWordStrategy;
        let mut rng = SmallRng::seed_from_u64(99);
        let history = VisibleHistory {
            player: Side::Opponent,
            guesses: &[],
            clues: &[],
            target_len: Some(5),
        };
        for _ in 0..50 {
            let word = strategy.choose_guess(&mut rng, &list, &history);
            assert!(normalize_word(&word).is_ok());
            assert!(list.is_valid_word(&word));
        }
    }
}
