//! Scripted opponent.
//!
//! [`CpuOpponent`] drives the opponent seat of a solo session. How it picks
//! words is delegated to a [`GuessStrategy`]; the shipped strategy is
//! [`RandomWordStrategy`].

use alloc::boxed::Box;
use alloc::string::String;
use rand::rngs::SmallRng;

use crate::common::{Side, Status};
use crate::dictionary::Dictionary;
use crate::game::{Session, VisibleHistory};

/// Interface for choosing the scripted opponent's words.
///
/// Implementations only see what a human in the same seat could see.
pub trait GuessStrategy: Send + Sync {
    /// Pick the next guess.
    fn choose_guess(
        &mut self,
        rng: &mut SmallRng,
        dictionary: &dyn Dictionary,
        history: &VisibleHistory<'_>,
    ) -> String;

    /// Pick the secret word for setup.
    fn choose_secret(&mut self, rng: &mut SmallRng, dictionary: &dyn Dictionary) -> String {
        dictionary.random_word(rng)
    }
}

pub mod random;
pub use random::RandomWordStrategy;

pub struct CpuOpponent {
    strategy: Box<dyn GuessStrategy>,
}

impl CpuOpponent {
    pub fn new(strategy: Box<dyn GuessStrategy>) -> Self {
        Self { strategy }
    }

    /// The minimal opponent: random words, no use of feedback.
    pub fn random() -> Self {
        Self::new(Box::new(RandomWordStrategy))
    }

    /// The opponent seat belongs to this CPU and is due to move.
    pub fn should_act(session: &Session) -> bool {
        session.is_vs_cpu()
            && session.status() == Status::Playing
            && session.turn() == Side::Opponent
            && !session.awaiting_peer()
    }

    pub fn choose_secret(&mut self, rng: &mut SmallRng, dictionary: &dyn Dictionary) -> String {
        self.strategy.choose_secret(rng, dictionary)
    }

    pub fn choose_guess(
        &mut self,
        rng: &mut SmallRng,
        dictionary: &dyn Dictionary,
        session: &Session,
    ) -> String {
        let history = session.history_for(Side::Opponent);
        self.strategy.choose_guess(rng, dictionary, &history)
    }
}

impl Default for CpuOpponent {
    fn default() -> Self {
        Self::random()
    }
}
