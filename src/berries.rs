//! Berry balances for both sides.

use crate::clue::ClueCard;
use crate::common::Side;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BerryLedger {
    mine: u32,
    theirs: u32,
}

impl BerryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, side: Side) -> u32 {
        match side {
            Side::Me => self.mine,
            Side::Opponent => self.theirs,
        }
    }

    /// Credit the cost of `clue` to the buyer's opponent and return who was paid.
    pub fn award_on_purchase(&mut self, buyer: Side, clue: &ClueCard) -> Side {
        let credited = buyer.other();
        match credited {
            Side::Me => self.mine = self.mine.saturating_add(clue.cost),
            Side::Opponent => self.theirs = self.theirs.saturating_add(clue.cost),
        }
        credited
    }

    /// A correct guess by `side` only wins with strictly more berries.
    pub fn can_win(&self, side: Side) -> bool {
        self.balance(side) > self.balance(side.other())
    }
}
