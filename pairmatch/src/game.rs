use std::cmp::Ordering;
use std::time::Duration;

use serde::Serialize;

use crate::snapshot::{CardView, GameSnapshot};
use crate::Card;

/// How long face-up cards stay visible before a pending selection is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Just long enough to register the success.
    pub match_delay: Duration,
    /// Long enough to memorize both faces before they are hidden again.
    pub mismatch_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            match_delay: Duration::from_millis(500),
            mismatch_delay: Duration::from_millis(1500),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Waiting for input, with zero or one card pending.
    Idle,
    /// Two cards are pending and input is locked until [`Game::resolve()`].
    Resolving,
}

/// Why an activation had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ignored {
    Resolving,
    NoSuchCard,
    AlreadyMatched,
    AlreadyFaceUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ResolutionKind {
    Match,
    Mismatch,
}

impl ResolutionKind {
    pub fn delay(self, timing: &Timing) -> Duration {
        match self {
            ResolutionKind::Match => timing.match_delay,
            ResolutionKind::Mismatch => timing.mismatch_delay,
        }
    }
}

/// A complete pending selection, waiting for its delay to run out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingResolution {
    pub first: usize,
    pub second: usize,
    pub kind: ResolutionKind,
}

/// Summarizes the outcome of [`Game::activate()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Ignored(Ignored),
    /// The card at this position was turned face-up and is now pending.
    Flipped { position: usize },
    /// The second card was turned face-up. The caller has to call
    /// [`Game::resolve()`] after [`ResolutionKind::delay()`].
    Resolving(PendingResolution),
}

/// Summarizes the outcome of [`Game::resolve()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The player scored and keeps the turn.
    Matched {
        player_idx: usize,
        pair_id: String,
        game_won: bool,
    },
    /// Both cards are face-down again and the turn passed.
    Mismatched { next_player_idx: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum GameOutcome {
    WonByPlayer { player_idx: usize },
    Draw,
}

/// The match engine: a deck on the table plus the scores of two players.
///
/// All state changes go through [`activate()`](Game::activate) and
/// [`resolve()`](Game::resolve). Neither can fail: an activation that makes no
/// sense in the current state is ignored without changing anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    cards: Vec<Card>,
    scores: [u32; 2],
    current_player_idx: usize,
    // Positions of the face-up, unmatched cards, in flip order. At most two.
    pending: Vec<usize>,
    resolving: bool,
    won: bool,
}

impl Game {
    /// Starts a game on the given deck, in the given order. Player 0 begins.
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            scores: [0, 0],
            current_player_idx: 0,
            pending: Vec::with_capacity(2),
            resolving: false,
            won: false,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    pub fn current_player_idx(&self) -> usize {
        self.current_player_idx
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn phase(&self) -> Phase {
        if self.resolving {
            Phase::Resolving
        } else {
            Phase::Idle
        }
    }

    /// Turns the card at `position` face-up.
    pub fn activate(&mut self, position: usize) -> Activation {
        if self.resolving {
            return Activation::Ignored(Ignored::Resolving);
        }
        let Some(card) = self.cards.get_mut(position) else {
            return Activation::Ignored(Ignored::NoSuchCard);
        };
        if card.is_matched {
            return Activation::Ignored(Ignored::AlreadyMatched);
        }
        if card.is_flipped {
            return Activation::Ignored(Ignored::AlreadyFaceUp);
        }

        card.is_flipped = true;
        self.pending.push(position);

        match self.pending[..] {
            [first, second] => {
                self.resolving = true;
                let kind = if self.cards[first].matches(&self.cards[second]) {
                    ResolutionKind::Match
                } else {
                    ResolutionKind::Mismatch
                };
                Activation::Resolving(PendingResolution {
                    first,
                    second,
                    kind,
                })
            }
            _ => Activation::Flipped { position },
        }
    }

    /// Applies the effect of the pending selection and unlocks input.
    ///
    /// Returns `None` if nothing is waiting to be resolved.
    pub fn resolve(&mut self) -> Option<Resolution> {
        if !self.resolving {
            return None;
        }
        let [first, second] = self.pending[..] else {
            return None;
        };
        self.pending.clear();
        self.resolving = false;

        if self.cards[first].matches(&self.cards[second]) {
            let pair_id = self.cards[first].pair_id.clone();
            for card in self.cards.iter_mut().filter(|card| card.pair_id == pair_id) {
                card.is_matched = true;
                card.is_flipped = true;
            }
            // A match grants another turn, so the current player stays.
            self.scores[self.current_player_idx] += 1;
            self.won = self.cards.iter().all(|card| card.is_matched);
            Some(Resolution::Matched {
                player_idx: self.current_player_idx,
                pair_id,
                game_won: self.won,
            })
        } else {
            self.cards[first].is_flipped = false;
            self.cards[second].is_flipped = false;
            self.current_player_idx = 1 - self.current_player_idx;
            Some(Resolution::Mismatched {
                next_player_idx: self.current_player_idx,
            })
        }
    }

    /// Who won, once every card is matched. There is no tie-break.
    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.won {
            return None;
        }
        let outcome = match self.scores[0].cmp(&self.scores[1]) {
            Ordering::Less => GameOutcome::WonByPlayer { player_idx: 1 },
            Ordering::Equal => GameOutcome::Draw,
            Ordering::Greater => GameOutcome::WonByPlayer { player_idx: 0 },
        };
        Some(outcome)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            cards: self.cards.iter().map(CardView::from).collect(),
            scores: self.scores,
            current_player_idx: self.current_player_idx,
            phase: self.phase(),
            won: self.won,
            outcome: self.outcome(),
        }
    }
}
