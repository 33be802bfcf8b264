use std::collections::BTreeSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::{Card, Character, DeckError, ImageRef};

/// Checks that there are exactly `expected` characters with distinct names.
pub fn validate_characters(characters: &[Character], expected: usize) -> Result<(), DeckError> {
    if characters.len() != expected {
        return Err(DeckError::WrongNumberOfCharacters {
            expected,
            actual: characters.len(),
        });
    }
    let mut seen = BTreeSet::new();
    for character in characters {
        if !seen.insert(character.name.as_str()) {
            return Err(DeckError::DuplicateCharacter {
                name: character.name.clone(),
            });
        }
    }
    Ok(())
}

/// Builds the unshuffled deck: two cards per character, in the order of the
/// characters, with the `a` copy directly before the `b` copy.
pub fn build_deck(
    illustrated: Vec<(Character, ImageRef)>,
    expected_pairs: usize,
) -> Result<Vec<Card>, DeckError> {
    let (characters, images): (Vec<Character>, Vec<ImageRef>) = illustrated.into_iter().unzip();
    validate_characters(&characters, expected_pairs)?;

    let mut deck = Vec::with_capacity(2 * characters.len());
    for (pair_index, (character, image)) in characters.into_iter().zip(images).enumerate() {
        deck.extend(Card::pair(pair_index, Arc::new(character), image));
    }
    Ok(deck)
}

/// Uniformly permutes the deck (Fisher-Yates).
pub fn shuffle_deck(deck: &mut [Card], rng: &mut StdRng) {
    deck.shuffle(rng);
}
