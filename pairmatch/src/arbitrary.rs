use std::sync::Arc;

use quickcheck::Arbitrary;

use crate::{Card, CardId, Character, ImageRef, Twin};

/// A deck in exactly the given order. Cards with equal labels form a pair.
pub fn deck_from_pair_ids(pair_ids: &[&str]) -> Vec<Card> {
    let mut first_seen: Vec<&str> = Vec::new();
    pair_ids
        .iter()
        .map(|&pair_id| {
            let (pair_index, twin) = match first_seen.iter().position(|&seen| seen == pair_id) {
                Some(pair_index) => (pair_index, Twin::B),
                None => {
                    first_seen.push(pair_id);
                    (first_seen.len() - 1, Twin::A)
                }
            };
            Card {
                id: CardId { pair_index, twin },
                pair_id: String::from(pair_id),
                image: ImageRef(format!("{}.png", pair_id)),
                character: Arc::new(Character::new(pair_id, "Test", "")),
                is_flipped: false,
                is_matched: false,
            }
        })
        .collect()
}

/// `[A1, A2, B1, B2]`
pub fn two_pair_deck() -> Vec<Card> {
    deck_from_pair_ids(&["A", "A", "B", "B"])
}

#[derive(Clone, Copy, Debug)]
pub enum Step {
    Activate(usize),
    Resolve,
}

/// A deck plus a sequence of inputs, some of which may be ignored.
#[derive(Clone, Debug)]
pub struct Script {
    pub deck: Vec<Card>,
    pub steps: Vec<Step>,
}

const LABELS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

impl Arbitrary for Script {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let num_pairs = 1 + usize::arbitrary(g) % LABELS.len();
        // Decide the order by sorting on random keys
        let mut keyed: Vec<(u32, &str)> = LABELS[..num_pairs]
            .iter()
            .flat_map(|&label| [label, label])
            .map(|label| (u32::arbitrary(g), label))
            .collect();
        keyed.sort_by_key(|&(key, _)| key);
        let order: Vec<&str> = keyed.into_iter().map(|(_, label)| label).collect();
        let deck = deck_from_pair_ids(&order);

        let num_steps = usize::arbitrary(g) % 80;
        let steps = (0..num_steps)
            .map(|_| {
                // Resolve about a third of the time. Positions may be out of range.
                if u8::arbitrary(g) % 3 == 0 {
                    Step::Resolve
                } else {
                    Step::Activate(usize::arbitrary(g) % (deck.len() + 1))
                }
            })
            .collect();

        Script { deck, steps }
    }
}
