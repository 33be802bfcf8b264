use std::sync::Arc;

use serde::Serialize;

use crate::{Card, CardId, Character, GameOutcome, ImageRef, Phase};

/// What can be seen of a card from across the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    Hidden,
    /// Face-up while it is waiting to be resolved.
    Revealed,
    Matched,
}

/// A card as the presentation layer sees it. The character and image are
/// only present while the card is face-up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: CardId,
    pub face: Face,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<Arc<Character>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        let face = if card.is_matched {
            Face::Matched
        } else if card.is_flipped {
            Face::Revealed
        } else {
            Face::Hidden
        };
        let shown = face != Face::Hidden;
        CardView {
            id: card.id,
            face,
            character: shown.then(|| Arc::clone(&card.character)),
            image: shown.then(|| card.image.clone()),
        }
    }
}

/// Everything needed to draw the table, the score panel and the turn indicator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub cards: Vec<CardView>,
    pub scores: [u32; 2],
    pub current_player_idx: usize,
    pub phase: Phase,
    pub won: bool,
    pub outcome: Option<GameOutcome>,
}
