use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A character that appears on exactly one pair of cards.
///
/// The `description` is only meant for whoever paints the character; the game
/// itself never looks at it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Character {
    /// Unique display label. Doubles as the pair id of the character's cards.
    pub name: String,
    /// The show or game the character is from.
    pub source: String,
    pub description: String,
}

impl Character {
    pub fn new(name: &str, source: &str, description: &str) -> Self {
        Self {
            name: String::from(name),
            source: String::from(source),
            description: String::from(description),
        }
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.source)
    }
}

/// Something that can be used directly as an image source: a URL, a data URI
/// or a path on disk.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which of the two copies of a pair a card is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Twin {
    A,
    B,
}

/// Identifies one physical card. The two cards of a pair share the
/// `pair_index` but never the [twin](Twin).
///
/// ```
/// # use pairmatch::{CardId, Twin};
/// assert_eq!(CardId { pair_index: 3, twin: Twin::B }.to_string(), "card-3-b");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId {
    pub pair_index: usize,
    pub twin: Twin,
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let twin = match self.twin {
            Twin::A => 'a',
            Twin::B => 'b',
        };
        write!(f, "card-{}-{}", self.pair_index, twin)
    }
}

/// One physical card on the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: CardId,
    /// Equal to the name of the owning [`Character`]. Exactly two cards per
    /// session share a pair id.
    pub pair_id: String,
    pub image: ImageRef,
    pub character: Arc<Character>,
    pub is_flipped: bool,
    /// A matched card is always face-up as well.
    pub is_matched: bool,
}

impl Card {
    /// Creates both cards of a pair, face-down and unmatched.
    pub fn pair(pair_index: usize, character: Arc<Character>, image: ImageRef) -> [Card; 2] {
        let make = |twin| Card {
            id: CardId { pair_index, twin },
            pair_id: character.name.clone(),
            image: image.clone(),
            character: Arc::clone(&character),
            is_flipped: false,
            is_matched: false,
        };
        [make(Twin::A), make(Twin::B)]
    }

    pub fn matches(&self, other: &Card) -> bool {
        self.pair_id == other.pair_id
    }

    /// Flipped but not yet matched, i.e. part of the pending selection.
    pub fn is_pending(&self) -> bool {
        self.is_flipped && !self.is_matched
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.id, self.pair_id)
    }
}
