/// The error type for [`build_deck()`](crate::build_deck), i.e. for turning a
/// list of characters into a deck.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeckError {
    WrongNumberOfCharacters { expected: usize, actual: usize },
    DuplicateCharacter { name: String },
}

impl std::error::Error for DeckError {}

impl std::fmt::Display for DeckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckError::WrongNumberOfCharacters { expected, actual } => write!(
                f,
                "Expected {} characters to build a deck, but got {}",
                expected, actual
            ),
            DeckError::DuplicateCharacter { name } => write!(
                f,
                "The character '{}' appears more than once, so its pairs could not be told apart",
                name
            ),
        }
    }
}
