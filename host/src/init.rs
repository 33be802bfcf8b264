//! Building a fresh, shuffled game from whatever the content provider offers.
use std::collections::BTreeSet;

use futures::future::join_all;
use pairmatch::{
    build_deck, shuffle_deck, validate_characters, Character, Game, ImageRef, NUM_PAIRS,
};
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::content::{placeholder_image, ContentProvider};
use crate::error::SessionInitError;
use crate::Config;

/// How far the initializer got, shown while the session is loading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    ChoosingCharacters,
    PaintingCharacters,
    Ready,
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Progress::ChoosingCharacters => "Choosing characters...",
            Progress::PaintingCharacters => "Painting the characters...",
            Progress::Ready => "Ready!",
        };
        f.write_str(label)
    }
}

/// Drops repeated names and keeps the first `count` characters.
///
/// Returns `None` if fewer than `count` distinct characters remain.
fn usable_characters(characters: Vec<Character>, count: usize) -> Option<Vec<Character>> {
    let mut seen = BTreeSet::new();
    let distinct: Vec<Character> = characters
        .into_iter()
        .filter(|character| seen.insert(character.name.clone()))
        .take(count)
        .collect();
    (distinct.len() == count).then_some(distinct)
}

/// Asks the provider for the characters of a session, or falls back to the
/// configured list.
pub async fn choose_characters(
    provider: &dyn ContentProvider,
    config: &Config,
) -> Result<Vec<Character>, SessionInitError> {
    match provider.list_characters(NUM_PAIRS).await {
        Ok(characters) => {
            let received = characters.len();
            if let Some(characters) = usable_characters(characters, NUM_PAIRS) {
                return Ok(characters);
            }
            warn!(
                received,
                expected = NUM_PAIRS,
                "Not enough distinct characters, using the fallback list"
            );
        }
        Err(err) => {
            warn!(%err, "Failed to fetch characters, using the fallback list");
        }
    }
    validate_characters(&config.fallback_characters, NUM_PAIRS)
        .map_err(SessionInitError::FallbackUnusable)?;
    Ok(config.fallback_characters.clone())
}

/// Requests all pictures at once. A failed request is replaced by a
/// placeholder, so this never fails. Results stay in the order of
/// `characters`, whatever order the requests complete in.
pub async fn illustrate(
    provider: &dyn ContentProvider,
    characters: Vec<Character>,
) -> Vec<(Character, ImageRef)> {
    let images = join_all(characters.iter().map(|character| async move {
        match provider.render_image(character).await {
            Ok(image) => image,
            Err(err) => {
                warn!(
                    character = %character.name,
                    %err,
                    "Failed to paint character, using a placeholder"
                );
                placeholder_image(character)
            }
        }
    }))
    .await;
    characters.into_iter().zip(images).collect()
}

/// Runs the whole initialization: characters, pictures, deck, shuffle.
///
/// `on_progress` is called whenever a new step begins.
pub async fn initialize_game<F>(
    provider: &dyn ContentProvider,
    config: &Config,
    rng: &mut StdRng,
    mut on_progress: F,
) -> Result<Game, SessionInitError>
where
    F: FnMut(Progress) + Send,
{
    on_progress(Progress::ChoosingCharacters);
    let characters = choose_characters(provider, config).await?;
    debug!(
        characters = ?characters.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        "Characters chosen"
    );

    on_progress(Progress::PaintingCharacters);
    let illustrated = illustrate(provider, characters).await;

    // `choose_characters` only returns lists that pass `validate_characters`,
    // which is the only check `build_deck` makes.
    let mut deck =
        build_deck(illustrated, NUM_PAIRS).map_err(SessionInitError::FallbackUnusable)?;
    shuffle_deck(&mut deck, rng);
    on_progress(Progress::Ready);
    Ok(Game::new(deck))
}
