use crate::Character;

/// Number of pairs in a session, i.e. 20 cards.
pub const NUM_PAIRS: usize = 10;

// (name, source, description)
static FALLBACK_TABLE: [(&str, &str, &str); NUM_PAIRS] = [
    (
        "Captain Underpants",
        "Captain Underpants",
        "3D render of Captain Underpants, bald, wearing white underwear and red cape, smiling widely",
    ),
    (
        "Little Bheem",
        "Mighty Little Bheem",
        "Cute 3D baby warrior Little Bheem, wearing an orange dhoti, eating a laddu",
    ),
    (
        "Sonic",
        "Sonic the Hedgehog",
        "Cute 3D Sonic the Hedgehog, blue fur, red shoes, giving a thumbs up",
    ),
    (
        "Super Mario",
        "Super Mario Bros",
        "Cute 3D Super Mario, red cap, blue overalls, mustache, jumping",
    ),
    (
        "Luigi",
        "Super Mario Bros",
        "Cute 3D Luigi, green cap, blue overalls, taller and nervous smile",
    ),
    (
        "JJ",
        "Cocomelon",
        "Cute 3D baby JJ from Cocomelon, blonde curl, pajamas, smiling",
    ),
    (
        "Pikachu",
        "Pokemon",
        "Cute 3D Pikachu, yellow fur, red cheeks, lightning tail, happy",
    ),
    (
        "SpongeBob",
        "SpongeBob SquarePants",
        "Cute 3D SpongeBob, yellow sponge, square pants, big blue eyes, laughing",
    ),
    (
        "Elsa",
        "Frozen",
        "Cute 3D Queen Elsa, blue ice dress, platinum blonde braid, magical snowflake",
    ),
    (
        "Chase",
        "Paw Patrol",
        "Cute 3D Chase the police dog German Shepherd, blue police uniform and hat",
    ),
];

/// The fixed list of characters used whenever the content provider cannot
/// come up with a usable list of its own.
pub fn fallback_characters() -> Vec<Character> {
    FALLBACK_TABLE
        .iter()
        .map(|&(name, source, description)| Character::new(name, source, description))
        .collect()
}
