pub use cards::*;
pub use characters::*;
pub use deck::*;
pub use errors::*;
pub use game::*;
pub use snapshot::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod cards;
mod characters;
mod deck;
mod errors;
mod game;
mod snapshot;
mod visualization;
