mod content;
mod error;
mod init;
mod session;
pub use content::*;
pub use error::*;
pub use init::*;
pub use session::*;

use pairmatch::{fallback_characters, Character, Timing};

pub struct Config {
    pub timing: Timing,
    /// Seeds the shuffles of every session started from this config.
    pub seed: u64,
    /// Used whenever the content provider has no usable character list.
    pub fallback_characters: Vec<Character>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            seed: rand::random(),
            fallback_characters: fallback_characters(),
        }
    }
}
