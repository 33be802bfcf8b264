//! Asynchronous abstraction for sourcing characters and their pictures.
//!
//! Sessions plug in a [`ContentProvider`] so the game can run with a
//! generative backend, files on disk, or scripted fixtures. Failures are
//! reported as [`ContentError`] and recovered by the session initializer.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pairmatch::{fallback_characters, Character, ImageRef};
use thiserror::Error;

pub const PLACEHOLDER_BASE_URL: &str = "https://via.placeholder.com/400x400/FFB6C1/000000";

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content provider is not available")]
    Unavailable,

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse the character list in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no image found for {name}")]
    ImageNotFound { name: String },
}

/// Supplies the characters of a session and one image per character.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Lists `count` characters with distinct names.
    ///
    /// Lists of the wrong length or with duplicate names are tolerated and
    /// cleaned up by the caller.
    async fn list_characters(&self, count: usize) -> Result<Vec<Character>, ContentError>;

    /// Produces a picture of the given character.
    async fn render_image(&self, character: &Character) -> Result<ImageRef, ContentError>;
}

/// The image used when a character could not be painted. Only depends on the
/// character's name.
///
/// ```
/// # use host::placeholder_image;
/// # use pairmatch::Character;
/// let image = placeholder_image(&Character::new("Super Mario", "Super Mario Bros", ""));
/// assert_eq!(
///     image.as_str(),
///     "https://via.placeholder.com/400x400/FFB6C1/000000?text=Super%20Mario"
/// );
/// ```
pub fn placeholder_image(character: &Character) -> ImageRef {
    let query = serde_urlencoded::to_string(vec![("text", character.name.as_str())])
        .unwrap_or_default();
    ImageRef(format!("{}?{}", PLACEHOLDER_BASE_URL, uri_component(&query)))
}

// Form encoding differs from URI component encoding in how it writes spaces
// and in escaping `!'()~`. A literal `+` or `%` in the name is already escaped
// as `%2B` or `%25`, so these replacements cannot touch it.
fn uri_component(form_encoded: &str) -> String {
    [
        ("+", "%20"),
        ("%21", "!"),
        ("%27", "'"),
        ("%28", "("),
        ("%29", ")"),
        ("%7E", "~"),
    ]
    .into_iter()
    .fold(form_encoded.to_string(), |encoded, (from, to)| {
        encoded.replace(from, to)
    })
}

/// File name stem under which a character's image is looked up.
pub fn image_slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// Always offers the built-in characters and never has a picture for them.
pub struct FallbackProvider;

#[async_trait]
impl ContentProvider for FallbackProvider {
    async fn list_characters(&self, _count: usize) -> Result<Vec<Character>, ContentError> {
        Ok(fallback_characters())
    }

    async fn render_image(&self, _character: &Character) -> Result<ImageRef, ContentError> {
        Err(ContentError::Unavailable)
    }
}

/// Reads characters from a JSON file and pictures from a directory.
///
/// The file holds an array of `{ "name", "source", "description" }` objects.
/// The picture of a character is `<dir>/<slug>.<ext>`, see [`image_slug()`].
/// Either source may be left out, which makes the corresponding request fail.
#[derive(Clone, Debug, Default)]
pub struct LocalContentProvider {
    pub characters_path: Option<PathBuf>,
    pub images_dir: Option<PathBuf>,
}

impl LocalContentProvider {
    pub fn new(characters_path: Option<PathBuf>, images_dir: Option<PathBuf>) -> Self {
        Self {
            characters_path,
            images_dir,
        }
    }
}

pub async fn load_characters(path: &Path) -> Result<Vec<Character>, ContentError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&contents).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[async_trait]
impl ContentProvider for LocalContentProvider {
    async fn list_characters(&self, _count: usize) -> Result<Vec<Character>, ContentError> {
        let path = self
            .characters_path
            .as_deref()
            .ok_or(ContentError::Unavailable)?;
        load_characters(path).await
    }

    async fn render_image(&self, character: &Character) -> Result<ImageRef, ContentError> {
        let dir = self.images_dir.as_deref().ok_or(ContentError::Unavailable)?;
        let slug = image_slug(&character.name);
        for extension in IMAGE_EXTENSIONS {
            let path = dir.join(format!("{}.{}", slug, extension));
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Ok(ImageRef(path.display().to_string()));
            }
        }
        Err(ContentError::ImageNotFound {
            name: character.name.clone(),
        })
    }
}
