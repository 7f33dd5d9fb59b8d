//! Stored name generation and validation.
//!
//! Stored name format: `{hex}{.ext}`, where `{hex}` is `2 * bytes` lowercase hex
//! characters and `{.ext}` is the extension of the client's filename (dot included,
//! original case kept), or empty when the filename has none.

use picdrop_core::validation::extension_of;

/// Source of random identifiers for stored names
pub trait NameGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random identifiers of `bytes` random bytes rendered as lowercase hex.
#[derive(Debug, Clone, Copy)]
pub struct RandomHexNames {
    bytes: usize,
}

impl RandomHexNames {
    pub fn new(bytes: usize) -> Self {
        Self { bytes }
    }
}

impl Default for RandomHexNames {
    fn default() -> Self {
        Self::new(3)
    }
}

impl NameGenerator for RandomHexNames {
    fn generate(&self) -> String {
        use rand::Rng;

        let mut rng = rand::rng();
        let random_bytes: Vec<u8> = (0..self.bytes).map(|_| rng.random()).collect();
        hex::encode(random_bytes)
    }
}

/// Extension of `original_name` with its leading dot, e.g. `.png`.
pub fn extension_suffix(original_name: &str) -> String {
    extension_of(original_name)
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// Build the stored name for a generated identifier.
pub fn stored_name(identifier: &str, original_name: &str) -> String {
    format!("{}{}", identifier, extension_suffix(original_name))
}

/// Check that a requested name can only resolve to a file directly inside the
/// storage root and is not a temporary file.
pub fn is_valid_stored_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 255
        && !name.starts_with('.')
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0'])
}
