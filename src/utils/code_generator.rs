//! Short code generation.
//!
//! Codes are drawn uniformly from a 62-symbol alphanumeric alphabet. They are
//! not unique by construction; uniqueness comes from the store's constraint
//! and the retry loop in [`crate::application::services::LinkService`].

use rand::Rng;

/// Symbols a generated code is made of: digits plus upper and lower case letters.
pub const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of generated codes unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Path segments served by the router itself.
///
/// A code equal to one of these would be shadowed by the static route and
/// could never be redirected.
const RESERVED_CODES: &[&str] = &["api", "health"];

/// Produces random candidate codes of a fixed length.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    length: usize,
}

impl CodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Generates one candidate code.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let code = CodeGenerator::new(6).generate();
    /// assert_eq!(code.len(), 6);
    /// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    /// ```
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();

        (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

/// Returns true if `code` collides with a route the router serves itself.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
