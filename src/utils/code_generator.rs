//! Short code generation over a configurable alphabet.
//!
//! Codes are sampled uniformly at random, one character at a time, from a
//! validated alphabet. Generation carries no uniqueness guarantee; collision
//! handling belongs to [`crate::application::services::ShortenerService`].

use crate::error::AppError;
use rand::Rng;
use serde_json::json;

/// Characters that cannot appear unescaped in a URL path segment.
const FORBIDDEN_CHARS: &[char] = &['/', '?', '#', '%'];

/// Generates a single code of `length` characters drawn from `alphabet`.
///
/// # Errors
///
/// Returns [`AppError::InvalidConfiguration`] if the alphabet is empty,
/// contains a character that is not path-safe, or `length` is zero.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(&['a', 'b'], 2)?;
/// assert!(["aa", "ab", "ba", "bb"].contains(&code.as_str()));
/// ```
pub fn generate_code(alphabet: &[char], length: usize) -> Result<String, AppError> {
    Ok(CodeGenerator::new(alphabet, length)?.generate())
}

/// Validated generator settings, built once at startup.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl CodeGenerator {
    /// Validates the alphabet and length.
    ///
    /// Duplicate characters are collapsed, keeping first-seen order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfiguration`] on an empty alphabet, a
    /// zero length, or a character that is whitespace, a control character,
    /// `/`, `?`, `#` or `%`.
    pub fn new(alphabet: &[char], length: usize) -> Result<Self, AppError> {
        if length == 0 {
            return Err(AppError::invalid_configuration(
                "Short code length must be greater than 0",
                json!({ "length": length }),
            ));
        }

        let mut unique = Vec::with_capacity(alphabet.len());
        for &c in alphabet {
            if c.is_whitespace() || c.is_control() || FORBIDDEN_CHARS.contains(&c) {
                return Err(AppError::invalid_configuration(
                    "Alphabet contains a character that is not URL path safe",
                    json!({ "character": c.to_string() }),
                ));
            }
            if !unique.contains(&c) {
                unique.push(c);
            }
        }

        if unique.is_empty() {
            return Err(AppError::invalid_configuration(
                "Short code alphabet must not be empty",
                json!({}),
            ));
        }

        Ok(Self {
            alphabet: unique,
            length,
        })
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Draws a fresh random code.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();

        (0..self.length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }

    /// Number of distinct codes, `|alphabet|^length`.
    ///
    /// Returns `None` when the value does not fit in a `u128`.
    pub fn codespace_size(&self) -> Option<u128> {
        let exponent = u32::try_from(self.length).ok()?;
        (self.alphabet.len() as u128).checked_pow(exponent)
    }

    /// Returns the code at position `index` of the codespace in
    /// lexicographic alphabet order, or `None` past the end.
    pub fn code_at(&self, index: u128) -> Option<String> {
        if self.codespace_size().is_some_and(|size| index >= size) {
            return None;
        }

        let base = self.alphabet.len() as u128;
        let mut remaining = index;
        let mut chars = vec![self.alphabet[0]; self.length];

        for slot in chars.iter_mut().rev() {
            *slot = self.alphabet[(remaining % base) as usize];
            remaining /= base;
        }

        Some(chars.into_iter().collect())
    }
}
