//! Cache Key Module
//!
//! Builds composite cache keys from a base key and ordered call parameters.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Separator between the base key and each parameter token
pub const KEY_SEPARATOR: &str = "_";

// == Tokenizer ==
/// Normalizes one key fragment into its token form.
pub trait Tokenizer: Send + Sync {
    /// Returns the token for `fragment`, or None when the fragment has no
    /// token form. Key construction then falls back to the fragment's JSON
    /// text.
    fn tokenize(&self, fragment: &Value) -> Option<String>;
}

// == Snake Case Tokenizer ==
/// Lowercase words joined by underscores: `"fooBar Baz"` becomes `foo_bar_baz`.
///
/// Scalars are tokenized; arrays and objects are left to the fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct SnakeCaseTokenizer;

impl Tokenizer for SnakeCaseTokenizer {
    fn tokenize(&self, fragment: &Value) -> Option<String> {
        match fragment {
            Value::String(s) => Some(snake_case(s)),
            Value::Number(n) => Some(snake_case(&n.to_string())),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Splits `input` into words and joins them lowercase with underscores.
///
/// Word boundaries are runs of non-alphanumeric characters, lower-to-upper
/// case changes, letter/digit changes, and the last capital of an acronym
/// followed by a lowercase letter (`HTTPServer` gives `http_server`).
pub fn snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_alphabetic() && c.is_numeric())
                || (prev.is_numeric() && c.is_alphabetic())
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(|n| n.is_lowercase()));
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }
    words.join("_")
}

// == Cache Key Builder ==
/// Joins a base key and normalized parameters with [`KEY_SEPARATOR`].
#[derive(Clone)]
pub struct CacheKeyBuilder {
    tokenizer: Arc<dyn Tokenizer>,
}

impl CacheKeyBuilder {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }

    /// Builds the key for `base` and `params`, in call order.
    ///
    /// `build("users", &[json!(42)])` gives `users_42`.
    pub fn build(&self, base: &str, params: &[Value]) -> String {
        let mut key = base.to_string();
        for param in params {
            key.push_str(KEY_SEPARATOR);
            key.push_str(&self.token(param));
        }
        key
    }

    fn token(&self, param: &Value) -> String {
        self.tokenizer
            .tokenize(param)
            .unwrap_or_else(|| snake_case(&param.to_string()))
    }
}

impl Default for CacheKeyBuilder {
    fn default() -> Self {
        Self::new(Arc::new(SnakeCaseTokenizer))
    }
}

impl fmt::Debug for CacheKeyBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheKeyBuilder")
            .field("separator", &KEY_SEPARATOR)
            .finish_non_exhaustive()
    }
}
