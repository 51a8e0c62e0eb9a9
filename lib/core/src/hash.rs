//! Content hashes addressing individual book files.
//!
//! A content hash is the 32-character lowercase hexadecimal MD5 digest the
//! book index uses as the identity of one specific file. The type can only
//! be constructed through validation, so holding a `ContentHash` means the
//! string matches `^[a-f0-9]{32}$`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Length of a content hash in characters.
pub const CONTENT_HASH_LEN: usize = 32;

static EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-f0-9]{32}$").expect("static pattern compiles"));

static EMBEDDED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-f0-9]{32}").expect("static pattern compiles"));

/// Error returned when a string is not a valid content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseContentHashError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParseContentHashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not a {CONTENT_HASH_LEN}-character lowercase hex content hash",
            self.input
        )
    }
}

impl std::error::Error for ParseContentHashError {}

/// A validated content hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Returns the first substring of `text` that looks like a content hash.
    ///
    /// The match is a plain substring search: the hash does not need to be
    /// delimited by whitespace.
    #[must_use]
    pub fn find_in(text: &str) -> Option<Self> {
        EMBEDDED
            .find(text)
            .map(|found| Self(found.as_str().to_owned()))
    }

    /// Returns the hash as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentHash {
    type Err = ParseContentHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if EXACT.is_match(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(ParseContentHashError {
                input: s.to_owned(),
            })
        }
    }
}

impl TryFrom<String> for ContentHash {
    type Error = ParseContentHashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if EXACT.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(ParseContentHashError { input: value })
        }
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
