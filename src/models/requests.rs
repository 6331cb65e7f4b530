//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::Tag;

/// Request body for the SET operation (PUT /set)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
    /// Optional TTL in seconds, falls back to the cache default
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }
}

/// Request body for POST /del/prefix
#[derive(Debug, Clone, Deserialize)]
pub struct PrefixRequest {
    pub prefixes: Vec<String>,
}

/// One tag as sent over the wire: a token or a list of tokens.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagSpec {
    Token(String),
    Tokens(Vec<String>),
}

impl From<TagSpec> for Tag {
    fn from(spec: TagSpec) -> Self {
        match spec {
            TagSpec::Token(token) => Tag::from(token),
            TagSpec::Tokens(tokens) => Tag::from(tokens),
        }
    }
}

/// Request body for POST /del/tags
#[derive(Debug, Clone, Deserialize)]
pub struct TagsRequest {
    pub tags: Vec<TagSpec>,
}
