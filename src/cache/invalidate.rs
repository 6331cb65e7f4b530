//! Bulk Invalidation
//!
//! Prefix, tag and full-clear deletion across the index. The first filesystem
//! error aborts the call; entries already removed are not restored.

use std::io;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tokio::fs;
use tracing::{debug, info};

use crate::cache::FileCache;
use crate::error::{CacheError, Result};

// == Tag ==
/// A token, or ordered tokens, that must appear somewhere in a key.
///
/// Tokens are joined with `*` and wrapped as `*tokens*`, so `["inis", "test"]`
/// matches any key containing `inis` followed later by `test`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    tokens: Vec<String>,
}

impl Tag {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Shell-style glob this tag expands to.
    ///
    /// Braces are matched literally; only `*`, `?` and `[...]` are special.
    pub fn pattern(&self) -> String {
        let tokens: Vec<String> = self.tokens.iter().map(|t| escape_braces(t)).collect();
        format!("*{}*", tokens.join("*"))
    }
}

fn escape_braces(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    for c in token.chars() {
        match c {
            '{' => out.push_str("[{]"),
            '}' => out.push_str("[}]"),
            _ => out.push(c),
        }
    }
    out
}

impl From<&str> for Tag {
    fn from(token: &str) -> Self {
        Self::new([token])
    }
}

impl From<String> for Tag {
    fn from(token: String) -> Self {
        Self::new([token])
    }
}

impl<S: Into<String>> From<Vec<S>> for Tag {
    fn from(tokens: Vec<S>) -> Self {
        Self::new(tokens)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Tag {
    fn from(tokens: [S; N]) -> Self {
        Self::new(tokens)
    }
}

/// Compiles tags into one matcher; a key matching any pattern is selected.
pub(crate) fn compile_tags(tags: &[Tag]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for tag in tags {
        let pattern = tag.pattern();
        let glob = Glob::new(&pattern)
            .map_err(|source| CacheError::InvalidPattern { pattern, source })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| CacheError::InvalidPattern {
        pattern: tags.iter().map(Tag::pattern).collect::<Vec<_>>().join(", "),
        source,
    })
}

impl FileCache {
    // == Delete By Prefix ==
    /// Removes every entry whose key starts with one of `prefixes`.
    ///
    /// Returns how many entries were removed; no match is not an error.
    pub async fn try_del_prefix<I, S>(&self, prefixes: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes: Vec<String> = prefixes
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();
        if prefixes.is_empty() {
            return Ok(0);
        }

        let mut state = self.state.lock().await;
        let keys: Vec<String> = state
            .index
            .keys()
            .into_iter()
            .filter(|key| prefixes.iter().any(|p| key.starts_with(p.as_str())))
            .collect();

        let removed = state.remove_keys(&keys).await?;
        debug!(?prefixes, removed, "deleted entries by prefix");
        Ok(removed)
    }

    pub async fn del_prefix<I, S>(&self, prefixes: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.try_del_prefix(prefixes).await.is_ok()
    }

    // == Delete By Tags ==
    /// Removes every entry whose key glob-matches any expanded tag.
    pub async fn try_del_tags<I, T>(&self, tags: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        let tags: Vec<Tag> = tags.into_iter().map(Into::into).collect();
        if tags.is_empty() {
            return Ok(0);
        }
        let matcher = compile_tags(&tags)?;

        let mut state = self.state.lock().await;
        let keys: Vec<String> = state
            .index
            .keys()
            .into_iter()
            .filter(|key| matcher.is_match(key.as_str()))
            .collect();

        let removed = state.remove_keys(&keys).await?;
        let patterns: Vec<String> = tags.iter().map(Tag::pattern).collect();
        debug!(?patterns, removed, "deleted entries by tag");
        Ok(removed)
    }

    pub async fn del_tags<I, T>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        self.try_del_tags(tags).await.is_ok()
    }

    // == Clear ==
    /// Removes every tracked file, empties the index, then deletes the whole
    /// directory including untracked files. The next write recreates it.
    pub async fn try_clear(&self) -> Result<usize> {
        let mut state = self.state.lock().await;

        let keys = state.index.keys();
        let removed = state.remove_keys(&keys).await?;
        state.index.clear();

        match fs::remove_dir_all(self.dir()).await {
            Err(err) if err.kind() != io::ErrorKind::NotFound => {
                return Err(CacheError::io("remove cache dir", self.dir(), err));
            }
            _ => {}
        }

        info!(removed, dir = %self.dir().display(), "cache cleared");
        Ok(removed)
    }

    pub async fn clear(&self) -> bool {
        self.try_clear().await.is_ok()
    }
}
