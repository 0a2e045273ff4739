//! Node search, as used to highlight or filter nodes in a front-end.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Node;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// What to search for and where.
///
/// A node matches when any enabled field matches. With no field enabled the
/// search is inactive and every node matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchQuery {
    pub text: String,
    pub titles: bool,
    pub bodies: bool,
    pub tags: bool,
    pub case_sensitive: bool,
    pub regex: bool,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            titles: true,
            bodies: true,
            tags: true,
            case_sensitive: false,
            regex: false,
        }
    }
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Searches only tags for `tag`.
    pub fn for_tag(tag: impl Into<String>) -> Self {
        Self {
            text: tag.into(),
            titles: false,
            bodies: false,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.titles || self.bodies || self.tags
    }

    /// Compiles the query, validating the pattern in regex mode.
    pub fn build(&self) -> Result<NodeFilter, SearchError> {
        let matcher = if self.regex {
            let regex = RegexBuilder::new(&self.text)
                .case_insensitive(!self.case_sensitive)
                .build()?;
            Matcher::Pattern(regex)
        } else if self.case_sensitive {
            Matcher::Exact(self.text.clone())
        } else {
            Matcher::Folded(self.text.to_lowercase())
        };

        Ok(NodeFilter {
            query: self.clone(),
            matcher,
        })
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Exact(String),
    Folded(String),
    Pattern(Regex),
}

impl Matcher {
    fn is_match(&self, haystack: &str) -> bool {
        match self {
            Matcher::Exact(needle) => haystack.contains(needle.as_str()),
            Matcher::Folded(needle) => haystack.to_lowercase().contains(needle.as_str()),
            Matcher::Pattern(regex) => regex.is_match(haystack),
        }
    }
}

/// A compiled [`SearchQuery`].
#[derive(Debug, Clone)]
pub struct NodeFilter {
    query: SearchQuery,
    matcher: Matcher,
}

impl NodeFilter {
    pub fn matches(&self, node: &Node) -> bool {
        if !self.query.is_active() {
            return true;
        }

        (self.query.titles && self.matcher.is_match(&node.title))
            || (self.query.bodies && self.matcher.is_match(&node.body))
            || (self.query.tags && self.matcher.is_match(&node.tags))
    }

    pub fn filter<'a>(&'a self, nodes: &'a [Node]) -> impl Iterator<Item = &'a Node> + 'a {
        nodes.iter().filter(move |node| self.matches(node))
    }
}
