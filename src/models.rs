//! Data models shared by every source, the pipeline, and the renderers.
//!
//! - [`CanonicalItem`]: one link after source-specific normalization
//! - [`Section`]: the items one source produced in one run
//! - [`SourceKind`]: a tagged descriptor naming which source to ask
//! - [`FetchRequest`]: a [`SourceKind`] plus how many items to ask it for

use std::fmt;

/// A single entry in the digest.
///
/// `comments_url` is set by sources that have a discussion thread (Hacker News,
/// Reddit) and left empty by plain news feeds. Renderers show an extra link when
/// it is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalItem {
    title: String,
    url: String,
    comments_url: Option<String>,
}

impl CanonicalItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            comments_url: None,
        }
    }

    pub fn with_comments(
        title: impl Into<String>,
        url: impl Into<String>,
        comments_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            comments_url: Some(comments_url.into()),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn comments_url(&self) -> Option<&str> {
        self.comments_url.as_deref()
    }
}

/// The normalized output of one source for one run.
///
/// Items keep the order the source returned them in, except for sources that
/// fetch items concurrently, where the order is whatever finished first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub items: Vec<CanonicalItem>,
}

impl Section {
    pub fn new(name: impl Into<String>, items: Vec<CanonicalItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

/// Which source a fetch task talks to.
///
/// The task list for a run is a plain `Vec` of these, built once at start-up from
/// the CLI and the optional config file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKind {
    HackerNews,
    NewYorkTimes,
    /// One subreddit's top posts of the day.
    Reddit { subreddit: String },
    /// One outlet from the News API, named by its source id.
    NewsApi { source: String },
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::HackerNews => write!(f, "hacker-news"),
            SourceKind::NewYorkTimes => write!(f, "new-york-times"),
            SourceKind::Reddit { subreddit } => write!(f, "reddit/{subreddit}"),
            SourceKind::NewsApi { source } => write!(f, "news-api/{source}"),
        }
    }
}

/// Parameters for a single adapter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub source: SourceKind,
    /// How many items to ask for. Sources may return fewer.
    pub count: usize,
}

impl FetchRequest {
    pub fn new(source: SourceKind, count: usize) -> Self {
        Self { source, count }
    }
}
