//! Namespace handling for WXR documents
//!
//! Exports mix plain RSS elements with several namespaced vocabularies. Tags
//! are resolved once, when an event arrives, into an [`ExpandedName`] and then
//! classified into a [`Vocabulary`] so the rest of the extractor can compare
//! names structurally instead of building `prefix:local` strings.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Dublin Core elements namespace
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
/// RSS content module namespace
pub const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";
/// Apple podcast namespace
pub const ITUNES_NAMESPACE: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";
/// Common prefix of every WXR version namespace (`.../1.0/`, `.../1.1/`, `.../1.2/`)
pub const WP_NAMESPACE_BASE: &str = "http://wordpress.org/export/";

/// Vocabulary a resolved element name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    /// Unqualified RSS elements (`channel`, `item`, `title`, ...)
    Rss,
    /// WordPress export fields (`wp:`)
    Wp,
    /// Dublin Core (`dc:`)
    Dc,
    /// RSS content module (`content:`)
    Content,
    /// WordPress excerpt (`excerpt:`)
    Excerpt,
    /// Podcast metadata (`itunes:`)
    Itunes,
    /// Any other namespace
    Other,
}

impl Vocabulary {
    /// Prefix conventionally bound to this vocabulary in exports
    pub fn conventional_prefix(&self) -> Option<&'static str> {
        match self {
            Vocabulary::Wp => Some("wp"),
            Vocabulary::Dc => Some("dc"),
            Vocabulary::Content => Some("content"),
            Vocabulary::Excerpt => Some("excerpt"),
            Vocabulary::Itunes => Some("itunes"),
            Vocabulary::Rss | Vocabulary::Other => None,
        }
    }

    /// Classify a namespace URI without consulting document bindings
    pub fn from_namespace(uri: &str) -> Self {
        match uri {
            DC_NAMESPACE => Vocabulary::Dc,
            CONTENT_NAMESPACE => Vocabulary::Content,
            ITUNES_NAMESPACE => Vocabulary::Itunes,
            // The excerpt namespace lives under the WXR base, check it first
            _ if uri.starts_with(WP_NAMESPACE_BASE)
                && uri.trim_end_matches('/').ends_with("/excerpt") =>
            {
                Vocabulary::Excerpt
            }
            _ if uri.starts_with(WP_NAMESPACE_BASE) => Vocabulary::Wp,
            _ => Vocabulary::Other,
        }
    }

    const PREFIXED: [Vocabulary; 5] = [
        Vocabulary::Wp,
        Vocabulary::Dc,
        Vocabulary::Content,
        Vocabulary::Excerpt,
        Vocabulary::Itunes,
    ];
}

/// A tag name as written in the document, split at the first colon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    /// Prefix before the colon, if any
    pub prefix: Option<String>,
    /// Local part of the name
    pub local: String,
}

impl QName {
    /// Split a raw `prefix:local` name
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((prefix, local)) => Self {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            None => Self {
                prefix: None,
                local: raw.to_string(),
            },
        }
    }
}

/// A name resolved to its namespace URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedName {
    /// Namespace URI, `None` for unqualified names
    pub namespace: Option<String>,
    /// Local part of the name
    pub local: String,
}

/// Mapping from namespace prefix to namespace URI
///
/// Bindings are only ever added or overwritten, never removed. The default
/// namespace (`xmlns="..."`) is stored under the empty prefix.
#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    bindings: HashMap<String, String>,
}

impl NamespaceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `uri`, replacing any earlier binding
    pub fn register(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        let prefix = prefix.into();
        let uri = uri.into();
        log::trace!("namespace {:?} -> {}", prefix, uri);
        self.bindings.insert(prefix, uri);
    }

    /// Look up the URI bound to `prefix`
    pub fn resolve(&self, prefix: &str) -> Result<&str> {
        self.bindings
            .get(prefix)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownPrefix(prefix.to_string()))
    }

    /// Number of bound prefixes
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no prefix has been bound yet
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Resolve a raw name against the current bindings
    ///
    /// A prefix that was never declared does not fail: the name is treated
    /// as unqualified, keeping only its local part.
    pub fn expand(&self, name: &QName) -> ExpandedName {
        let namespace = match &name.prefix {
            Some(prefix) => match self.resolve(prefix) {
                Ok(uri) => Some(uri.to_string()),
                Err(e) => {
                    log::debug!("{}; treating <{}> as unqualified", e, name.local);
                    None
                }
            },
            None => self.resolve("").ok().map(str::to_string),
        };
        ExpandedName {
            namespace,
            local: name.local.clone(),
        }
    }

    /// Decide which vocabulary an expanded name belongs to
    ///
    /// The document's own bindings for the conventional prefixes win, so an
    /// export that binds `wp` to an unusual URI still matches. Unknown URIs
    /// fall back to [`Vocabulary::from_namespace`].
    pub fn vocabulary(&self, name: &ExpandedName) -> Vocabulary {
        let Some(uri) = name.namespace.as_deref() else {
            return Vocabulary::Rss;
        };
        if self.resolve("").is_ok_and(|default| default == uri) {
            return Vocabulary::Rss;
        }
        Vocabulary::PREFIXED
            .into_iter()
            .find(|vocab| {
                vocab
                    .conventional_prefix()
                    .and_then(|prefix| self.resolve(prefix).ok())
                    .is_some_and(|bound| bound == uri)
            })
            .unwrap_or_else(|| Vocabulary::from_namespace(uri))
    }

    /// Resolve and classify a raw name in one step
    pub fn classify(&self, name: &QName) -> (Vocabulary, ExpandedName) {
        let expanded = self.expand(name);
        (self.vocabulary(&expanded), expanded)
    }
}
