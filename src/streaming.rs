//! Streaming extraction engine
//!
//! [`Extractor`] pulls events from an [`EventSource`] one at a time, feeds
//! them through the namespace registry and the context stack, and hands each
//! record to the [`Handler`] as soon as its context closes. After every
//! event the source is told to prune consumed nodes, so memory stays
//! proportional to nesting depth even for multi-gigabyte exports.
//!
//! The extractor keeps its own stack of open elements. A close that matches
//! no open element is counted and dropped without touching the nesting; a
//! close that matches an outer element first closes everything still open
//! inside it.
//!
//! # Example
//!
//! ```
//! use wxrtools::handler::CollectingHandler;
//! use wxrtools::streaming::Extractor;
//! use wxrtools::ExtractorConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let xml = r#"<rss xmlns:wp="http://wordpress.org/export/1.2/">
//!   <channel>
//!     <title>Example</title>
//!     <item><title>Hello</title><wp:status>publish</wp:status></item>
//!   </channel>
//! </rss>"#;
//!
//! let mut collector = CollectingHandler::new();
//! let stats =
//!     Extractor::from_reader(xml.as_bytes(), &mut collector, &ExtractorConfig::new()).run()?;
//!
//! assert_eq!(stats.items, 1);
//! assert_eq!(collector.items().next().unwrap().title.as_deref(), Some("Hello"));
//! # Ok(())
//! # }
//! ```

use crate::config::{ExtractorConfig, RepairConfig};
use crate::context::{Completed, ContextKind, ContextStack, LeaveOutcome};
use crate::error::{Error, Result};
use crate::handler::Handler;
use crate::namespace::NamespaceRegistry;
use crate::repair::open_export;
use crate::source::{EventSource, Node, XmlEvent, XmlEventSource};
use std::io::BufRead;
use std::path::Path;
use std::rc::Rc;

/// Summary of an extraction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Events pulled from the source
    pub events: usize,
    /// Blog records delivered
    pub blogs: usize,
    /// Author records delivered
    pub authors: usize,
    /// Image records delivered
    pub images: usize,
    /// Times the podcast metadata callback fired
    pub itunes: usize,
    /// Item records delivered
    pub items: usize,
    /// Comments attached to items
    pub comments: usize,
    /// Close events that ended nothing: stray closes with no open element,
    /// and context tags closed outside their own context
    pub ignored_closes: usize,
    /// Highest number of nodes the source held at once
    pub peak_retained_nodes: usize,
}

/// Event-driven extractor for one document
///
/// An extractor is single-use: once the source is exhausted, the item limit
/// is reached or an error occurs, further calls to [`Extractor::step`]
/// return `Ok(false)`.
pub struct Extractor<S: EventSource, H: Handler> {
    source: S,
    handler: H,
    registry: NamespaceRegistry,
    contexts: ContextStack,
    open: Vec<Rc<Node>>,
    prune: bool,
    limit: Option<usize>,
    stats: ExtractionStats,
    done: bool,
}

impl<R: BufRead, H: Handler> Extractor<XmlEventSource<R>, H> {
    /// Extract from a buffered byte stream holding a WXR document
    ///
    /// # Arguments
    ///
    /// * `reader` - The document, already repaired if necessary
    /// * `handler` - Receiver of completed records
    /// * `config` - Reader leniency, pruning and item limit
    pub fn from_reader(reader: R, handler: H, config: &ExtractorConfig) -> Self {
        let source = XmlEventSource::with_options(
            reader,
            config.check_end_names(),
            config.buffer_capacity(),
        );
        Self::with_config(source, handler, config)
    }
}

impl<S: EventSource, H: Handler> Extractor<S, H> {
    /// Drive `handler` from `source` with the default configuration
    pub fn new(source: S, handler: H) -> Self {
        Self::with_config(source, handler, &ExtractorConfig::default())
    }

    /// Drive `handler` from `source`
    ///
    /// Only the pruning and limit settings of `config` apply; reader options
    /// belong to the source.
    pub fn with_config(source: S, handler: H, config: &ExtractorConfig) -> Self {
        Self {
            source,
            handler,
            registry: NamespaceRegistry::new(),
            contexts: ContextStack::new(),
            open: Vec::new(),
            prune: config.prune(),
            limit: config.limit(),
            stats: ExtractionStats::default(),
            done: false,
        }
    }

    /// Statistics so far
    pub fn stats(&self) -> ExtractionStats {
        self.stats
    }

    /// Namespace bindings seen so far
    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    /// Kind of the innermost open context, `None` at the root
    pub fn current_context(&self) -> Option<ContextKind> {
        self.contexts.current()
    }

    /// The handler
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Consume the extractor and return the handler
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Process a single event
    ///
    /// Returns `Ok(true)` while more events may follow. The caller may stop
    /// calling at any time; dropping the extractor releases the source.
    pub fn step(&mut self) -> Result<bool> {
        if self.done {
            return Ok(false);
        }
        let result = self.advance();
        if result.is_err() {
            self.done = true;
        }
        result
    }

    /// Process events until the document is exhausted or the limit is hit
    pub fn run(mut self) -> Result<ExtractionStats> {
        while self.step()? {}
        Ok(self.stats)
    }

    fn advance(&mut self) -> Result<bool> {
        let Some(event) = self.source.next_event()? else {
            self.finish()?;
            return Ok(false);
        };
        self.stats.events += 1;

        match event {
            XmlEvent::NamespaceDeclared { prefix, uri } => self.registry.register(prefix, uri),
            XmlEvent::Enter(node) => {
                let (vocab, name) = self.registry.classify(&node.name);
                self.open.push(node);
                self.contexts.enter(vocab, &name.local, self.open.len());
            }
            XmlEvent::Leave(node) => self.close(node)?,
        }

        if self.prune {
            self.source.prune();
        }
        self.stats.peak_retained_nodes = self
            .stats
            .peak_retained_nodes
            .max(self.source.retained_nodes());

        if self.limit.is_some_and(|limit| self.stats.items >= limit) {
            log::info!("item limit reached after {} events", self.stats.events);
            self.finish()?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Close the open element `node` ends, and any left open inside it
    ///
    /// A close that matches no open element leaves the nesting untouched.
    fn close(&mut self, node: Rc<Node>) -> Result<()> {
        let Some(index) = self.open.iter().rposition(|open| open.name == node.name) else {
            log::debug!("ignoring stray close of <{}>", node.name.local);
            self.stats.ignored_closes += 1;
            return Ok(());
        };
        let unclosed: Vec<_> = self.open.drain(index + 1..).collect();
        for (offset, inner) in unclosed.iter().enumerate().rev() {
            log::debug!("implicitly closing <{}>", inner.name.local);
            self.leave_at(inner, index + 2 + offset)?;
        }
        self.leave_at(&node, index + 1)?;
        self.open.truncate(index);
        Ok(())
    }

    fn leave_at(&mut self, node: &Node, depth: usize) -> Result<()> {
        let (vocab, name) = self.registry.classify(&node.name);
        let outcome = self.contexts.leave(vocab, &name.local, node, depth);
        if matches!(outcome, LeaveOutcome::Ignored)
            && ContextKind::from_tag(vocab, &name.local).is_some()
        {
            self.stats.ignored_closes += 1;
        }
        self.dispatch(outcome)
    }

    fn dispatch(&mut self, outcome: LeaveOutcome) -> Result<()> {
        match outcome {
            LeaveOutcome::Emitted(Completed::Blog(blog)) => {
                if !blog.itunes.is_empty() {
                    self.handler
                        .on_itunes(&blog.itunes)
                        .map_err(|e| Error::handler("itunes", e))?;
                    self.stats.itunes += 1;
                }
                self.handler
                    .on_blog(blog)
                    .map_err(|e| Error::handler("blog", e))?;
                self.stats.blogs += 1;
            }
            LeaveOutcome::Emitted(Completed::Author(author)) => {
                self.handler
                    .on_author(author)
                    .map_err(|e| Error::handler("author", e))?;
                self.stats.authors += 1;
            }
            LeaveOutcome::Emitted(Completed::Image(image)) => {
                self.handler
                    .on_image(image)
                    .map_err(|e| Error::handler("image", e))?;
                self.stats.images += 1;
            }
            LeaveOutcome::Emitted(Completed::Item(item)) => {
                self.handler
                    .on_item(item)
                    .map_err(|e| Error::handler("item", e))?;
                self.stats.items += 1;
            }
            LeaveOutcome::Closed(ContextKind::Comment) => self.stats.comments += 1,
            LeaveOutcome::Closed(_) | LeaveOutcome::Filled | LeaveOutcome::Ignored => {}
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.done {
            return Ok(());
        }
        self.done = true;
        if !self.contexts.is_empty() {
            log::debug!(
                "input ended with {:?} still open, partial record discarded",
                self.contexts.current()
            );
        }
        let s = &self.stats;
        log::info!(
            "extracted {} blog(s), {} author(s), {} image(s), {} item(s) from {} events",
            s.blogs,
            s.authors,
            s.images,
            s.items,
            s.events
        );
        self.handler
            .on_end()
            .map_err(|e| Error::handler("end of document", e))
    }
}

/// Repair (if enabled) and extract an export file
///
/// The repaired stream is owned by this call and released on every exit
/// path, including handler errors and early termination at the item limit.
pub fn extract_path<H: Handler>(
    path: &Path,
    handler: H,
    repair: &RepairConfig,
    config: &ExtractorConfig,
) -> Result<ExtractionStats> {
    let reader = open_export(path, repair)?;
    Extractor::from_reader(reader, handler, config).run()
}
