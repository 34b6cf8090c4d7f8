//! Consumers of extracted records
//!
//! The extractor hands every completed record to a [`Handler`], one callback
//! per record kind, in the order the records' contexts close. Handlers decide
//! what happens next: printing, storing, filtering, queueing. Every method
//! has a no-op default, so an implementation only overrides the record kinds
//! it cares about.
//!
//! # Example
//!
//! ```
//! use wxrtools::handler::{Handler, HandlerResult};
//! use wxrtools::Item;
//!
//! /// Collect the titles of published posts
//! #[derive(Default)]
//! struct PublishedTitles(Vec<String>);
//!
//! impl Handler for PublishedTitles {
//!     fn on_item(&mut self, item: Item) -> HandlerResult {
//!         if item.is_published() {
//!             self.0.extend(item.title);
//!         }
//!         Ok(())
//!     }
//! }
//! ```

use crate::error::{Error, HandlerError, Result};
use crate::model::{Author, Blog, Image, Item, ItunesMetadata};
use std::io::{self, Write};

/// Return type of every handler callback
pub type HandlerResult = std::result::Result<(), HandlerError>;

/// Receiver of completed records
///
/// Returning an error from any callback stops extraction immediately; the
/// error reaches the caller as [`Error::Handler`].
pub trait Handler {
    /// A `wp:author` element closed
    fn on_author(&mut self, _author: Author) -> HandlerResult {
        Ok(())
    }

    /// A channel `image` element closed
    fn on_image(&mut self, _image: Image) -> HandlerResult {
        Ok(())
    }

    /// The channel closed and carried podcast metadata
    ///
    /// Called right before [`Handler::on_blog`] with the same mapping that
    /// ends up in [`Blog::itunes`].
    fn on_itunes(&mut self, _itunes: &ItunesMetadata) -> HandlerResult {
        Ok(())
    }

    /// The channel closed
    fn on_blog(&mut self, _blog: Blog) -> HandlerResult {
        Ok(())
    }

    /// An `item` element closed
    fn on_item(&mut self, _item: Item) -> HandlerResult {
        Ok(())
    }

    /// Extraction finished (end of document or item limit reached)
    fn on_end(&mut self) -> HandlerResult {
        Ok(())
    }
}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn on_author(&mut self, author: Author) -> HandlerResult {
        (**self).on_author(author)
    }

    fn on_image(&mut self, image: Image) -> HandlerResult {
        (**self).on_image(image)
    }

    fn on_itunes(&mut self, itunes: &ItunesMetadata) -> HandlerResult {
        (**self).on_itunes(itunes)
    }

    fn on_blog(&mut self, blog: Blog) -> HandlerResult {
        (**self).on_blog(blog)
    }

    fn on_item(&mut self, item: Item) -> HandlerResult {
        (**self).on_item(item)
    }

    fn on_end(&mut self) -> HandlerResult {
        (**self).on_end()
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn on_author(&mut self, author: Author) -> HandlerResult {
        (**self).on_author(author)
    }

    fn on_image(&mut self, image: Image) -> HandlerResult {
        (**self).on_image(image)
    }

    fn on_itunes(&mut self, itunes: &ItunesMetadata) -> HandlerResult {
        (**self).on_itunes(itunes)
    }

    fn on_blog(&mut self, blog: Blog) -> HandlerResult {
        (**self).on_blog(blog)
    }

    fn on_item(&mut self, item: Item) -> HandlerResult {
        (**self).on_item(item)
    }

    fn on_end(&mut self) -> HandlerResult {
        (**self).on_end()
    }
}

/// Handler that ignores every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl Handler for NoopHandler {}

/// Handler that writes one debug line per record
#[derive(Debug)]
pub struct PrintHandler<W: Write> {
    out: W,
}

impl PrintHandler<io::Stdout> {
    /// Print to standard output
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> PrintHandler<W> {
    /// Print to any writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Handler for PrintHandler<W> {
    fn on_author(&mut self, author: Author) -> HandlerResult {
        writeln!(self.out, "{:?}", author)?;
        Ok(())
    }

    fn on_image(&mut self, image: Image) -> HandlerResult {
        writeln!(self.out, "{:?}", image)?;
        Ok(())
    }

    fn on_itunes(&mut self, itunes: &ItunesMetadata) -> HandlerResult {
        writeln!(self.out, "Itunes {:?}", itunes)?;
        Ok(())
    }

    fn on_blog(&mut self, blog: Blog) -> HandlerResult {
        writeln!(self.out, "{:?}", blog)?;
        Ok(())
    }

    fn on_item(&mut self, item: Item) -> HandlerResult {
        writeln!(self.out, "{:?}", item)?;
        Ok(())
    }

    fn on_end(&mut self) -> HandlerResult {
        self.out.flush()?;
        Ok(())
    }
}

/// Number of records seen per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub blogs: usize,
    pub authors: usize,
    pub images: usize,
    pub itunes: usize,
    pub items: usize,
}

/// Handler that counts records and writes a summary at the end
#[derive(Debug)]
pub struct CountingHandler<W: Write> {
    counts: RecordCounts,
    /// Items per `wp:post_type`, in first-seen order
    post_types: Vec<(String, usize)>,
    out: W,
}

impl<W: Write> CountingHandler<W> {
    /// Count records, writing the summary to `out`
    pub fn new(out: W) -> Self {
        Self {
            counts: RecordCounts::default(),
            post_types: Vec::new(),
            out,
        }
    }

    /// Counts so far
    pub fn counts(&self) -> RecordCounts {
        self.counts
    }

    /// Items per post type so far
    pub fn post_types(&self) -> &[(String, usize)] {
        &self.post_types
    }
}

impl<W: Write> Handler for CountingHandler<W> {
    fn on_author(&mut self, _author: Author) -> HandlerResult {
        self.counts.authors += 1;
        Ok(())
    }

    fn on_image(&mut self, _image: Image) -> HandlerResult {
        self.counts.images += 1;
        Ok(())
    }

    fn on_itunes(&mut self, _itunes: &ItunesMetadata) -> HandlerResult {
        self.counts.itunes += 1;
        Ok(())
    }

    fn on_blog(&mut self, _blog: Blog) -> HandlerResult {
        self.counts.blogs += 1;
        Ok(())
    }

    fn on_item(&mut self, item: Item) -> HandlerResult {
        self.counts.items += 1;
        let post_type = item.post_type.unwrap_or_default();
        let seen = self.post_types.iter().position(|(t, _)| *t == post_type);
        match seen {
            Some(i) => self.post_types[i].1 += 1,
            None => self.post_types.push((post_type, 1)),
        }
        Ok(())
    }

    fn on_end(&mut self) -> HandlerResult {
        let c = self.counts;
        writeln!(
            self.out,
            "blogs: {}, authors: {}, images: {}, items: {}",
            c.blogs, c.authors, c.images, c.items
        )?;
        for (post_type, n) in &self.post_types {
            let label = if post_type.is_empty() { "(none)" } else { post_type.as_str() };
            writeln!(self.out, "  {}: {}", label, n)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// A record as delivered to a handler
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Author(Author),
    Image(Image),
    Itunes(ItunesMetadata),
    Blog(Blog),
    Item(Item),
}

/// Handler that buffers every record in delivery order
#[derive(Debug, Clone, Default)]
pub struct CollectingHandler {
    pub records: Vec<Record>,
}

impl CollectingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffered items, in document order
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.records.iter().filter_map(|r| match r {
            Record::Item(item) => Some(item),
            _ => None,
        })
    }

    /// Buffered authors, in document order
    pub fn authors(&self) -> impl Iterator<Item = &Author> {
        self.records.iter().filter_map(|r| match r {
            Record::Author(author) => Some(author),
            _ => None,
        })
    }

    /// Buffered images, in document order
    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.records.iter().filter_map(|r| match r {
            Record::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Buffered blogs, in document order
    pub fn blogs(&self) -> impl Iterator<Item = &Blog> {
        self.records.iter().filter_map(|r| match r {
            Record::Blog(blog) => Some(blog),
            _ => None,
        })
    }
}

impl Handler for CollectingHandler {
    fn on_author(&mut self, author: Author) -> HandlerResult {
        self.records.push(Record::Author(author));
        Ok(())
    }

    fn on_image(&mut self, image: Image) -> HandlerResult {
        self.records.push(Record::Image(image));
        Ok(())
    }

    fn on_itunes(&mut self, itunes: &ItunesMetadata) -> HandlerResult {
        self.records.push(Record::Itunes(itunes.clone()));
        Ok(())
    }

    fn on_blog(&mut self, blog: Blog) -> HandlerResult {
        self.records.push(Record::Blog(blog));
        Ok(())
    }

    fn on_item(&mut self, item: Item) -> HandlerResult {
        self.records.push(Record::Item(item));
        Ok(())
    }
}

/// Names accepted by [`handler_by_name`]
pub const HANDLER_NAMES: &[&str] = &["print", "count", "noop"];

/// Build one of the built-in handlers writing to standard output
pub fn handler_by_name(name: &str) -> Result<Box<dyn Handler>> {
    match name {
        "print" => Ok(Box::new(PrintHandler::stdout())),
        "count" => Ok(Box::new(CountingHandler::new(io::stdout()))),
        "noop" => Ok(Box::new(NoopHandler)),
        other => Err(Error::UnknownHandler(other.to_string())),
    }
}
