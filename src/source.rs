//! Incremental event source over an XML byte stream
//!
//! [`XmlEventSource`] tokenizes a byte stream with `quick_xml` and turns it
//! into the three events the extractor understands: a namespace was
//! declared, a node was entered, a node was left. Nodes carry their resolved
//! attributes and direct text, so a consumer never has to look at raw bytes.
//!
//! # Memory
//!
//! A node that has been left stays attached to its parent until the consumer
//! calls [`EventSource::prune`], mirroring how a tree-building parser keeps
//! finished siblings around. Pruning after every event keeps the number of
//! live nodes bounded by the nesting depth of the document rather than its
//! size.

use crate::error::{Error, Result};
use crate::namespace::QName;
use quick_xml::Reader;
use quick_xml::escape;
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;
use std::collections::VecDeque;
use std::io::BufRead;
use std::rc::Rc;

/// Default buffer capacity for XML parsing (64KB)
pub const XML_BUFFER_CAPACITY: usize = 64 * 1024;

/// A parsed element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Tag name as written in the document
    pub name: QName,
    /// Attributes in document order, values unescaped; `xmlns` declarations excluded
    pub attributes: Vec<(String, String)>,
    /// Text and CDATA content before the first child element; empty on enter events
    pub text: String,
    /// Finished children that have not been pruned yet
    pub children: Vec<Rc<Node>>,
}

impl Node {
    /// Create a node with no attributes or text
    pub fn new(raw_name: &str) -> Self {
        Self {
            name: QName::parse(raw_name),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Builder-style text setter
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Value of the attribute with the given raw name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// This node plus every retained descendant
    pub fn retained(&self) -> usize {
        1 + self.children.iter().map(|c| c.retained()).sum::<usize>()
    }
}

/// One step of the document walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// `xmlns:prefix="uri"` (or `xmlns="uri"` with an empty prefix) was seen
    ///
    /// Delivered before the [`XmlEvent::Enter`] of the declaring element.
    NamespaceDeclared {
        /// Declared prefix, empty for the default namespace
        prefix: String,
        /// Bound namespace URI
        uri: String,
    },
    /// An element start tag; the node has no text or children yet
    Enter(Rc<Node>),
    /// An element end tag; the node carries its complete direct text
    Leave(Rc<Node>),
}

/// Anything that can drive the extractor
pub trait EventSource {
    /// Pull the next event, `Ok(None)` once the document is exhausted
    fn next_event(&mut self) -> Result<Option<XmlEvent>>;

    /// Drop every finished node still attached to an open ancestor
    fn prune(&mut self);

    /// Number of nodes currently held by the source
    fn retained_nodes(&self) -> usize;
}

/// An element that has been entered but not left
#[derive(Debug)]
struct OpenNode {
    raw_name: String,
    node: Node,
    /// A child element has started; later text is inter-element content
    has_child: bool,
}

/// Event source backed by `quick_xml`
///
/// The reader runs in a lenient mode: mismatched or unmatched end tags do
/// not abort the walk, and elements still open at end of input are closed
/// implicitly.
pub struct XmlEventSource<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    open: Vec<OpenNode>,
    pending: VecDeque<XmlEvent>,
    finished: bool,
}

impl<R: BufRead> XmlEventSource<R> {
    /// Create a lenient source with the default buffer capacity
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, false, XML_BUFFER_CAPACITY)
    }

    /// Create a source with explicit reader options
    ///
    /// # Arguments
    ///
    /// * `reader` - Buffered byte stream holding the document
    /// * `check_end_names` - Fail on end tags that do not match the open element
    /// * `buffer_capacity` - Initial capacity of the event buffer
    pub fn with_options(reader: R, check_end_names: bool, buffer_capacity: usize) -> Self {
        let mut reader = Reader::from_reader(reader);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.check_end_names = check_end_names;
        config.allow_unmatched_ends = !check_end_names;

        Self {
            reader,
            buf: Vec::with_capacity(buffer_capacity),
            open: Vec::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Current byte offset in the underlying stream
    pub fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    /// Current element nesting depth
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn utf8<'a>(&self, bytes: &'a [u8]) -> Result<&'a str> {
        std::str::from_utf8(bytes)
            .map_err(|e| Error::malformed_at(self.position(), &e.to_string()))
    }

    fn enter(&mut self, start: &BytesStart<'_>) -> Result<()> {
        let raw_name = self.utf8(start.name().as_ref())?.to_string();
        let mut node = Node::new(&raw_name);

        for attr in start.attributes().with_checks(false) {
            let attr = attr?;
            let key = self.utf8(attr.key.as_ref())?.to_string();
            let raw = self.utf8(&attr.value)?;
            let value = escape::unescape(raw)
                .map_err(|e| Error::XmlAttr(format!("{}: {}", key, e)))?
                .into_owned();

            if key == "xmlns" {
                self.pending.push_back(XmlEvent::NamespaceDeclared {
                    prefix: String::new(),
                    uri: value,
                });
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                self.pending.push_back(XmlEvent::NamespaceDeclared {
                    prefix: prefix.to_string(),
                    uri: value,
                });
            } else {
                node.attributes.push((key, value));
            }
        }

        self.pending.push_back(XmlEvent::Enter(Rc::new(node.clone())));
        if let Some(parent) = self.open.last_mut() {
            parent.has_child = true;
        }
        self.open.push(OpenNode {
            raw_name,
            node,
            has_child: false,
        });
        Ok(())
    }

    fn leave(&mut self, raw_name: &str) {
        let Some(index) = self.open.iter().rposition(|open| open.raw_name == raw_name) else {
            log::debug!(
                "dropping unmatched </{}> at byte {}",
                raw_name,
                self.position()
            );
            return;
        };
        // Anything opened after the matching element was never closed
        while self.open.len() > index {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        if let Some(open) = self.open.pop() {
            let node = Rc::new(open.node);
            if let Some(parent) = self.open.last_mut() {
                parent.node.children.push(Rc::clone(&node));
            }
            self.pending.push_back(XmlEvent::Leave(node));
        }
    }

    /// Only text before the first child element counts as the node's text
    fn append_text(&mut self, text: &str) {
        if let Some(open) = self.open.last_mut().filter(|open| !open.has_child) {
            open.node.text.push_str(text);
        }
    }

    /// Read raw events until at least one `XmlEvent` is queued or input ends
    fn fill(&mut self) -> Result<()> {
        while self.pending.is_empty() && !self.finished {
            self.buf.clear();
            // Copy the event out of the buffer so `self` is free for the handlers below
            let event = self.reader.read_event_into(&mut self.buf)?.into_owned();
            match event {
                Event::Start(ref e) => self.enter(e)?,
                Event::End(ref e) => {
                    let name = self.utf8(e.name().as_ref())?.to_string();
                    self.leave(&name);
                }
                Event::Text(ref e) => {
                    let raw = self.utf8(e)?;
                    let text = escape::unescape(raw).unwrap_or(Cow::Borrowed(raw)).into_owned();
                    self.append_text(&text);
                }
                Event::CData(ref e) => {
                    let text = self.utf8(e)?.to_string();
                    self.append_text(&text);
                }
                Event::GeneralRef(ref e) => {
                    let raw = format!("&{};", self.utf8(e)?);
                    let text = match escape::unescape(&raw) {
                        Ok(resolved) => resolved.into_owned(),
                        Err(_) => raw,
                    };
                    self.append_text(&text);
                }
                Event::Eof => {
                    if !self.open.is_empty() {
                        log::debug!(
                            "end of input with {} open element(s), closing them",
                            self.open.len()
                        );
                    }
                    while !self.open.is_empty() {
                        self.close_top();
                    }
                    self.finished = true;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl<R: BufRead> EventSource for XmlEventSource<R> {
    fn next_event(&mut self) -> Result<Option<XmlEvent>> {
        if self.pending.is_empty() {
            if let Err(e) = self.fill() {
                self.finished = true;
                self.open.clear();
                return Err(e);
            }
        }
        Ok(self.pending.pop_front())
    }

    fn prune(&mut self) {
        for open in &mut self.open {
            open.node.children.clear();
        }
    }

    fn retained_nodes(&self) -> usize {
        self.open.iter().map(|open| open.node.retained()).sum()
    }
}

/// Event source replaying a prepared event sequence
///
/// Useful for driving the extractor with sequences a real reader would never
/// produce, such as closes without matching opens.
#[derive(Debug, Default)]
pub struct ReplaySource {
    events: VecDeque<XmlEvent>,
}

impl ReplaySource {
    /// Wrap a sequence of events
    pub fn new(events: impl IntoIterator<Item = XmlEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl EventSource for ReplaySource {
    fn next_event(&mut self) -> Result<Option<XmlEvent>> {
        Ok(self.events.pop_front())
    }

    fn prune(&mut self) {}

    fn retained_nodes(&self) -> usize {
        0
    }
}
