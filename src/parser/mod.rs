//! Record accumulators for WXR contexts
//!
//! Each open context owns one accumulator. Leave events for children of the
//! context are offered to it; recognized tags fill a field, everything else
//! is ignored. Field mapping is table driven: every accumulator declares a
//! static `(vocabulary, local name) -> field` table that is consulted for
//! each leave event.

mod author;
mod channel;
mod comment;
mod image;
mod item;

pub use author::AuthorAccumulator;
pub use channel::BlogAccumulator;
pub use comment::CommentAccumulator;
pub use image::ImageAccumulator;
pub use item::ItemAccumulator;

use crate::namespace::Vocabulary;
use crate::source::Node;

/// Static mapping from a resolved tag to a record field
pub(crate) type FieldTable<F> = &'static [(Vocabulary, &'static str, F)];

/// Find the field a tag maps to
pub(crate) fn lookup<F: Copy>(table: FieldTable<F>, vocab: Vocabulary, local: &str) -> Option<F> {
    table
        .iter()
        .find(|(v, name, _)| *v == vocab && *name == local)
        .map(|(_, _, field)| *field)
}

/// Overwrite a text field with the node's text; the last occurrence wins
pub(crate) fn assign(slot: &mut Option<String>, node: &Node) {
    if slot.is_some() {
        log::trace!("<{}> repeated, keeping the later value", node.name.local);
    }
    *slot = Some(node.text.clone());
}

/// A child element that has just been left, as seen by an accumulator
#[derive(Debug, Clone, Copy)]
pub struct Leave<'a> {
    /// Vocabulary of the element
    pub vocab: Vocabulary,
    /// Local part of the element name
    pub local: &'a str,
    /// The finished element
    pub node: &'a Node,
    /// Whether the element is a direct child of the context element
    pub direct: bool,
}

impl Leave<'_> {
    /// Whether this is the given tag
    pub fn is(&self, vocab: Vocabulary, local: &str) -> bool {
        self.vocab == vocab && self.local == local
    }
}
