//! Context stack driving the extraction state machine
//!
//! The stack starts empty (the implicit root). `channel` is only recognized
//! at the root; `wp:author`, `image` and `item` only directly under an open
//! channel context; `wp:comment` only under an open item. Every push
//! allocates a fresh accumulator and every pop finalizes it, so no record
//! state outlives its context.
//!
//! A frame remembers the element depth it was opened at. A leave event only
//! closes the frame when both tag and depth match, so stray or nested tags in
//! malformed input never close the wrong context.

use crate::model::{Author, Blog, Image, Item};
use crate::namespace::Vocabulary;
use crate::parser::{
    AuthorAccumulator, BlogAccumulator, CommentAccumulator, ImageAccumulator, ItemAccumulator,
    Leave,
};
use crate::source::Node;

/// Kind of parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Channel,
    Author,
    Image,
    Item,
    Comment,
}

impl ContextKind {
    /// The tag that opens and closes this context
    pub fn tag(&self) -> (Vocabulary, &'static str) {
        match self {
            ContextKind::Channel => (Vocabulary::Rss, "channel"),
            ContextKind::Author => (Vocabulary::Wp, "author"),
            ContextKind::Image => (Vocabulary::Rss, "image"),
            ContextKind::Item => (Vocabulary::Rss, "item"),
            ContextKind::Comment => (Vocabulary::Wp, "comment"),
        }
    }

    /// The context opened and closed by the given tag, wherever it appears
    pub fn from_tag(vocab: Vocabulary, local: &str) -> Option<ContextKind> {
        Self::ALL.into_iter().find(|kind| kind.tag() == (vocab, local))
    }

    const ALL: [ContextKind; 5] = [
        ContextKind::Channel,
        ContextKind::Author,
        ContextKind::Image,
        ContextKind::Item,
        ContextKind::Comment,
    ];

    /// The context a tag opens when the given context is on top
    fn child(
        parent: Option<ContextKind>,
        vocab: Vocabulary,
        local: &str,
    ) -> Option<ContextKind> {
        let candidates: &[ContextKind] = match parent {
            None => &[ContextKind::Channel],
            Some(ContextKind::Channel) => {
                &[ContextKind::Author, ContextKind::Image, ContextKind::Item]
            }
            Some(ContextKind::Item) => &[ContextKind::Comment],
            Some(_) => &[],
        };
        candidates
            .iter()
            .copied()
            .find(|kind| kind.tag() == (vocab, local))
    }
}

/// A record finalized by closing its context
#[derive(Debug, Clone, PartialEq)]
pub enum Completed {
    Blog(Blog),
    Author(Author),
    Image(Image),
    Item(Item),
}

#[derive(Debug)]
enum Accumulator {
    Channel(BlogAccumulator),
    Author(AuthorAccumulator),
    Image(ImageAccumulator),
    Item(ItemAccumulator),
    Comment(CommentAccumulator),
}

impl Accumulator {
    fn new(kind: ContextKind) -> Self {
        match kind {
            ContextKind::Channel => Accumulator::Channel(BlogAccumulator::new()),
            ContextKind::Author => Accumulator::Author(AuthorAccumulator::new()),
            ContextKind::Image => Accumulator::Image(ImageAccumulator::new()),
            ContextKind::Item => Accumulator::Item(ItemAccumulator::new()),
            ContextKind::Comment => Accumulator::Comment(CommentAccumulator::new()),
        }
    }

    fn kind(&self) -> ContextKind {
        match self {
            Accumulator::Channel(_) => ContextKind::Channel,
            Accumulator::Author(_) => ContextKind::Author,
            Accumulator::Image(_) => ContextKind::Image,
            Accumulator::Item(_) => ContextKind::Item,
            Accumulator::Comment(_) => ContextKind::Comment,
        }
    }
}

#[derive(Debug)]
struct Frame {
    depth: usize,
    acc: Accumulator,
}

/// Outcome of offering a leave event to the stack
#[derive(Debug)]
pub enum LeaveOutcome {
    /// A context closed and produced a record for the handler
    Emitted(Completed),
    /// A context closed without producing a standalone record
    Closed(ContextKind),
    /// A field of the active record was filled
    Filled,
    /// The event did not apply to the active context
    Ignored,
}

/// Stack of open parsing contexts
#[derive(Debug, Default)]
pub struct ContextStack {
    frames: Vec<Frame>,
}

impl ContextStack {
    /// Create an empty stack (root state)
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind of the context on top, `None` at the root
    pub fn current(&self) -> Option<ContextKind> {
        self.frames.last().map(|f| f.acc.kind())
    }

    /// Number of open contexts
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the stack is at the root
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Handle an element start at `depth`; returns the context pushed, if any
    pub fn enter(&mut self, vocab: Vocabulary, local: &str, depth: usize) -> Option<ContextKind> {
        let kind = ContextKind::child(self.current(), vocab, local)?;
        log::debug!("push {:?} at depth {}", kind, depth);
        self.frames.push(Frame {
            depth,
            acc: Accumulator::new(kind),
        });
        Some(kind)
    }

    /// Handle an element end at `depth`
    pub fn leave(
        &mut self,
        vocab: Vocabulary,
        local: &str,
        node: &Node,
        depth: usize,
    ) -> LeaveOutcome {
        let Some(top) = self.frames.last_mut() else {
            if ContextKind::from_tag(vocab, local).is_some() {
                log::debug!("</{}> with no open context, ignored", local);
            }
            return LeaveOutcome::Ignored;
        };

        let kind = top.acc.kind();
        if kind.tag() == (vocab, local) && top.depth == depth {
            return self.pop();
        }

        let leave = Leave {
            vocab,
            local,
            node,
            direct: depth == top.depth + 1,
        };
        let mut used = match &mut top.acc {
            Accumulator::Channel(blog) => blog.on_leave(&leave),
            Accumulator::Author(author) => author.on_leave(&leave),
            Accumulator::Image(image) => image.on_leave(&leave),
            Accumulator::Item(item) => item.on_leave(&leave),
            Accumulator::Comment(comment) => comment.on_leave(&leave),
        };
        if !used && kind == ContextKind::Author {
            used = self.set_blog_site_field(&leave);
        }

        if used {
            log::trace!("{:?} <- {}", kind, local);
            LeaveOutcome::Filled
        } else {
            if ContextKind::from_tag(vocab, local).is_some() {
                log::debug!("</{}> does not close {:?}, ignored", local, kind);
            }
            LeaveOutcome::Ignored
        }
    }

    /// Route `wp:base_blog_url`/`wp:base_site_url` seen inside an author to the blog
    fn set_blog_site_field(&mut self, leave: &Leave<'_>) -> bool {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|f| match &mut f.acc {
                Accumulator::Channel(blog) => Some(blog),
                _ => None,
            })
            .is_some_and(|blog| blog.set_site_field(leave))
    }

    fn pop(&mut self) -> LeaveOutcome {
        let Some(frame) = self.frames.pop() else {
            return LeaveOutcome::Ignored;
        };
        log::debug!("pop {:?} at depth {}", frame.acc.kind(), frame.depth);
        match frame.acc {
            Accumulator::Channel(blog) => LeaveOutcome::Emitted(Completed::Blog(blog.finish())),
            Accumulator::Author(author) => {
                LeaveOutcome::Emitted(Completed::Author(author.finish()))
            }
            Accumulator::Image(image) => LeaveOutcome::Emitted(Completed::Image(image.finish())),
            Accumulator::Item(item) => LeaveOutcome::Emitted(Completed::Item(item.finish())),
            Accumulator::Comment(comment) => {
                let comment = comment.finish();
                if let Some(Frame {
                    acc: Accumulator::Item(item),
                    ..
                }) = self.frames.last_mut()
                {
                    item.push_comment(comment);
                }
                LeaveOutcome::Closed(ContextKind::Comment)
            }
        }
    }
}
