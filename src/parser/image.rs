//! Channel image accumulation

use super::{FieldTable, Leave, assign, lookup};
use crate::model::Image;
use crate::namespace::Vocabulary;

#[derive(Debug, Clone, Copy)]
enum ImageField {
    Title,
    Url,
    Link,
}

const IMAGE_FIELDS: FieldTable<ImageField> = &[
    (Vocabulary::Rss, "title", ImageField::Title),
    (Vocabulary::Rss, "url", ImageField::Url),
    (Vocabulary::Rss, "link", ImageField::Link),
];

/// In-progress [`Image`] for an open `image`
#[derive(Debug, Default)]
pub struct ImageAccumulator {
    image: Image,
}

impl ImageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_leave(&mut self, leave: &Leave<'_>) -> bool {
        if !leave.direct {
            return false;
        }
        let Some(field) = lookup(IMAGE_FIELDS, leave.vocab, leave.local) else {
            return false;
        };
        let slot = match field {
            ImageField::Title => &mut self.image.title,
            ImageField::Url => &mut self.image.url,
            ImageField::Link => &mut self.image.link,
        };
        assign(slot, leave.node);
        true
    }

    pub fn finish(self) -> Image {
        self.image
    }
}
