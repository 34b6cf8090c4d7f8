//! Author (`wp:author`) accumulation

use super::{FieldTable, Leave, assign, lookup};
use crate::model::Author;
use crate::namespace::Vocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthorField {
    Id,
    Login,
    Email,
    DisplayName,
    FirstName,
    LastName,
}

const AUTHOR_FIELDS: FieldTable<AuthorField> = &[
    (Vocabulary::Wp, "author_id", AuthorField::Id),
    (Vocabulary::Wp, "author_login", AuthorField::Login),
    (Vocabulary::Wp, "author_email", AuthorField::Email),
    (Vocabulary::Wp, "author_display_name", AuthorField::DisplayName),
    (Vocabulary::Wp, "author_first_name", AuthorField::FirstName),
    (Vocabulary::Wp, "author_last_name", AuthorField::LastName),
];

/// In-progress [`Author`] for an open `wp:author`
///
/// `wp:base_blog_url` and `wp:base_site_url` may also appear inside an
/// author element; those belong to the blog and are not handled here.
#[derive(Debug, Default)]
pub struct AuthorAccumulator {
    author: Author,
}

impl AuthorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a finished child element; returns whether it was used
    pub fn on_leave(&mut self, leave: &Leave<'_>) -> bool {
        let Some(field) = lookup(AUTHOR_FIELDS, leave.vocab, leave.local) else {
            return false;
        };
        let slot = match field {
            AuthorField::Id => &mut self.author.id,
            AuthorField::Login => &mut self.author.login,
            AuthorField::Email => &mut self.author.email,
            AuthorField::DisplayName => &mut self.author.display_name,
            AuthorField::FirstName => &mut self.author.first_name,
            AuthorField::LastName => &mut self.author.last_name,
        };
        assign(slot, leave.node);
        true
    }

    pub fn finish(self) -> Author {
        self.author
    }
}
