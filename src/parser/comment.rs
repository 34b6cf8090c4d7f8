//! Comment (`wp:comment`) accumulation

use super::{FieldTable, Leave, assign, lookup};
use crate::model::Comment;
use crate::namespace::Vocabulary;

#[derive(Debug, Clone, Copy)]
enum CommentField {
    Id,
    Author,
    AuthorEmail,
    AuthorUrl,
    AuthorIp,
    Date,
    DateGmt,
    Content,
    Approved,
    Type,
    Parent,
    UserId,
}

const COMMENT_FIELDS: FieldTable<CommentField> = &[
    (Vocabulary::Wp, "comment_id", CommentField::Id),
    (Vocabulary::Wp, "comment_author", CommentField::Author),
    (Vocabulary::Wp, "comment_author_email", CommentField::AuthorEmail),
    (Vocabulary::Wp, "comment_author_url", CommentField::AuthorUrl),
    (Vocabulary::Wp, "comment_author_IP", CommentField::AuthorIp),
    (Vocabulary::Wp, "comment_date", CommentField::Date),
    (Vocabulary::Wp, "comment_date_gmt", CommentField::DateGmt),
    (Vocabulary::Wp, "comment_content", CommentField::Content),
    (Vocabulary::Wp, "comment_approved", CommentField::Approved),
    (Vocabulary::Wp, "comment_type", CommentField::Type),
    (Vocabulary::Wp, "comment_parent", CommentField::Parent),
    (Vocabulary::Wp, "comment_user_id", CommentField::UserId),
];

/// In-progress [`Comment`] for an open `wp:comment`
#[derive(Debug, Default)]
pub struct CommentAccumulator {
    comment: Comment,
}

impl CommentAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_leave(&mut self, leave: &Leave<'_>) -> bool {
        let Some(field) = lookup(COMMENT_FIELDS, leave.vocab, leave.local) else {
            return false;
        };
        let c = &mut self.comment;
        let slot = match field {
            CommentField::Id => &mut c.comment_id,
            CommentField::Author => &mut c.author,
            CommentField::AuthorEmail => &mut c.author_email,
            CommentField::AuthorUrl => &mut c.author_url,
            CommentField::AuthorIp => &mut c.author_ip,
            CommentField::Date => &mut c.date,
            CommentField::DateGmt => &mut c.date_gmt,
            CommentField::Content => &mut c.content,
            CommentField::Approved => &mut c.approved,
            CommentField::Type => &mut c.comment_type,
            CommentField::Parent => &mut c.parent,
            CommentField::UserId => &mut c.user_id,
        };
        assign(slot, leave.node);
        true
    }

    pub fn finish(self) -> Comment {
        self.comment
    }
}
