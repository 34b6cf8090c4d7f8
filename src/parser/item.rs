//! Item (post, page, attachment, ...) accumulation

use super::{FieldTable, Leave, assign, lookup};
use crate::model::{Comment, Item, PostMeta, Term};
use crate::namespace::Vocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemField {
    Title,
    Link,
    PubDate,
    Guid,
    Description,
    Creator,
    Content,
    Excerpt,
    PostId,
    PostDate,
    PostDateGmt,
    CommentStatus,
    PingStatus,
    PostName,
    Status,
    PostParent,
    MenuOrder,
    PostType,
    PostPassword,
    IsSticky,
    AttachmentUrl,
}

/// Plain RSS children, honored only as direct children of `item`
const RSS_FIELDS: FieldTable<ItemField> = &[
    (Vocabulary::Rss, "title", ItemField::Title),
    (Vocabulary::Rss, "link", ItemField::Link),
    (Vocabulary::Rss, "pubDate", ItemField::PubDate),
    (Vocabulary::Rss, "guid", ItemField::Guid),
    (Vocabulary::Rss, "description", ItemField::Description),
];

const NAMESPACED_FIELDS: FieldTable<ItemField> = &[
    (Vocabulary::Dc, "creator", ItemField::Creator),
    (Vocabulary::Content, "encoded", ItemField::Content),
    (Vocabulary::Excerpt, "encoded", ItemField::Excerpt),
    (Vocabulary::Wp, "post_id", ItemField::PostId),
    (Vocabulary::Wp, "post_date", ItemField::PostDate),
    (Vocabulary::Wp, "post_date_gmt", ItemField::PostDateGmt),
    (Vocabulary::Wp, "comment_status", ItemField::CommentStatus),
    (Vocabulary::Wp, "ping_status", ItemField::PingStatus),
    (Vocabulary::Wp, "post_name", ItemField::PostName),
    (Vocabulary::Wp, "status", ItemField::Status),
    (Vocabulary::Wp, "post_parent", ItemField::PostParent),
    (Vocabulary::Wp, "menu_order", ItemField::MenuOrder),
    (Vocabulary::Wp, "post_type", ItemField::PostType),
    (Vocabulary::Wp, "post_password", ItemField::PostPassword),
    (Vocabulary::Wp, "is_sticky", ItemField::IsSticky),
    (Vocabulary::Wp, "attachment_url", ItemField::AttachmentUrl),
];

/// In-progress [`Item`] for an open `item`
#[derive(Debug, Default)]
pub struct ItemAccumulator {
    item: Item,
    meta_key: Option<String>,
    meta_value: Option<String>,
}

impl ItemAccumulator {
    /// Start an empty item; taxonomy and postmeta lists start empty
    pub fn new() -> Self {
        Self::default()
    }

    fn field_mut(&mut self, field: ItemField) -> &mut Option<String> {
        let item = &mut self.item;
        match field {
            ItemField::Title => &mut item.title,
            ItemField::Link => &mut item.link,
            ItemField::PubDate => &mut item.pub_date,
            ItemField::Guid => &mut item.guid,
            ItemField::Description => &mut item.description,
            ItemField::Creator => &mut item.creator,
            ItemField::Content => &mut item.content,
            ItemField::Excerpt => &mut item.excerpt,
            ItemField::PostId => &mut item.post_id,
            ItemField::PostDate => &mut item.post_date,
            ItemField::PostDateGmt => &mut item.post_date_gmt,
            ItemField::CommentStatus => &mut item.comment_status,
            ItemField::PingStatus => &mut item.ping_status,
            ItemField::PostName => &mut item.post_name,
            ItemField::Status => &mut item.status,
            ItemField::PostParent => &mut item.post_parent,
            ItemField::MenuOrder => &mut item.menu_order,
            ItemField::PostType => &mut item.post_type,
            ItemField::PostPassword => &mut item.post_password,
            ItemField::IsSticky => &mut item.is_sticky,
            ItemField::AttachmentUrl => &mut item.attachment_url,
        }
    }

    /// Offer a finished child element; returns whether it was used
    pub fn on_leave(&mut self, leave: &Leave<'_>) -> bool {
        if leave.direct {
            if leave.is(Vocabulary::Rss, "category") {
                self.add_term(leave);
                return true;
            }
            if let Some(field) = lookup(RSS_FIELDS, leave.vocab, leave.local) {
                assign(self.field_mut(field), leave.node);
                return true;
            }
        }
        if let Some(field) = lookup(NAMESPACED_FIELDS, leave.vocab, leave.local) {
            assign(self.field_mut(field), leave.node);
            return true;
        }
        if leave.vocab == Vocabulary::Wp {
            return self.on_postmeta(leave);
        }
        false
    }

    fn add_term(&mut self, leave: &Leave<'_>) {
        let term = Term {
            name: leave.node.text.clone(),
            nicename: leave.node.attribute("nicename").map(str::to_string),
        };
        match leave.node.attribute("domain") {
            Some("category") => self.item.categories.push(term),
            Some("tag") => self.item.tags.push(term),
            other => log::trace!("category with domain {:?} dropped", other),
        }
    }

    fn on_postmeta(&mut self, leave: &Leave<'_>) -> bool {
        match leave.local {
            "meta_key" => self.meta_key = Some(leave.node.text.clone()),
            "meta_value" => self.meta_value = Some(leave.node.text.clone()),
            "postmeta" => {
                let key = self.meta_key.take();
                let value = self.meta_value.take();
                if key.is_some() || value.is_some() {
                    self.item.postmeta.push(PostMeta {
                        key: key.unwrap_or_default(),
                        value: value.unwrap_or_default(),
                    });
                }
            }
            _ => return false,
        }
        true
    }

    /// Attach a finished comment
    pub fn push_comment(&mut self, comment: Comment) {
        self.item.comments.push(comment);
    }

    pub fn finish(self) -> Item {
        self.item
    }
}
