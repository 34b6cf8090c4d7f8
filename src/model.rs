//! Data structures for records extracted from a WXR export
//!
//! Every record here is built by the extractor while its context is open and
//! handed to a [`Handler`](crate::handler::Handler) once the context closes.
//! Fields hold the text of the source element verbatim; nothing is
//! unescaped, trimmed or parsed beyond XML entity resolution.

use std::collections::BTreeMap;

/// Value of an `itunes:*` channel element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItunesValue {
    /// Text content of the element
    Text(String),
    /// `href` attribute of an element whose local name ends in `image`
    Url(String),
}

impl ItunesValue {
    /// The captured string, regardless of kind
    pub fn as_str(&self) -> &str {
        match self {
            ItunesValue::Text(s) | ItunesValue::Url(s) => s,
        }
    }
}

/// Podcast metadata keyed by the local name of each `itunes:*` element
pub type ItunesMetadata = BTreeMap<String, ItunesValue>;

/// Blog-level metadata from the `channel` element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blog {
    /// Blog title
    pub title: Option<String>,
    /// Public URL of the blog
    pub link: Option<String>,
    /// Blog tagline
    pub description: Option<String>,
    /// Language code, e.g. `en-US`
    pub language: Option<String>,
    /// `wp:base_blog_url`
    pub base_blog_url: Option<String>,
    /// `wp:base_site_url`
    pub base_site_url: Option<String>,
    /// Exporting software, from the channel `generator` element
    pub generator: Option<String>,
    /// Export timestamp, from the channel `pubDate` element
    pub pub_date: Option<String>,
    /// Podcast metadata from `itunes:*` channel children
    pub itunes: ItunesMetadata,
}

/// A blog author (`wp:author`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    /// `wp:author_id`
    pub id: Option<String>,
    /// `wp:author_login`
    pub login: Option<String>,
    /// `wp:author_email`
    pub email: Option<String>,
    /// `wp:author_display_name`
    pub display_name: Option<String>,
    /// `wp:author_first_name`
    pub first_name: Option<String>,
    /// `wp:author_last_name`
    pub last_name: Option<String>,
}

/// Channel image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    /// Image title
    pub title: Option<String>,
    /// Image source URL
    pub url: Option<String>,
    /// Link target of the image
    pub link: Option<String>,
}

/// A category or tag attached to an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Display name, the text of the `category` element
    pub name: String,
    /// Slug, the `nicename` attribute (if present)
    pub nicename: Option<String>,
}

/// A custom field (`wp:postmeta`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostMeta {
    /// `wp:meta_key`
    pub key: String,
    /// `wp:meta_value`
    pub value: String,
}

/// A comment on an item (`wp:comment`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    /// `wp:comment_id`
    pub comment_id: Option<String>,
    /// `wp:comment_author`, the display name
    pub author: Option<String>,
    /// `wp:comment_author_email`
    pub author_email: Option<String>,
    /// `wp:comment_author_url`
    pub author_url: Option<String>,
    /// `wp:comment_author_IP`
    pub author_ip: Option<String>,
    /// `wp:comment_date`, site local time
    pub date: Option<String>,
    /// `wp:comment_date_gmt`
    pub date_gmt: Option<String>,
    /// `wp:comment_content`
    pub content: Option<String>,
    /// `wp:comment_approved`: `1`, `0`, `spam` or `trash`
    pub approved: Option<String>,
    /// `wp:comment_type`, empty for plain comments, `pingback` or `trackback`
    pub comment_type: Option<String>,
    /// `wp:comment_parent`, id of the replied-to comment or `0`
    pub parent: Option<String>,
    /// `wp:comment_user_id`, `0` for anonymous commenters
    pub user_id: Option<String>,
}

/// Any content entry: post, page, attachment, draft, revision, ...
///
/// The entry kind lives in [`Item::post_type`] and its state in
/// [`Item::status`]; the extractor does not filter on either.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    /// `title`
    pub title: Option<String>,
    /// `link`, the public permalink
    pub link: Option<String>,
    /// `pubDate` in RFC 822 form
    pub pub_date: Option<String>,
    /// `guid`
    pub guid: Option<String>,
    /// `description`, usually empty in WordPress exports
    pub description: Option<String>,
    /// `dc:creator`
    pub creator: Option<String>,
    /// `content:encoded`
    pub content: Option<String>,
    /// `excerpt:encoded`
    pub excerpt: Option<String>,
    /// `wp:post_id`
    pub post_id: Option<String>,
    /// `wp:post_date`, site local time
    pub post_date: Option<String>,
    /// `wp:post_date_gmt`
    pub post_date_gmt: Option<String>,
    /// `wp:comment_status`: `open` or `closed`
    pub comment_status: Option<String>,
    /// `wp:ping_status`: `open` or `closed`
    pub ping_status: Option<String>,
    /// `wp:post_name`, the URL slug
    pub post_name: Option<String>,
    /// `wp:status`: `publish`, `draft`, `private`, `inherit`, ...
    pub status: Option<String>,
    /// `wp:post_parent`, id of the parent entry or `0`
    pub post_parent: Option<String>,
    /// `wp:menu_order`
    pub menu_order: Option<String>,
    /// `wp:post_type`: `post`, `page`, `attachment`, ...
    pub post_type: Option<String>,
    /// `wp:post_password`
    pub post_password: Option<String>,
    /// `wp:is_sticky`, `1` for sticky posts
    pub is_sticky: Option<String>,
    /// `wp:attachment_url`, only present on attachments
    pub attachment_url: Option<String>,
    /// `category` children with `domain="category"`, in source order
    pub categories: Vec<Term>,
    /// `category` children with `domain="tag"`, in source order
    pub tags: Vec<Term>,
    /// Custom fields in source order
    pub postmeta: Vec<PostMeta>,
    /// Comments in source order
    pub comments: Vec<Comment>,
}

impl Item {
    /// Whether this item is a published entry
    ///
    /// Convenience for handlers that only want live content.
    pub fn is_published(&self) -> bool {
        self.status.as_deref() == Some("publish")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_itunes_value_as_str() {
        assert_eq!(ItunesValue::Text("Tech".into()).as_str(), "Tech");
        assert_eq!(
            ItunesValue::Url("http://x/cover.png".into()).as_str(),
            "http://x/cover.png"
        );
    }

    #[test]
    fn test_item_is_published() {
        let mut item = Item::default();
        assert!(!item.is_published());
        item.status = Some("draft".into());
        assert!(!item.is_published());
        item.status = Some("publish".into());
        assert!(item.is_published());
    }
}
