//! Channel (blog-level) accumulation

use super::{FieldTable, Leave, assign, lookup};
use crate::model::{Blog, ItunesValue};
use crate::namespace::Vocabulary;

/// Blog fields that hold verbatim text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlogField {
    Title,
    Link,
    Description,
    Language,
    Generator,
    PubDate,
    BaseBlogUrl,
    BaseSiteUrl,
}

/// Plain RSS children, honored only as direct children of `channel`
const RSS_FIELDS: FieldTable<BlogField> = &[
    (Vocabulary::Rss, "title", BlogField::Title),
    (Vocabulary::Rss, "link", BlogField::Link),
    (Vocabulary::Rss, "description", BlogField::Description),
    (Vocabulary::Rss, "language", BlogField::Language),
    (Vocabulary::Rss, "generator", BlogField::Generator),
    (Vocabulary::Rss, "pubDate", BlogField::PubDate),
];

/// Site URLs; also accepted from inside an author context
const SITE_FIELDS: FieldTable<BlogField> = &[
    (Vocabulary::Wp, "base_blog_url", BlogField::BaseBlogUrl),
    (Vocabulary::Wp, "base_site_url", BlogField::BaseSiteUrl),
];

/// In-progress [`Blog`] for an open `channel`
#[derive(Debug, Default)]
pub struct BlogAccumulator {
    blog: Blog,
}

impl BlogAccumulator {
    /// Start an empty blog record
    pub fn new() -> Self {
        Self::default()
    }

    fn field_mut(&mut self, field: BlogField) -> &mut Option<String> {
        match field {
            BlogField::Title => &mut self.blog.title,
            BlogField::Link => &mut self.blog.link,
            BlogField::Description => &mut self.blog.description,
            BlogField::Language => &mut self.blog.language,
            BlogField::Generator => &mut self.blog.generator,
            BlogField::PubDate => &mut self.blog.pub_date,
            BlogField::BaseBlogUrl => &mut self.blog.base_blog_url,
            BlogField::BaseSiteUrl => &mut self.blog.base_site_url,
        }
    }

    /// Set a site URL field from a child of another context
    pub fn set_site_field(&mut self, leave: &Leave<'_>) -> bool {
        match lookup(SITE_FIELDS, leave.vocab, leave.local) {
            Some(field) => {
                assign(self.field_mut(field), leave.node);
                true
            }
            None => false,
        }
    }

    /// Offer a finished child element; returns whether it was used
    pub fn on_leave(&mut self, leave: &Leave<'_>) -> bool {
        if leave.vocab == Vocabulary::Itunes {
            self.set_itunes(leave);
            return true;
        }
        if leave.direct {
            if let Some(field) = lookup(RSS_FIELDS, leave.vocab, leave.local) {
                assign(self.field_mut(field), leave.node);
                return true;
            }
        }
        self.set_site_field(leave)
    }

    fn set_itunes(&mut self, leave: &Leave<'_>) {
        let value = if leave.local.ends_with("image") {
            match leave.node.attribute("href") {
                Some(href) => ItunesValue::Url(href.to_string()),
                None => {
                    log::debug!("itunes:{} without href, skipped", leave.local);
                    return;
                }
            }
        } else {
            ItunesValue::Text(leave.node.text.clone())
        };
        self.blog.itunes.insert(leave.local.to_string(), value);
    }

    /// Finalize the record
    pub fn finish(self) -> Blog {
        self.blog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::test_support::{direct, nested, node};

    #[test]
    fn test_direct_rss_fields() {
        let mut acc = BlogAccumulator::new();
        assert!(acc.on_leave(&direct(Vocabulary::Rss, &node("title", "My Blog"))));
        assert!(acc.on_leave(&direct(Vocabulary::Rss, &node("link", "http://blog"))));
        assert!(acc.on_leave(&direct(Vocabulary::Rss, &node("language", "en-US"))));
        assert!(!acc.on_leave(&direct(Vocabulary::Rss, &node("cloud", ""))));

        let blog = acc.finish();
        assert_eq!(blog.title.as_deref(), Some("My Blog"));
        assert_eq!(blog.link.as_deref(), Some("http://blog"));
        assert_eq!(blog.language.as_deref(), Some("en-US"));
        assert_eq!(blog.description, None);
    }

    #[test]
    fn test_nested_rss_fields_ignored() {
        let mut acc = BlogAccumulator::new();
        assert!(!acc.on_leave(&nested(Vocabulary::Rss, &node("title", "inner"))));
        assert_eq!(acc.finish().title, None);
    }

    #[test]
    fn test_itunes_text_and_image() {
        let mut acc = BlogAccumulator::new();
        acc.on_leave(&nested(Vocabulary::Itunes, &node("author", "Jane")));
        let image = node("image", "ignored").with_attribute("href", "http://x/cover.jpg");
        acc.on_leave(&direct(Vocabulary::Itunes, &image));
        acc.on_leave(&direct(Vocabulary::Itunes, &node("image", "no href")));

        let blog = acc.finish();
        assert_eq!(blog.itunes.get("author"), Some(&ItunesValue::Text("Jane".into())));
        assert_eq!(
            blog.itunes.get("image"),
            Some(&ItunesValue::Url("http://x/cover.jpg".into()))
        );
    }

    #[test]
    fn test_site_urls() {
        let mut acc = BlogAccumulator::new();
        assert!(acc.on_leave(&direct(Vocabulary::Wp, &node("base_site_url", "http://site"))));
        assert!(acc.set_site_field(&nested(Vocabulary::Wp, &node("base_blog_url", "http://blog"))));
        assert!(!acc.set_site_field(&direct(Vocabulary::Wp, &node("author_id", "1"))));

        let blog = acc.finish();
        assert_eq!(blog.base_site_url.as_deref(), Some("http://site"));
        assert_eq!(blog.base_blog_url.as_deref(), Some("http://blog"));
    }
}
