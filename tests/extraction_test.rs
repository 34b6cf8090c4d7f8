//! Integration tests for streaming extraction
//!
//! These tests build WXR documents in memory and check which records reach
//! the handler, in which order, and with which fields.

mod common;

use common::{WxrBuilder, collect, collect_with};
use std::rc::Rc;
use wxrtools::handler::{CollectingHandler, Handler, HandlerResult, Record};
use wxrtools::source::{Node, ReplaySource, XmlEvent};
use wxrtools::{
    Error, Extractor, ExtractorConfig, Item, ItunesValue, PostMeta, RepairConfig, Term,
    extract_path,
};

#[test]
fn test_blog_author_image_and_items() {
    let xml = WxrBuilder::new()
        .title("X")
        .link("Y")
        .author("1", "bob")
        .image("Z")
        .item("Hello", "publish")
        .item("Draft", "draft")
        .build();

    let (collector, stats) = collect(&xml);

    let Record::Author(author) = &collector.records[0] else {
        panic!("expected author first, got {:?}", collector.records[0]);
    };
    assert_eq!(author.id.as_deref(), Some("1"));
    assert_eq!(author.login.as_deref(), Some("bob"));

    let Record::Image(image) = &collector.records[1] else {
        panic!("expected image second");
    };
    assert_eq!(image.url.as_deref(), Some("Z"));

    let items: Vec<&Item> = collector.items().collect();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title.as_deref(), Some("Hello"));
    assert!(items[0].is_published());
    // Drafts are delivered too, filtering is up to the handler
    assert_eq!(items[1].status.as_deref(), Some("draft"));

    // The blog closes last
    let Some(Record::Blog(blog)) = collector.records.last() else {
        panic!("expected blog last");
    };
    assert_eq!(blog.title.as_deref(), Some("X"));
    assert_eq!(blog.link.as_deref(), Some("Y"));
    assert!(blog.itunes.is_empty());

    assert_eq!(stats.blogs, 1);
    assert_eq!(stats.authors, 1);
    assert_eq!(stats.images, 1);
    assert_eq!(stats.items, 2);
}

#[test]
fn test_item_title_does_not_leak_into_blog() {
    let xml = WxrBuilder::new()
        .title("Blog")
        .item("Post", "publish")
        .build();
    let (collector, _) = collect(&xml);
    let blog = collector.blogs().next().unwrap();
    assert_eq!(blog.title.as_deref(), Some("Blog"));
    assert_eq!(collector.items().next().unwrap().title.as_deref(), Some("Post"));
}

#[test]
fn test_base_urls_inside_author_land_on_blog() {
    let xml = WxrBuilder::new()
        .channel_xml(
            "<wp:author><wp:author_login>bob</wp:author_login>\
             <wp:base_site_url>http://example.com</wp:base_site_url>\
             <wp:base_blog_url>http://example.com/blog</wp:base_blog_url></wp:author>",
        )
        .build();
    let (collector, _) = collect(&xml);

    let author = collector.authors().next().unwrap();
    assert_eq!(author.login.as_deref(), Some("bob"));

    let blog = collector.blogs().next().unwrap();
    assert_eq!(blog.base_site_url.as_deref(), Some("http://example.com"));
    assert_eq!(blog.base_blog_url.as_deref(), Some("http://example.com/blog"));
}

#[test]
fn test_authors_are_isolated() {
    let xml = WxrBuilder::new()
        .channel_xml(
            "<wp:author><wp:author_login>alice</wp:author_login>\
             <wp:author_email>alice@example.com</wp:author_email></wp:author>",
        )
        .channel_xml("<wp:author><wp:author_login>bob</wp:author_login></wp:author>")
        .build();
    let (collector, _) = collect(&xml);

    let authors: Vec<_> = collector.authors().collect();
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0].email.as_deref(), Some("alice@example.com"));
    assert_eq!(authors[1].login.as_deref(), Some("bob"));
    assert_eq!(authors[1].email, None);
}

#[test]
fn test_every_image_is_emitted() {
    let xml = WxrBuilder::new().image("first.png").image("second.png").build();
    let (collector, stats) = collect(&xml);
    let urls: Vec<_> = collector.images().map(|i| i.url.as_deref()).collect();
    assert_eq!(urls, vec![Some("first.png"), Some("second.png")]);
    assert_eq!(stats.images, 2);
}

#[test]
fn test_itunes_metadata_before_blog() {
    let xml = WxrBuilder::new()
        .namespaces(&format!(
            "{}\n    xmlns:itunes=\"http://www.itunes.com/dtds/podcast-1.0.dtd\"",
            common::WXR_1_2_NAMESPACES
        ))
        .title("Podcast")
        .channel_xml("<itunes:author>Jane</itunes:author>")
        .channel_xml("<itunes:image href=\"http://example.com/cover.png\"/>")
        .channel_xml("<itunes:owner><itunes:email>jane@example.com</itunes:email></itunes:owner>")
        .build();
    let (collector, stats) = collect(&xml);

    let n = collector.records.len();
    let Record::Itunes(itunes) = &collector.records[n - 2] else {
        panic!("expected itunes right before blog");
    };
    assert_eq!(itunes.get("author"), Some(&ItunesValue::Text("Jane".into())));
    assert_eq!(
        itunes.get("image"),
        Some(&ItunesValue::Url("http://example.com/cover.png".into()))
    );
    // Nested elements are captured too
    assert_eq!(itunes.get("email").map(|v| v.as_str()), Some("jane@example.com"));

    let Record::Blog(blog) = &collector.records[n - 1] else {
        panic!("expected blog last");
    };
    assert_eq!(&blog.itunes, itunes);
    assert_eq!(stats.itunes, 1);
}

#[test]
fn test_item_fields_and_taxonomy() {
    let xml = WxrBuilder::new()
        .channel_xml(
            r#"<item>
<title>Hello &amp; welcome</title>
<link>http://example.com/?p=1</link>
<pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate>
<dc:creator><![CDATA[bob]]></dc:creator>
<guid isPermaLink="false">http://example.com/?p=1</guid>
<content:encoded><![CDATA[<p>Body</p>]]></content:encoded>
<excerpt:encoded><![CDATA[Short]]></excerpt:encoded>
<wp:post_id>1</wp:post_id>
<wp:post_name>hello</wp:post_name>
<wp:status>publish</wp:status>
<wp:post_type>post</wp:post_type>
<wp:is_sticky>0</wp:is_sticky>
<category domain="category" nicename="news"><![CDATA[News]]></category>
<category domain="post_tag" nicename="misc"><![CDATA[Misc]]></category>
<category domain="tag" nicename="rust"><![CDATA[Rust]]></category>
<category domain="category" nicename="tech"><![CDATA[Tech]]></category>
</item>"#,
        )
        .build();
    let (collector, _) = collect(&xml);
    let item = collector.items().next().unwrap();

    assert_eq!(item.title.as_deref(), Some("Hello & welcome"));
    assert_eq!(item.creator.as_deref(), Some("bob"));
    assert_eq!(item.guid.as_deref(), Some("http://example.com/?p=1"));
    assert_eq!(item.content.as_deref(), Some("<p>Body</p>"));
    assert_eq!(item.excerpt.as_deref(), Some("Short"));
    assert_eq!(item.post_id.as_deref(), Some("1"));
    assert_eq!(item.post_name.as_deref(), Some("hello"));
    assert_eq!(item.is_sticky.as_deref(), Some("0"));
    assert_eq!(
        item.categories,
        vec![
            Term { name: "News".into(), nicename: Some("news".into()) },
            Term { name: "Tech".into(), nicename: Some("tech".into()) },
        ]
    );
    assert_eq!(
        item.tags,
        vec![Term { name: "Rust".into(), nicename: Some("rust".into()) }]
    );
}

#[test]
fn test_postmeta_and_comments() {
    let xml = WxrBuilder::new()
        .channel_xml(
            r#"<item>
<title>Attachment</title>
<wp:post_type>attachment</wp:post_type>
<wp:attachment_url>http://example.com/a.png</wp:attachment_url>
<wp:postmeta><wp:meta_key>_edit_last</wp:meta_key><wp:meta_value>1</wp:meta_value></wp:postmeta>
<wp:postmeta><wp:meta_key>_thumbnail_id</wp:meta_key><wp:meta_value>7</wp:meta_value></wp:postmeta>
<wp:comment>
<wp:comment_id>3</wp:comment_id>
<wp:comment_author>Ann</wp:comment_author>
<wp:comment_author_IP>127.0.0.1</wp:comment_author_IP>
<wp:comment_content>Nice</wp:comment_content>
<wp:comment_approved>1</wp:comment_approved>
</wp:comment>
<wp:comment><wp:comment_id>4</wp:comment_id><wp:comment_parent>3</wp:comment_parent></wp:comment>
</item>"#,
        )
        .build();
    let (collector, stats) = collect(&xml);
    let item = collector.items().next().unwrap();

    assert_eq!(item.attachment_url.as_deref(), Some("http://example.com/a.png"));
    assert_eq!(
        item.postmeta,
        vec![
            PostMeta { key: "_edit_last".into(), value: "1".into() },
            PostMeta { key: "_thumbnail_id".into(), value: "7".into() },
        ]
    );
    assert_eq!(item.comments.len(), 2);
    assert_eq!(item.comments[0].author.as_deref(), Some("Ann"));
    assert_eq!(item.comments[0].author_ip.as_deref(), Some("127.0.0.1"));
    assert_eq!(item.comments[0].content.as_deref(), Some("Nice"));
    assert_eq!(item.comments[1].parent.as_deref(), Some("3"));
    // Comment ids must not leak into the item
    assert_eq!(item.post_id, None);
    assert_eq!(stats.comments, 2);
}

#[test]
fn test_renamed_prefix_and_older_versions() {
    let xml = WxrBuilder::new()
        .namespaces(r#"xmlns:wordpress="http://wordpress.org/export/1.0/""#)
        .channel_xml(
            "<item><title>Old</title><wordpress:status>publish</wordpress:status></item>",
        )
        .build();
    let (collector, _) = collect(&xml);
    let item = collector.items().next().unwrap();
    assert_eq!(item.status.as_deref(), Some("publish"));
}

#[test]
fn test_undeclared_prefix_does_not_fail() {
    let xml = WxrBuilder::new()
        .namespaces("")
        .title("Blog")
        .channel_xml("<item><title>Post</title><wp:status>publish</wp:status></item>")
        .build();
    let (collector, stats) = collect(&xml);
    // Without a binding, wp:status is read as a plain `status` and not mapped
    let item = collector.items().next().unwrap();
    assert_eq!(item.title.as_deref(), Some("Post"));
    assert_eq!(item.status, None);
    assert_eq!(stats.blogs, 1);
}

#[test]
fn test_unclosed_elements_at_eof() {
    let xml = "<rss xmlns:wp=\"http://wordpress.org/export/1.2/\"><channel>\
               <title>Cut</title><item><title>Done</title></item><item><title>Half";
    let (collector, stats) = collect(xml);
    // Open elements are closed in order when the input ends
    assert_eq!(stats.items, 2);
    assert_eq!(collector.items().nth(1).unwrap().title.as_deref(), Some("Half"));
    assert_eq!(collector.blogs().next().unwrap().title.as_deref(), Some("Cut"));
}

#[test]
fn test_close_without_open_is_ignored() {
    let leave = |name: &str| XmlEvent::Leave(Rc::new(Node::new(name)));
    let enter = |name: &str| XmlEvent::Enter(Rc::new(Node::new(name)));
    let source = ReplaySource::new(vec![
        enter("rss"),
        leave("item"),
        leave("image"),
        leave("channel"),
        leave("rss"),
    ]);
    let mut collector = CollectingHandler::new();
    let stats = Extractor::new(source, &mut collector).run().unwrap();
    assert!(collector.records.is_empty());
    assert_eq!(stats.ignored_closes, 3);
}

#[test]
fn test_stray_closes_do_not_lose_later_records() {
    let enter = |name: &str| XmlEvent::Enter(Rc::new(Node::new(name)));
    let leave = |name: &str| XmlEvent::Leave(Rc::new(Node::new(name)));
    let field = |name: &str, text: &str| {
        [
            enter(name),
            XmlEvent::Leave(Rc::new(Node::new(name).with_text(text))),
        ]
    };

    let mut events = vec![enter("rss"), enter("channel"), leave("item")];
    events.extend(field("title", "Blog"));
    events.push(enter("item"));
    events.push(leave("wp:postmeta"));
    events.extend(field("title", "First"));
    events.push(leave("item"));
    events.push(enter("item"));
    events.extend(field("title", "Second"));
    events.extend([leave("item"), leave("channel"), leave("rss")]);

    let mut collector = CollectingHandler::new();
    let stats = Extractor::new(ReplaySource::new(events), &mut collector)
        .run()
        .unwrap();

    assert_eq!(stats.ignored_closes, 2);
    let titles: Vec<_> = collector.items().map(|i| i.title.as_deref()).collect();
    assert_eq!(titles, vec![Some("First"), Some("Second")]);
    assert_eq!(
        collector.blogs().next().and_then(|b| b.title.as_deref()),
        Some("Blog")
    );
}

/// Collects records and fails on the second item
#[derive(Default)]
struct FailSecondItem {
    inner: CollectingHandler,
    ended: bool,
}

impl Handler for FailSecondItem {
    fn on_item(&mut self, item: Item) -> HandlerResult {
        if self.inner.items().count() == 1 {
            return Err(format!("cannot store {:?}", item.title).into());
        }
        self.inner.on_item(item)
    }

    fn on_author(&mut self, author: wxrtools::Author) -> HandlerResult {
        self.inner.on_author(author)
    }

    fn on_end(&mut self) -> HandlerResult {
        self.ended = true;
        Ok(())
    }
}

#[test]
fn test_handler_failure_stops_extraction() {
    let xml = WxrBuilder::new()
        .author("1", "bob")
        .item("one", "publish")
        .item("two", "publish")
        .item("three", "publish")
        .build();

    let mut handler = FailSecondItem::default();
    let result =
        Extractor::from_reader(xml.as_bytes(), &mut handler, &ExtractorConfig::new()).run();

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Handler { record: "item", .. }));
    assert!(err.to_string().contains("cannot store"));
    // Earlier records stay delivered, nothing after the failure is
    assert_eq!(handler.inner.authors().count(), 1);
    assert_eq!(handler.inner.items().count(), 1);
    assert!(!handler.ended);
}

#[test]
fn test_limit_stops_after_n_items() {
    let mut builder = WxrBuilder::new();
    for i in 0..10 {
        builder = builder.item(&format!("post {}", i), "publish");
    }
    let config = ExtractorConfig::new().with_limit(3);
    let (collector, stats) = collect_with(&builder.build(), &config);
    assert_eq!(stats.items, 3);
    assert_eq!(collector.items().count(), 3);
    assert_eq!(collector.blogs().count(), 0);
}

fn peak_retained(items: usize, config: &ExtractorConfig) -> usize {
    let mut builder = WxrBuilder::new().title("Big");
    for i in 0..items {
        builder = builder.item(&format!("post {}", i), "publish");
    }
    collect_with(&builder.build(), config).1.peak_retained_nodes
}

#[test]
fn test_memory_does_not_grow_with_item_count() {
    let config = ExtractorConfig::new();
    assert_eq!(peak_retained(10, &config), peak_retained(1000, &config));

    // Without pruning every finished item stays attached to the channel
    let keep = ExtractorConfig::new().with_prune(false);
    assert!(peak_retained(1000, &keep) > peak_retained(10, &keep));
}

#[cfg(unix)]
#[test]
fn test_extract_path_with_repair_program() {
    let file = WxrBuilder::new().title("Repaired").item("one", "publish").write_temp();
    let repair = RepairConfig::new().with_program("cat", Vec::<String>::new());

    let mut collector = CollectingHandler::new();
    let stats =
        extract_path(file.path(), &mut collector, &repair, &ExtractorConfig::new()).unwrap();
    assert_eq!(stats.items, 1);
    assert_eq!(collector.blogs().next().unwrap().title.as_deref(), Some("Repaired"));
}

#[test]
fn test_extract_path_without_repair() {
    let file = WxrBuilder::new().item("one", "publish").write_temp();
    let mut collector = CollectingHandler::new();
    let stats = extract_path(
        file.path(),
        &mut collector,
        &RepairConfig::disabled(),
        &ExtractorConfig::new(),
    )
    .unwrap();
    assert_eq!(stats.items, 1);
}
